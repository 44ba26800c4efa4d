pub const LOCAL_WEBSOCKET_ENDPOINT: &str = "ws://127.0.0.1:9001"; // loopback test server
pub const STAGING_WEBSOCKET_ENDPOINT: &str = "wss://socket.staging.dvb.solutions";
pub const PRODUCTION_WEBSOCKET_ENDPOINT: &str = "wss://socket.dvb.solutions";

pub const LOCAL_API_ENDPOINT: &str = "http://127.0.0.1:9002";
pub const PRODUCTION_API_ENDPOINT: &str = "https://api.dvb.solutions";

// First frame the smoke-test variant announces instead of a subscription filter
pub const DEFAULT_GREETING: &str = "Hello world!";

pub const DEFAULT_REGION: u32 = 0; // dresden
