pub mod constants;
pub mod errors;
pub mod network;
pub mod stream;
pub mod types;

pub use errors::{ClientError, OrError};
pub use network::{NetworkClient, NetworkSnapshot, PositionRequest};
pub use stream::{OutboundPayload, StreamClient, StreamConfig, StreamSession, SubscriptionFilter};
pub use types::{Endpoint, InboundMessage, Line, Region, RunNumber};
