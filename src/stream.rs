mod client;
mod subscription;

pub use client::{StreamClient, StreamConfig, StreamSession};
pub use subscription::{OutboundPayload, SubscriptionFilter};
