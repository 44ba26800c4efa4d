use crate::constants::DEFAULT_GREETING;
use crate::types::Line;
use serde::{Deserialize, Serialize};

/// Server-side message filter, announced as the first frame of a session.
/// An empty list means "no restriction" for that field; the server matches
/// each field independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionFilter {
    #[serde(default)]
    pub regions: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<Line>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub junctions: Vec<u32>,
}

impl SubscriptionFilter {
    pub fn for_regions(regions: Vec<u32>) -> SubscriptionFilter {
        SubscriptionFilter {
            regions,
            ..SubscriptionFilter::default()
        }
    }

    pub fn with_lines(mut self, lines: Vec<Line>) -> SubscriptionFilter {
        self.lines = lines;
        self
    }

    pub fn with_junctions(mut self, junctions: Vec<u32>) -> SubscriptionFilter {
        self.junctions = junctions;
        self
    }
}

/// The single outbound message of a stream session. Constructed once,
/// sent exactly once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPayload {
    /// Literal text frame (the smoke-test variant).
    Greeting(String),
    /// JSON-serialized subscription filter.
    Subscribe(SubscriptionFilter),
}

impl OutboundPayload {
    /// The observed smoke-test greeting.
    pub fn greeting() -> OutboundPayload {
        OutboundPayload::Greeting(DEFAULT_GREETING.to_string())
    }
}
