use crate::errors::{ClientError, OrError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use url::Url;

/// Line and run numbers are the small integers the backend keys vehicles by.
pub type Line = u32;
pub type RunNumber = u32;

/// Raw text pushed by the stream server. Never parsed or validated here.
pub type InboundMessage = String;

/// Region id as used in API paths. Constructible from the raw id or from
/// one of the deployment's region names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region(u32);

impl Region {
    pub fn from_id(id: u32) -> Region {
        Region(id)
    }

    pub fn from_name(name: &str) -> OrError<Region> {
        let id = match name {
            "dresden" => 0,
            "chemnitz" => 1,
            "karlsruhe" => 2,
            "berlin" => 3,
            _ => {
                return Err(ClientError::invalid_configuration(format!(
                    "unknown region name: {}",
                    name
                )));
            }
        };
        Ok(Region(id))
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated server URI. Immutable once constructed.
///
/// Accepted schemes: `ws`/`wss` for the stream transport, `http`/`https`
/// for the request/response transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(Url);

impl Endpoint {
    pub fn parse(raw: &str) -> OrError<Endpoint> {
        let url = Url::parse(raw).map_err(|e| {
            ClientError::invalid_configuration(format!("cannot parse endpoint {}: {}", raw, e))
        })?;
        match url.scheme() {
            "ws" | "wss" | "http" | "https" => Ok(Endpoint(url)),
            other => Err(ClientError::invalid_configuration(format!(
                "unsupported endpoint scheme {} in {}",
                other, raw
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True for `ws`/`wss` endpoints.
    pub fn is_stream(&self) -> bool {
        matches!(self.0.scheme(), "ws" | "wss")
    }

    /// True for `http`/`https` endpoints.
    pub fn is_api(&self) -> bool {
        matches!(self.0.scheme(), "http" | "https")
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
