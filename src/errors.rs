use thiserror::Error;

/// Failure taxonomy for both transports. Nothing in this crate catches or
/// retries these; they propagate to the caller, which logs and terminates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Endpoint unreachable or the handshake failed.
    #[error("Hermes connection error ({endpoint}): {message}")]
    Connection { endpoint: String, message: String },

    /// Send or receive on a closed or broken session.
    #[error("Hermes transport error ({endpoint}): {message}")]
    Transport { endpoint: String, message: String },

    /// Non-success HTTP status or unparseable response body.
    #[error("Hermes request error ({url}): {message}")]
    Request { url: String, message: String },

    /// Rejected client-side input (bad endpoint scheme, unknown region name).
    #[error("Hermes configuration error: {message}")]
    InvalidConfiguration { message: String },
}

impl ClientError {
    pub fn connection(endpoint: impl ToString, message: impl ToString) -> Self {
        ClientError::Connection {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }

    pub fn transport(endpoint: impl ToString, message: impl ToString) -> Self {
        ClientError::Transport {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }

    pub fn request(url: impl ToString, message: impl ToString) -> Self {
        ClientError::Request {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_configuration(message: impl ToString) -> Self {
        ClientError::InvalidConfiguration {
            message: message.to_string(),
        }
    }
}

pub type OrError<T> = Result<T, ClientError>;
