use std::string::FromUtf8Error;

use crate::feature::Feature;

/// All error types that can occur when configuring or talking to Yeelight devices.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The discovery port is not a usable network port.
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// The value is not a well-formed IPv4 literal.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The socket reconnect interval is not a non-negative number.
    #[error("invalid reconnect interval: {0}")]
    InvalidReconnectInterval(String),

    /// No command implementation claims the requested feature tag.
    #[error("feature {0} not implemented")]
    UnsupportedFeature(String),

    /// A command rejected its own parameters.
    #[error("invalid params for {feature}: {reason}")]
    InvalidCommandParams { feature: Feature, reason: String },

    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// A network socket operation failed while communicating with a device.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: std::io::Error },

    /// Data received from a device contained invalid UTF-8.
    #[error("utf8 decoding error: {0:?}")]
    Utf8Decode(FromUtf8Error),

    /// The device answered a command with an error object.
    #[error("device error {code}: {message}")]
    Device { code: i64, message: String },

    /// No response with the expected id arrived in time.
    #[error("no response for command {0}")]
    Timeout(u64),

    /// A line from the device exceeded the framing limit.
    #[error("message longer than {0} bytes")]
    MessageTooLong(usize),

    /// The device closed the connection.
    #[error("connection closed by device")]
    ConnectionClosed,

    /// A discovery answer could not be understood.
    #[error("invalid discovery response: {0}")]
    InvalidDiscoveryResponse(String),
}

impl Error {
    /// Create a new socket error
    pub fn socket(action: &str, err: std::io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new invalid command params error
    pub fn invalid_params(feature: Feature, reason: impl Into<String>) -> Self {
        Error::InvalidCommandParams {
            feature,
            reason: reason.into(),
        }
    }

    /// Whether the error left the connection unusable.
    pub(crate) fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Socket { .. }
                | Error::ConnectionClosed
                | Error::Utf8Decode(_)
                | Error::MessageTooLong(_)
        )
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
