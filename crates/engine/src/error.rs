//! Errors the persistence gateways can return.
//!
//! Gateways never panic or propagate transport errors as-is: everything is
//! folded into [`GatewayError`], and the controllers turn it into the
//! user-visible message stored in the sync status with
//! [`GatewayError::user_message`].
//!
//! "Nothing saved yet" is not an error: `load` returns `Ok(None)`.
use thiserror::Error;

pub const SAVE_FALLBACK_MESSAGE: &str = "Failed to save budget data";
pub const LOAD_FALLBACK_MESSAGE: &str = "Failed to load budget data";
pub const CLEAR_FALLBACK_MESSAGE: &str = "Failed to clear budget data";

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Clone, Debug, Error)]
pub enum GatewayError {
    /// The remote could not be reached (DNS, refused connection, timeout, ...).
    #[error("{0}")]
    Transport(String),
    /// The remote answered with a non-success status.
    #[error("server responded with status {status}")]
    Server { status: u16, message: Option<String> },
    /// The remote answered but the body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
    /// Local storage failure (file gateway).
    #[error("storage error: {0}")]
    Storage(String),
}

impl GatewayError {
    /// Message shown to the user, in priority order: the server-supplied
    /// message, then the generic transport message, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            Self::Server { message, .. } => message.as_deref(),
            Self::Transport(message) | Self::Decode(message) | Self::Storage(message) => {
                Some(message.as_str())
            }
        };
        match message.map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(value: std::io::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
