use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Any failure crossing the management-API boundary: connection errors,
/// HTTP error statuses, or a body that does not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("transport failure: {message}{}", .status.map(|s| format!(" (http {s})")).unwrap_or_default())]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Deleting an already-deleted group surfaces as not-found; terminal
    /// for that item, never retried.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}
