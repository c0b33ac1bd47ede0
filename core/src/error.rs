//! The error contract shared by every feature slice.
//!
//! Operations convert transport and decoding failures into [`ApiError`]
//! before they reject, so every slice stores the same `{message, status}`
//! shape and the session listener can inspect any of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status used when no HTTP response was received at all.
pub const NO_RESPONSE: u16 = 0;

/// Normalised API failure: a message and the HTTP status that carried it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} (status {status})")]
pub struct ApiError {
    /// Human readable message, taken from the server when it sent one
    pub message: String,
    /// HTTP status code, [`NO_RESPONSE`] for transport failures
    pub status: u16,
}

impl ApiError {
    /// Create an error from a message and status
    #[must_use]
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// A failure where the server never answered
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(message, NO_RESPONSE)
    }

    /// 401: the session token is missing, invalid or expired
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// 404: the requested record does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// No response was received
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        self.status == NO_RESPONSE
    }
}
