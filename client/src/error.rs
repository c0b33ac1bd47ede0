//! Errors at the application boundary.

use crate::config::ConfigError;
use crate::validation::ValidationError;
use catalog_core::ApiError;
use catalog_core::environment::StorageError;
use catalog_runtime::StoreError;
use thiserror::Error;

/// Everything that can go wrong between the caller and the store
#[derive(Debug, Error)]
pub enum ClientError {
    /// The store rejected or lost an action
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Persisted storage could not be opened or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A form failed validation before anything was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API rejected a request
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A bundled message dictionary is malformed
    #[error("Message bundle error: {0}")]
    Messages(#[from] serde_json::Error),
}

/// Result alias for application calls
pub type Result<T> = std::result::Result<T, ClientError>;
