//! Dependencies injected into every feature reducer.

use crate::api::CatalogApi;
use catalog_core::environment::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// The application environment
///
/// Effects clone the `Arc`s they need and move them into their futures.
#[derive(Clone)]
pub struct AppEnvironment {
    /// Remote catalog API
    pub api: Arc<dyn CatalogApi>,
    /// Persisted session and preferences
    pub storage: Arc<dyn KeyValueStore>,
    /// Interval between comment refreshes
    pub comment_poll_interval: Duration,
}

impl AppEnvironment {
    /// Create an environment
    #[must_use]
    pub fn new(
        api: Arc<dyn CatalogApi>,
        storage: Arc<dyn KeyValueStore>,
        comment_poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            storage,
            comment_poll_interval,
        }
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("comment_poll_interval", &self.comment_poll_interval)
            .finish_non_exhaustive()
    }
}
