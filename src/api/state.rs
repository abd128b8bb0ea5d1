//! Application state for the configuration service.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{LoadOptions, RunConfig};

/// Shared application state.
///
/// Holds the configuration the process was started with and the default
/// options applied when validating submitted documents.
#[derive(Clone)]
pub struct AppState {
    /// The loaded run configuration.
    config: Arc<RunConfig>,
    /// Options used by `/validate` unless the request overrides them.
    options: LoadOptions,
}

impl AppState {
    /// Creates a new application state with lenient validation.
    pub fn new(config: RunConfig) -> Self {
        Self::with_options(config, LoadOptions::default())
    }

    /// Creates a new application state with the given validation options.
    pub fn with_options(config: RunConfig, options: LoadOptions) -> Self {
        Self {
            config: Arc::new(config),
            options,
        }
    }

    /// Returns a reference to the run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Returns the default validation options.
    pub fn options(&self) -> LoadOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_config() {
        let config = ConfigLoader::load("./config/convnext.yaml").unwrap();
        let state = AppState::with_options(config, LoadOptions::strict());
        let clone = state.clone();
        assert!(std::ptr::eq(state.config(), clone.config()));
        assert!(clone.options().strict);
    }
}
