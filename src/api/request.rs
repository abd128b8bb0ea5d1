//! Request types for the configuration service.
//!
//! This module defines the query parameters accepted by the `/validate`
//! endpoint.

use serde::{Deserialize, Serialize};

use crate::config::LoadOptions;

/// Query parameters for the `/validate` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateParams {
    /// Overrides the service's unknown-key handling for this request.
    #[serde(default)]
    pub strict: Option<bool>,
}

impl ValidateParams {
    /// Resolves the options for this request against the service defaults.
    pub fn options(&self, defaults: LoadOptions) -> LoadOptions {
        LoadOptions {
            strict: self.strict.unwrap_or(defaults.strict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_strict_uses_default() {
        let params = ValidateParams::default();
        assert!(params.options(LoadOptions::strict()).strict);
        assert!(!params.options(LoadOptions::default()).strict);
    }

    #[test]
    fn test_explicit_strict_overrides_default() {
        let params = ValidateParams {
            strict: Some(false),
        };
        assert!(!params.options(LoadOptions::strict()).strict);
    }
}
