//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading training run
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ConfigError, ConfigResult};

use super::schema;
use super::types::RunConfig;

/// Path reported for documents that were not read from a file.
const INLINE_SOURCE: &str = "<input>";

/// Options controlling how strictly a document is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject keys the schema does not define instead of ignoring them.
    pub strict: bool,
}

impl LoadOptions {
    /// Options that reject unknown keys.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Loads and validates training run configurations.
///
/// A document must contain the seven sections `common`, `dataset`, `mix`,
/// `optimizer`, `scheduler`, `criterion` and `model`:
///
/// ```text
/// common:     run_label, log_freq, mixed_precision, profile_first
/// dataset:    root_train, root_eval, num_classes, batch_size,
///             batch_size_eval, num_workers, pin_memory
/// mix:        mixup_beta, cutmix_beta, prob, switch_prob, mode
/// optimizer:  learning_rate, weight_decay
/// scheduler:  warmup_epoch, cosine_tmax_epoch, max_epoch,
///             min_learning_rate (optional, defaults to 0)
/// criterion:  label_smoothing
/// model:      model_type, model_name, input_resolution, ema_momentum,
///             device_type
/// ```
///
/// The `load*` methods stop at the first problem. [`ConfigLoader::check_str`]
/// reports every problem in the document.
///
/// # Example
///
/// ```no_run
/// use run_config::config::ConfigLoader;
///
/// let config = ConfigLoader::load("./config/convnext.yaml").unwrap();
/// println!("Training {} for {} epochs", config.model().model_name, config.scheduler().max_epoch);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader {
    options: LoadOptions,
}

impl ConfigLoader {
    /// Creates a loader with the given options.
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Creates a loader that rejects unknown keys.
    pub fn strict() -> Self {
        Self::new(LoadOptions::strict())
    }

    /// Returns the options this loader applies.
    pub fn options(&self) -> LoadOptions {
        self.options
    }

    /// Loads a configuration file with the default (lenient) options.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML document (e.g., "./config/convnext.yaml")
    ///
    /// # Returns
    ///
    /// Returns the validated [`RunConfig`], or the first error found:
    /// - The file cannot be read
    /// - The file is not valid YAML
    /// - A section or required field is missing
    /// - A value has the wrong type or is out of range
    /// - Values contradict each other
    ///
    /// # Example
    ///
    /// ```no_run
    /// use run_config::config::ConfigLoader;
    ///
    /// let config = ConfigLoader::load("./config/swin_transformer.yaml")?;
    /// assert_eq!(config.model().model_type, "swin_transformer");
    /// # Ok::<(), run_config::error::ConfigError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<RunConfig> {
        Self::default().load_path(path)
    }

    /// Loads a configuration file with this loader's options.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> ConfigResult<RunConfig> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileNotFound {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let config = Self::first_issue(self.validate(&content, &path_str))?;
        info!(
            path = %path_str,
            run_label = %config.common().run_label,
            model_type = %config.model().model_type,
            "Loaded run configuration"
        );
        Ok(config)
    }

    /// Loads a configuration from an in-memory YAML document.
    ///
    /// # Example
    ///
    /// ```
    /// use run_config::config::ConfigLoader;
    /// use run_config::error::ConfigErrorKind;
    ///
    /// let err = ConfigLoader::default().load_str("common: {}").unwrap_err();
    /// assert_eq!(err.kind(), ConfigErrorKind::MissingSection);
    /// assert_eq!(err.path(), "dataset");
    /// ```
    pub fn load_str(&self, content: &str) -> ConfigResult<RunConfig> {
        Self::first_issue(self.validate(content, INLINE_SOURCE))
    }

    /// Validates an in-memory YAML document, reporting every problem.
    ///
    /// Problems are ordered: missing sections, then field problems in
    /// schema order, then cross-field invariants.
    pub fn check_str(&self, content: &str) -> Result<RunConfig, Vec<ConfigError>> {
        self.validate(content, INLINE_SOURCE)
    }

    fn validate(&self, content: &str, source: &str) -> Result<RunConfig, Vec<ConfigError>> {
        let root: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
            vec![oversized_integer(&e).unwrap_or_else(|| ConfigError::ParseError {
                path: source.to_string(),
                message: e.to_string(),
            })]
        })?;

        schema::build(&root, self.options.strict)
    }

    fn first_issue(result: Result<RunConfig, Vec<ConfigError>>) -> ConfigResult<RunConfig> {
        result.map_err(|issues| {
            issues
                .into_iter()
                .next()
                .unwrap_or_else(|| ConfigError::ParseError {
                    path: INLINE_SOURCE.to_string(),
                    message: "document rejected without a reported issue".to_string(),
                })
        })
    }
}

/// Recognises an integer literal too wide for the YAML tree.
///
/// `serde_yaml::Value` holds at most 64-bit integers, so a wider literal
/// fails the parse with "invalid type: integer `N` as u128" (or `i128`),
/// prefixed by the field path. That is an out-of-range value, not a syntax
/// error.
fn oversized_integer(error: &serde_yaml::Error) -> Option<ConfigError> {
    let message = error.to_string();
    let (field, rest) = message.split_once(": invalid type: integer `")?;
    let (digits, rest) = rest.split_once('`')?;
    if !(rest.starts_with(" as u128") || rest.starts_with(" as i128")) {
        return None;
    }
    Some(ConfigError::ConstraintViolation {
        field: field.to_string(),
        message: format!("{} is out of range for a 64-bit integer", digits),
    })
}
