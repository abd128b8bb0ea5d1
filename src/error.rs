//! Error types for the training run configuration loader.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every way a configuration document can fail to load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The category of a [`ConfigError`].
///
/// Kinds are stable and serialize as upper snake case codes, which is how
/// the validation service reports them.
///
/// # Example
///
/// ```
/// use run_config::error::ConfigErrorKind;
///
/// assert_eq!(ConfigErrorKind::MissingField.code(), "MISSING_FIELD");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorKind {
    /// The document could not be read from storage.
    FileNotFound,
    /// The document is not well-formed YAML.
    ParseError,
    /// A required top-level section is absent.
    MissingSection,
    /// A required field is absent from its section.
    MissingField,
    /// A value has the wrong YAML type.
    TypeMismatch,
    /// A value is outside its allowed range or enumeration.
    ConstraintViolation,
    /// Two or more values are inconsistent with each other.
    InvariantViolation,
    /// A key is not part of the schema (strict mode only).
    UnknownField,
}

impl ConfigErrorKind {
    /// Returns the machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorKind::FileNotFound => "FILE_NOT_FOUND",
            ConfigErrorKind::ParseError => "PARSE_ERROR",
            ConfigErrorKind::MissingSection => "MISSING_SECTION",
            ConfigErrorKind::MissingField => "MISSING_FIELD",
            ConfigErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ConfigErrorKind::ConstraintViolation => "CONSTRAINT_VIOLATION",
            ConfigErrorKind::InvariantViolation => "INVARIANT_VIOLATION",
            ConfigErrorKind::UnknownField => "UNKNOWN_FIELD",
        }
    }
}

/// The error type for configuration loading.
///
/// Every variant carries the path of the offending item: a file path for
/// I/O and syntax errors, a section name, or a dotted `section.field` path.
///
/// # Example
///
/// ```
/// use run_config::error::{ConfigError, ConfigErrorKind};
///
/// let error = ConfigError::MissingField {
///     field: "scheduler.max_epoch".to_string(),
/// };
/// assert_eq!(error.kind(), ConfigErrorKind::MissingField);
/// assert_eq!(error.path(), "scheduler.max_epoch");
/// assert_eq!(error.to_string(), "Missing required field: scheduler.max_epoch");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Cannot read configuration file '{path}': {message}")]
    FileNotFound {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        message: String,
    },

    /// The configuration document is not valid YAML.
    #[error("Failed to parse configuration '{path}': {message}")]
    ParseError {
        /// The document path, or `<input>` for in-memory documents.
        path: String,
        /// A description of the syntax error.
        message: String,
    },

    /// A required top-level section is absent.
    #[error("Missing required section: {section}")]
    MissingSection {
        /// The name of the missing section.
        section: String,
    },

    /// A required field is absent or null.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The dotted path of the missing field.
        field: String,
    },

    /// A value has the wrong YAML type.
    #[error("Type mismatch at '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The dotted path of the value.
        field: String,
        /// The expected type.
        expected: String,
        /// The type actually found.
        found: String,
    },

    /// A value is outside its allowed range or enumeration.
    #[error("Invalid value for '{field}': {message}")]
    ConstraintViolation {
        /// The dotted path of the value.
        field: String,
        /// A description of the violated constraint.
        message: String,
    },

    /// Two or more values contradict each other.
    #[error("Inconsistent configuration at '{field}': {message}")]
    InvariantViolation {
        /// The dotted path of the field the invariant is reported against.
        field: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// A key that the schema does not define (strict mode only).
    #[error("Unknown field: {field}")]
    UnknownField {
        /// The dotted path of the unknown key.
        field: String,
    },
}

impl ConfigError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorKind::FileNotFound,
            ConfigError::ParseError { .. } => ConfigErrorKind::ParseError,
            ConfigError::MissingSection { .. } => ConfigErrorKind::MissingSection,
            ConfigError::MissingField { .. } => ConfigErrorKind::MissingField,
            ConfigError::TypeMismatch { .. } => ConfigErrorKind::TypeMismatch,
            ConfigError::ConstraintViolation { .. } => ConfigErrorKind::ConstraintViolation,
            ConfigError::InvariantViolation { .. } => ConfigErrorKind::InvariantViolation,
            ConfigError::UnknownField { .. } => ConfigErrorKind::UnknownField,
        }
    }

    /// Returns the path of the offending file, section, or field.
    pub fn path(&self) -> &str {
        match self {
            ConfigError::FileNotFound { path, .. } | ConfigError::ParseError { path, .. } => path,
            ConfigError::MissingSection { section } => section,
            ConfigError::MissingField { field }
            | ConfigError::TypeMismatch { field, .. }
            | ConfigError::ConstraintViolation { field, .. }
            | ConfigError::InvariantViolation { field, .. }
            | ConfigError::UnknownField { field } => field,
        }
    }
}

/// A type alias for Results that return ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
