//! Typed field extraction from a parsed YAML section.
//!
//! A [`SectionReader`] pulls fields out of one section mapping, coercing each
//! to its declared type and checking its range. Problems are pushed onto a
//! shared issue list instead of aborting, so one pass can report everything
//! wrong with a document.

use std::str::FromStr;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::ConfigError;

use super::rules::{FloatRule, IntRule};

/// Returns a short name for the YAML type of a value.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("<{}>", type_name(other)),
    }
}

/// Reports keys of `map` that are not in `known`.
///
/// Unknown keys are errors in strict mode and are otherwise only logged.
pub(crate) fn check_unknown_keys(
    prefix: Option<&str>,
    map: &Mapping,
    known: &[&str],
    strict: bool,
    issues: &mut Vec<ConfigError>,
) {
    for (key, _) in map {
        let label = key_label(key);
        if known.contains(&label.as_str()) {
            continue;
        }
        let field = match prefix {
            Some(prefix) => format!("{}.{}", prefix, label),
            None => label,
        };
        if strict {
            issues.push(ConfigError::UnknownField { field });
        } else {
            debug!(field = %field, "Ignoring unknown configuration key");
        }
    }
}

/// Reads typed fields from a single section mapping.
pub(crate) struct SectionReader<'a, 'b> {
    section: &'static str,
    map: &'a Mapping,
    issues: &'b mut Vec<ConfigError>,
    known: Vec<&'static str>,
}

impl<'a, 'b> SectionReader<'a, 'b> {
    /// Creates a reader for the named section.
    pub(crate) fn new(
        section: &'static str,
        map: &'a Mapping,
        issues: &'b mut Vec<ConfigError>,
    ) -> Self {
        Self {
            section,
            map,
            issues,
            known: Vec::new(),
        }
    }

    fn path(&self, key: &str) -> String {
        format!("{}.{}", self.section, key)
    }

    fn required(&mut self, key: &'static str) -> Option<&'a Value> {
        self.known.push(key);
        let map: &'a Mapping = self.map;
        match map.get(key) {
            Some(value) if !value.is_null() => Some(value),
            _ => {
                let field = self.path(key);
                self.issues.push(ConfigError::MissingField { field });
                None
            }
        }
    }

    fn optional(&mut self, key: &'static str) -> Option<&'a Value> {
        self.known.push(key);
        let map: &'a Mapping = self.map;
        map.get(key).filter(|value| !value.is_null())
    }

    fn mismatch(&mut self, key: &str, expected: &str, found: &Value) {
        let field = self.path(key);
        self.issues.push(ConfigError::TypeMismatch {
            field,
            expected: expected.to_string(),
            found: type_name(found).to_string(),
        });
    }

    fn violation(&mut self, key: &str, message: String) {
        let field = self.path(key);
        self.issues.push(ConfigError::ConstraintViolation { field, message });
    }

    /// Reads a required, non-blank string.
    pub(crate) fn text(&mut self, key: &'static str) -> Option<String> {
        let value = self.required(key)?;
        let Value::String(s) = value else {
            self.mismatch(key, "string", value);
            return None;
        };
        if s.trim().is_empty() {
            self.violation(key, "must not be empty".to_string());
            return None;
        }
        Some(s.clone())
    }

    /// Reads a required boolean. The quoted strings `"true"` and `"false"`
    /// are accepted as well.
    pub(crate) fn flag(&mut self, key: &'static str) -> Option<bool> {
        let value = self.required(key)?;
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => {
                    self.mismatch(key, "boolean", value);
                    None
                }
            },
            _ => {
                self.mismatch(key, "boolean", value);
                None
            }
        }
    }

    /// Reads a required integer satisfying `rule`.
    ///
    /// Floats are rejected even when they hold a whole number.
    pub(crate) fn integer<T: TryFrom<i128>>(
        &mut self,
        key: &'static str,
        rule: IntRule,
    ) -> Option<T> {
        let value = self.required(key)?;
        let number = match value {
            Value::Number(n) if !n.is_f64() => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from)),
            _ => None,
        };
        let Some(number) = number else {
            self.mismatch(key, "integer", value);
            return None;
        };
        if let Err(message) = rule.check(number) {
            self.violation(key, message);
            return None;
        }
        match T::try_from(number) {
            Ok(v) => Some(v),
            Err(_) => {
                self.violation(key, format!("{} is too large", number));
                None
            }
        }
    }

    /// Reads a required float satisfying `rule`.
    pub(crate) fn float(&mut self, key: &'static str, rule: FloatRule) -> Option<f64> {
        let value = self.required(key)?;
        self.coerce_float(key, value, rule)
    }

    /// Reads an optional float satisfying `rule`, substituting `default` when
    /// the key is absent or null.
    pub(crate) fn float_or(
        &mut self,
        key: &'static str,
        rule: FloatRule,
        default: f64,
    ) -> Option<f64> {
        match self.optional(key) {
            Some(value) => self.coerce_float(key, value, rule),
            None => Some(default),
        }
    }

    /// Reads a required string that must be one of `variants`.
    pub(crate) fn choice<T: FromStr>(
        &mut self,
        key: &'static str,
        variants: &[&str],
    ) -> Option<T> {
        let value = self.required(key)?;
        let Value::String(s) = value else {
            self.mismatch(key, "string", value);
            return None;
        };
        match s.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.violation(
                    key,
                    format!("must be one of [{}], got '{}'", variants.join(", "), s),
                );
                None
            }
        }
    }

    fn coerce_float(&mut self, key: &str, value: &Value, rule: FloatRule) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(number) = number else {
            self.mismatch(key, "float", value);
            return None;
        };
        if let Err(message) = rule.check(number) {
            self.violation(key, message);
            return None;
        }
        Some(number)
    }

    /// Checks the section for keys that were never read.
    pub(crate) fn finish(self, strict: bool) {
        check_unknown_keys(
            Some(self.section),
            self.map,
            &self.known,
            strict,
            self.issues,
        );
    }
}
