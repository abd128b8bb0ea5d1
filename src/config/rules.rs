//! Range constraints applied to numeric configuration values.

/// A constraint on a floating point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FloatRule {
    /// Strictly greater than zero.
    Positive,
    /// Zero or greater.
    NonNegative,
    /// Within `[0, 1]`.
    Probability,
    /// Within `[0, 1)`.
    Fraction,
}

impl FloatRule {
    /// Checks a value, returning a description of the violation.
    pub(crate) fn check(self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("must be a finite number, got {}", value));
        }
        let ok = match self {
            FloatRule::Positive => value > 0.0,
            FloatRule::NonNegative => value >= 0.0,
            FloatRule::Probability => (0.0..=1.0).contains(&value),
            FloatRule::Fraction => (0.0..1.0).contains(&value),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("must be {}, got {}", self.describe(), value))
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FloatRule::Positive => "greater than 0",
            FloatRule::NonNegative => "at least 0",
            FloatRule::Probability => "within [0, 1]",
            FloatRule::Fraction => "within [0, 1)",
        }
    }
}

/// A constraint on an integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntRule {
    /// One or greater.
    Positive,
    /// Zero or greater.
    NonNegative,
}

impl IntRule {
    /// Checks a value, returning a description of the violation.
    pub(crate) fn check(self, value: i128) -> Result<(), String> {
        let (ok, describe) = match self {
            IntRule::Positive => (value >= 1, "a positive integer"),
            IntRule::NonNegative => (value >= 0, "a non-negative integer"),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("must be {}, got {}", describe, value))
        }
    }
}
