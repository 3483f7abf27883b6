//! # Tolerance Classifier
//!
//! Grades a resultant magnitude against a warn/critical band.
//!
//! ```text
//!   Stable        Attention         Critical
//! ──────────┬─────────────────┬──────────────▶ magnitude
//!         warn            critical
//!        (incl.)          (incl.)
//! ```
//!
//! Both bounds belong to the Attention band: `warn <= m <= critical`.
//!
//! ## Example
//!
//! ```rust
//! use balance_core::tolerance::{classify, Thresholds, ToleranceClass};
//!
//! let limits = Thresholds::new(1.0, 10.0).unwrap();
//! assert_eq!(classify(0.5, &limits), ToleranceClass::Stable);
//! assert_eq!(classify(10.0, &limits), ToleranceClass::Attention);
//! assert_eq!(classify(10.5, &limits), ToleranceClass::Critical);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BalanceError, BalanceResult};

/// Single cut-off used when no thresholds are configured
pub const DEFAULT_LIMIT: f64 = 0.05;

/// Warn/critical band for the resultant magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Lower bound of the Attention band (inclusive)
    pub warn: f64,
    /// Upper bound of the Attention band (inclusive)
    pub critical: f64,
}

impl Thresholds {
    /// Create a validated band.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a bound is negative or non-finite, or `warn > critical`.
    pub fn new(warn: f64, critical: f64) -> BalanceResult<Self> {
        let thresholds = Thresholds { warn, critical };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// A band of zero width: anything above `limit` is Critical, anything
    /// below is Stable, and exactly `limit` is Attention.
    pub fn single_limit(limit: f64) -> BalanceResult<Self> {
        Thresholds::new(limit, limit)
    }

    /// Check the band invariants.
    pub fn validate(&self) -> BalanceResult<()> {
        for (field, value) in [("warn", self.warn), ("critical", self.critical)] {
            if !value.is_finite() {
                return Err(BalanceError::invalid_input(
                    field,
                    value.to_string(),
                    "Threshold must be a finite number",
                ));
            }
            if value < 0.0 {
                return Err(BalanceError::invalid_input(
                    field,
                    value.to_string(),
                    "Threshold must not be negative",
                ));
            }
        }
        if self.warn > self.critical {
            return Err(BalanceError::invalid_input(
                "warn",
                self.warn.to_string(),
                format!("Warn threshold exceeds critical threshold {}", self.critical),
            ));
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            warn: DEFAULT_LIMIT,
            critical: DEFAULT_LIMIT,
        }
    }
}

/// Outcome of a tolerance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToleranceClass {
    Stable,
    Attention,
    Critical,
}

impl ToleranceClass {
    /// Short label for tables and status lines
    pub fn label(&self) -> &'static str {
        match self {
            ToleranceClass::Stable => "STABLE",
            ToleranceClass::Attention => "ATTENTION",
            ToleranceClass::Critical => "CRITICAL",
        }
    }

    /// Headline for report cards
    pub fn headline(&self) -> &'static str {
        match self {
            ToleranceClass::Stable => "Stable Condition",
            ToleranceClass::Attention => "Attention Required",
            ToleranceClass::Critical => "Critical Unbalance",
        }
    }

    /// Diagnosis text shown next to the result
    pub fn diagnosis(&self) -> &'static str {
        match self {
            ToleranceClass::Stable => "The current blade arrangement is within tolerance.",
            ToleranceClass::Attention => {
                "The resultant unbalance is inside the warning band. Consider re-arranging blades before the next run."
            }
            ToleranceClass::Critical => {
                "The resultant unbalance exceeds the allowable limit. Vibration may damage bearings and shorten equipment life."
            }
        }
    }
}

impl fmt::Display for ToleranceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a resultant magnitude.
pub fn classify(magnitude: f64, thresholds: &Thresholds) -> ToleranceClass {
    if magnitude > thresholds.critical {
        ToleranceClass::Critical
    } else if magnitude >= thresholds.warn {
        ToleranceClass::Attention
    } else {
        ToleranceClass::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_are_inclusive() {
        let limits = Thresholds::new(1.0, 10.0).unwrap();
        assert_eq!(classify(1.0, &limits), ToleranceClass::Attention);
        assert_eq!(classify(10.0, &limits), ToleranceClass::Attention);
        assert_eq!(classify(0.999, &limits), ToleranceClass::Stable);
        assert_eq!(classify(10.001, &limits), ToleranceClass::Critical);
    }

    #[test]
    fn test_single_limit() {
        let limits = Thresholds::single_limit(100.0).unwrap();
        assert_eq!(classify(99.0, &limits), ToleranceClass::Stable);
        assert_eq!(classify(100.0, &limits), ToleranceClass::Attention);
        assert_eq!(classify(100.5, &limits), ToleranceClass::Critical);
    }

    #[test]
    fn test_default_limit() {
        let limits = Thresholds::default();
        assert_eq!(classify(0.0, &limits), ToleranceClass::Stable);
        assert_eq!(classify(0.06, &limits), ToleranceClass::Critical);
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(Thresholds::new(10.0, 1.0).is_err());
        assert!(Thresholds::new(-1.0, 1.0).is_err());
        assert!(Thresholds::new(0.0, f64::INFINITY).is_err());
        assert!(Thresholds::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_class_serialization() {
        let json = serde_json::to_string(&ToleranceClass::Attention).unwrap();
        assert_eq!(json, "\"ATTENTION\"");
        let roundtrip: ToleranceClass = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, ToleranceClass::Attention);
    }
}
