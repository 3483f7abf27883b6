//! # Analysis Pipeline
//!
//! One pass of parse → synthesize → classify. An [`Analysis`] is everything
//! the chart and report renderers need; it is rebuilt from scratch on every
//! request and never mutated afterwards.
//!
//! ## Example
//!
//! ```rust
//! use balance_core::analysis::analyze;
//! use balance_core::settings::Settings;
//! use balance_core::tolerance::ToleranceClass;
//!
//! let analysis = analyze("100 0\n100 0", &Settings::default()).unwrap();
//! assert_eq!(analysis.blade_count(), 2);
//! assert_eq!(analysis.resultant.magnitude, 200.0);
//! assert_eq!(analysis.class, ToleranceClass::Critical);
//! ```

use log::info;
use serde::{Deserialize, Serialize};

use crate::blade::BladeRecord;
use crate::errors::BalanceResult;
use crate::parser::{parse_blades, SkippedLine};
use crate::settings::Settings;
use crate::synthesis::{synthesize, ResultantVector};
use crate::tolerance::{classify, Thresholds, ToleranceClass};

/// Message shown in place of results when no blade was parsed
pub const EMPTY_PLACEHOLDER: &str =
    "No blade data yet. Paste magnitude/phase rows to generate the analysis report.";

/// Result of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Parsed blades in input order
    pub records: Vec<BladeRecord>,
    /// Non-blank lines the parser dropped
    #[serde(default)]
    pub skipped: Vec<SkippedLine>,
    /// Summed phasor
    pub resultant: ResultantVector,
    /// Band the resultant was graded against
    pub thresholds: Thresholds,
    /// Grade of the resultant
    pub class: ToleranceClass,
}

impl Analysis {
    /// Synthesize and classify already-structured rows.
    pub fn from_records(records: Vec<BladeRecord>, thresholds: Thresholds) -> Self {
        let resultant = synthesize(&records);
        let class = classify(resultant.magnitude, &thresholds);
        Analysis {
            records,
            skipped: Vec::new(),
            resultant,
            thresholds,
            class,
        }
    }

    /// Number of blades that entered the sum
    pub fn blade_count(&self) -> usize {
        self.records.len()
    }

    /// Number of input lines dropped by the parser
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when there is nothing to report (placeholder state)
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest single-blade magnitude, 0 when empty
    pub fn max_blade_magnitude(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.magnitude)
            .fold(0.0, f64::max)
    }

    /// One-line summary for logs and terminal output
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }
        format!(
            "{} blades, resultant {:.6} at {:.2}° [{}]",
            self.blade_count(),
            self.resultant.magnitude,
            self.resultant.angle,
            self.class
        )
    }
}

/// Run the full pipeline over pasted text.
///
/// # Errors
///
/// Only when the parser runs with `MalformedLinePolicy::Reject` and meets a
/// malformed line. Empty input is not an error.
pub fn analyze(text: &str, settings: &Settings) -> BalanceResult<Analysis> {
    let parsed = parse_blades(text, &settings.parser)?;
    let mut analysis = Analysis::from_records(parsed.records, settings.thresholds);
    analysis.skipped = parsed.skipped;
    info!("analysis complete: {}", analysis.summary());
    Ok(analysis)
}
