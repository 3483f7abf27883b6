//! # Input Parser
//!
//! Turns pasted tabular text (typically two or three columns copied out of a
//! spreadsheet) into an ordered list of [`BladeRecord`]s.
//!
//! ## Line Format
//!
//! ```text
//! magnitude phase
//! serial magnitude phase [ignored...]
//! ```
//!
//! Tokens are separated by any whitespace, tabs included. Blank lines are
//! ignored. Any other line that does not yield a finite, non-negative
//! magnitude and a finite phase is malformed; what happens next is decided
//! by [`MalformedLinePolicy`].
//!
//! ## Example
//!
//! ```rust
//! use balance_core::parser::{parse_blades, ParseOptions};
//!
//! let parsed = parse_blades("10 0\nabc\nB-3 10 90", &ParseOptions::default()).unwrap();
//! assert_eq!(parsed.records.len(), 2);
//! assert_eq!(parsed.skipped.len(), 1);
//! assert_eq!(parsed.records[1].serial.as_deref(), Some("B-3"));
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::blade::BladeRecord;
use crate::errors::{BalanceError, BalanceResult};

/// What to do with a line that cannot be read as a blade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Drop the line, record it in [`ParsedBlades::skipped`], keep going
    #[default]
    Skip,
    /// Abort on the first malformed line
    Reject,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub malformed_lines: MalformedLinePolicy,
}

impl ParseOptions {
    /// Strict parsing: any malformed line is an error.
    pub fn strict() -> Self {
        ParseOptions {
            malformed_lines: MalformedLinePolicy::Reject,
        }
    }
}

/// A non-blank input line that produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number in the original text
    pub line_number: usize,
    /// The line as it appeared, trimmed
    pub content: String,
    /// Why it was rejected
    pub reason: String,
}

/// Parser output: records in input order plus every line that was dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedBlades {
    pub records: Vec<BladeRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse multi-line text into blade records.
///
/// # Errors
///
/// Only under [`MalformedLinePolicy::Reject`]: the first malformed line is
/// returned as [`BalanceError::MalformedLine`].
pub fn parse_blades(text: &str, options: &ParseOptions) -> BalanceResult<ParsedBlades> {
    let mut parsed = ParsedBlades::default();

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(record) => parsed.records.push(record),
            Err(reason) => match options.malformed_lines {
                MalformedLinePolicy::Reject => {
                    return Err(BalanceError::malformed_line(line_number, line, reason));
                }
                MalformedLinePolicy::Skip => {
                    debug!("skipping line {}: '{}' ({})", line_number, line, reason);
                    parsed.skipped.push(SkippedLine {
                        line_number,
                        content: line.to_string(),
                        reason,
                    });
                }
            },
        }
    }

    if !parsed.skipped.is_empty() {
        warn!(
            "{} malformed line(s) skipped, {} blade(s) parsed",
            parsed.skipped.len(),
            parsed.records.len()
        );
    }

    Ok(parsed)
}

/// Parse a single non-blank line.
///
/// Returns the rejection reason on failure.
pub fn parse_line(line: &str) -> Result<BladeRecord, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let (serial, magnitude_token, phase_token) = match tokens.as_slice() {
        [] | [_] => {
            return Err(format!(
                "expected magnitude and phase, found {} token(s)",
                tokens.len()
            ))
        }
        [magnitude, phase] => (None, *magnitude, *phase),
        [serial, magnitude, phase, ..] => (Some(*serial), *magnitude, *phase),
    };

    let magnitude = parse_number("magnitude", magnitude_token)?;
    if magnitude < 0.0 {
        return Err(format!("magnitude '{}' is negative", magnitude_token));
    }
    let phase = parse_number("phase", phase_token)?;

    Ok(BladeRecord {
        serial: serial.map(str::to_string),
        magnitude,
        phase,
    })
}

fn parse_number(field: &str, token: &str) -> Result<f64, String> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(format!("{} '{}' is not finite", field, token)),
        Err(_) => Err(format!("{} '{}' is not a number", field, token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient(text: &str) -> ParsedBlades {
        parse_blades(text, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_two_token_lines() {
        let parsed = lenient("211522.842 0.000\n211621.13\t3.913");
        assert_eq!(
            parsed.records,
            vec![BladeRecord::new(211522.842, 0.0), BladeRecord::new(211621.13, 3.913)]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_three_token_lines_carry_serial() {
        let parsed = lenient("S01 10 0\nS02\t10\t90\textra column");
        assert_eq!(parsed.records[0], BladeRecord::with_serial("S01", 10.0, 0.0));
        assert_eq!(parsed.records[1], BladeRecord::with_serial("S02", 10.0, 90.0));
    }

    #[test]
    fn test_malformed_line_is_dropped() {
        let parsed = lenient("10 0\nabc\n10 90");
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line_number, 2);
        assert_eq!(parsed.skipped[0].content, "abc");
    }

    #[test]
    fn test_non_numeric_tokens_drop_only_that_line() {
        let parsed = lenient("Magnitude Phase\n10 x\n5 45\nS1 ten 0");
        assert_eq!(parsed.records, vec![BladeRecord::new(5.0, 45.0)]);
        assert_eq!(parsed.skipped.len(), 3);
    }

    #[test]
    fn test_blank_lines_are_not_skipped_lines() {
        let parsed = lenient("\n  \n10 0\n\n\t\n10 180\n");
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_negative_and_non_finite_values_rejected() {
        let parsed = lenient("-5 0\nNaN 10\n5 inf\n5 -30");
        assert_eq!(parsed.records, vec![BladeRecord::new(5.0, -30.0)]);
        assert_eq!(parsed.skipped.len(), 3);
    }

    #[test]
    fn test_order_matches_input() {
        let parsed = lenient("3 0\n1 0\n2 0");
        let mags: Vec<f64> = parsed.records.iter().map(|r| r.magnitude).collect();
        assert_eq!(mags, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_reject_policy_fails_on_first_bad_line() {
        let err = parse_blades("10 0\n\nabc\nxyz", &ParseOptions::strict()).unwrap_err();
        assert_eq!(
            err,
            BalanceError::malformed_line(3, "abc", "expected magnitude and phase, found 1 token(s)")
        );
    }

    #[test]
    fn test_empty_input() {
        let parsed = lenient("");
        assert!(parsed.records.is_empty());
        assert!(parsed.skipped.is_empty());
    }
}
