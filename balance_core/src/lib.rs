//! # balance_core - Blade Unbalance Calculation Engine
//!
//! `balance_core` computes the resultant unbalance of a rotor blade row: each
//! blade's moment is a phasor (magnitude, phase in degrees), the phasors are
//! summed, and the resultant is graded against a warn/critical band. All
//! inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions from pasted text to an [`Analysis`]
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Swappable output**: one [`report::ReportRenderer`] per format
//!
//! ## Quick Start
//!
//! ```rust
//! use balance_core::{analyze, Settings, ToleranceClass};
//!
//! let analysis = analyze("S1 10 0\nS2 10 90\nS3 10 180\nS4 10 270", &Settings::default()).unwrap();
//! assert_eq!(analysis.blade_count(), 4);
//! assert!(analysis.resultant.magnitude < 1e-9);
//! assert_eq!(analysis.class, ToleranceClass::Stable);
//! ```
//!
//! ## Modules
//!
//! - [`parser`] - pasted text to blade records
//! - [`synthesis`] - phasor summation
//! - [`tolerance`] - warn/critical classification
//! - [`analysis`] - the parse, synthesize, classify pipeline
//! - [`chart`] - polar chart model and SVG output
//! - [`report`] - HTML, PDF, JSON and SVG reports
//! - [`grid`] - evenly spaced entry templates
//! - [`settings`] - TOML configuration
//! - [`equations`] - formulas and their report metadata
//! - [`errors`] - structured error types
//! - [`file_io`] - atomic writes and versioned exports

pub mod analysis;
pub mod blade;
pub mod chart;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod grid;
pub mod parser;
pub mod report;
pub mod settings;
pub mod synthesis;
pub mod tolerance;

// Re-export commonly used types at crate root for convenience
pub use analysis::{analyze, Analysis};
pub use blade::BladeRecord;
pub use errors::{BalanceError, BalanceResult};
pub use parser::{parse_blades, MalformedLinePolicy, ParseOptions};
pub use report::{renderer_for, Report, ReportFormat, ReportMeta, ReportRenderer};
pub use settings::Settings;
pub use synthesis::{synthesize, ResultantVector};
pub use tolerance::{classify, Thresholds, ToleranceClass};
