//! # Phasor Equations
//!
//! All formulas behind the resultant unbalance live here, so the synthesis
//! engine, the chart, and the report appendix share one implementation.
//!
//! ## Modules
//!
//! - [`phasor`] - Polar/Cartesian conversions and angle normalization
//! - [`registry`] - Equation metadata for report appendices

pub mod phasor;
pub mod registry;

pub use phasor::{cartesian_to_polar, normalize_degrees, polar_to_cartesian, FULL_TURN_DEG};

pub use registry::{generate_appendix_typst, synthesis_equations, Equation, EquationMetadata, Variable};
