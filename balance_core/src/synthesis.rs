//! # Vector Synthesis Engine
//!
//! Sums every blade's moment phasor and reports the resultant unbalance.
//!
//! ## Algorithm
//!
//! 1. Each blade `(m, φ)` becomes `(m·cos φ, m·sin φ)`
//! 2. Components are summed: `S_x`, `S_y`
//! 3. `M = hypot(S_x, S_y)`, `θ = (atan2(S_y, S_x) + 360) mod 360`
//!
//! Addition is commutative, so the resultant does not depend on blade order
//! beyond floating-point summation rounding.
//!
//! ## Edge Cases
//!
//! - No blades: `(0, 0)`
//! - One blade: exactly `(m, φ mod 360)`, no round-trip rounding
//! - Cancellation: `M` is always the true `hypot(S_x, S_y)`. Only when it is
//!   at rounding-noise level (`M <= n · ε · Σm`) is the direction meaningless,
//!   and the angle is reported as `0`
//!
//! ## Example
//!
//! ```rust
//! use balance_core::blade::BladeRecord;
//! use balance_core::synthesis::synthesize;
//!
//! let resultant = synthesize(&[BladeRecord::new(100.0, 0.0), BladeRecord::new(100.0, 0.0)]);
//! assert_eq!(resultant.magnitude, 200.0);
//! assert_eq!(resultant.angle, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::blade::BladeRecord;
use crate::equations::{cartesian_to_polar, normalize_degrees};

/// Bound on the rounding error of an `n`-term phasor sum, relative to `Σm`,
/// per summed term.
pub const ROUNDING_NOISE_PER_TERM: f64 = f64::EPSILON;

/// The summed phasor of all blades.
///
/// ## JSON Example
///
/// ```json
/// { "magnitude": 14.142135623730951, "angle": 45.0, "sum_x": 10.0, "sum_y": 10.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultantVector {
    /// Resultant unbalance magnitude (>= 0)
    pub magnitude: f64,
    /// Resultant angle in degrees, in `[0, 360)`
    pub angle: f64,
    /// Sum of x components
    pub sum_x: f64,
    /// Sum of y components
    pub sum_y: f64,
}

impl ResultantVector {
    /// The zero resultant.
    pub fn zero() -> Self {
        ResultantVector::default()
    }

    /// True when the magnitude is exactly zero (no blades, or all of zero size).
    pub fn is_zero(&self) -> bool {
        self.magnitude == 0.0
    }
}

/// Sum blade phasors into the resultant unbalance.
///
/// Pure function of `records`; calling it twice on the same slice gives the
/// same result.
pub fn synthesize(records: &[BladeRecord]) -> ResultantVector {
    if let [only] = records {
        return single(only);
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut total_magnitude = 0.0;
    for record in records {
        let (x, y) = record.components();
        sum_x += x;
        sum_y += y;
        total_magnitude += record.magnitude.abs();
    }

    let (magnitude, mut angle) = cartesian_to_polar(sum_x, sum_y);
    if magnitude <= noise_floor(records.len(), total_magnitude) {
        // Direction of a rounding residue carries no information
        angle = 0.0;
    }

    ResultantVector {
        magnitude,
        angle,
        sum_x,
        sum_y,
    }
}

/// Largest magnitude that summation rounding alone can produce.
fn noise_floor(terms: usize, total_magnitude: f64) -> f64 {
    terms as f64 * ROUNDING_NOISE_PER_TERM * total_magnitude
}

fn single(record: &BladeRecord) -> ResultantVector {
    let (sum_x, sum_y) = record.components();
    if record.magnitude == 0.0 {
        return ResultantVector {
            sum_x,
            sum_y,
            ..ResultantVector::zero()
        };
    }
    ResultantVector {
        magnitude: record.magnitude,
        angle: normalize_degrees(record.phase),
        sum_x,
        sum_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blades(pairs: &[(f64, f64)]) -> Vec<BladeRecord> {
        pairs.iter().map(|&(m, p)| BladeRecord::new(m, p)).collect()
    }

    #[test]
    fn test_empty_is_zero() {
        let resultant = synthesize(&[]);
        assert_eq!(resultant.magnitude, 0.0);
        assert_eq!(resultant.angle, 0.0);
        assert!(resultant.is_zero());
    }

    #[test]
    fn test_single_record_is_exact() {
        for &(m, p, expected) in &[
            (10.0, 30.0, 30.0),
            (211522.842, 3.913, 3.913),
            (7.5, -90.0, 270.0),
            (1.0, 725.0, 5.0),
        ] {
            let resultant = synthesize(&[BladeRecord::new(m, p)]);
            assert_eq!(resultant.magnitude, m);
            assert_eq!(resultant.angle, expected);
        }
    }

    #[test]
    fn test_opposite_blades_cancel() {
        let resultant = synthesize(&blades(&[(10.0, 0.0), (10.0, 180.0)]));
        assert!(resultant.magnitude.abs() < 1e-12);
        assert_eq!(resultant.angle, 0.0);
    }

    #[test]
    fn test_four_evenly_spaced_cancel() {
        let resultant = synthesize(&blades(&[(10.0, 0.0), (10.0, 90.0), (10.0, 180.0), (10.0, 270.0)]));
        assert!(resultant.magnitude.abs() < 1e-12);
        assert_eq!(resultant.angle, 0.0);
    }

    #[test]
    fn test_same_direction_adds() {
        let resultant = synthesize(&blades(&[(100.0, 0.0), (100.0, 0.0)]));
        assert_eq!(resultant.magnitude, 200.0);
        assert_eq!(resultant.angle, 0.0);
    }

    #[test]
    fn test_quadrature_sum() {
        let resultant = synthesize(&blades(&[(10.0, 0.0), (10.0, 90.0)]));
        assert!((resultant.magnitude - 200f64.sqrt()).abs() < 1e-9);
        assert!((resultant.angle - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_in_range_for_negative_direction() {
        let resultant = synthesize(&blades(&[(10.0, 200.0), (5.0, 300.0)]));
        assert!(resultant.angle >= 0.0 && resultant.angle < 360.0);
        assert!(resultant.angle > 180.0);
    }

    #[test]
    fn test_permutation_invariance() {
        let original = blades(&[(3.2, 10.0), (8.1, 95.5), (1.7, 181.0), (4.4, 250.25), (6.0, 333.3)]);
        let base = synthesize(&original);

        let mut reversed = original.clone();
        reversed.reverse();
        let mut rotated = original.clone();
        rotated.rotate_left(2);

        for permuted in [reversed, rotated] {
            let other = synthesize(&permuted);
            assert!((other.magnitude - base.magnitude).abs() < 1e-9);
            assert!((other.angle - base.angle).abs() < 1e-9);
        }
    }

    #[test]
    fn test_idempotent() {
        let records = blades(&[(1.0, 10.0), (2.0, 20.0)]);
        assert_eq!(synthesize(&records), synthesize(&records));
    }

    #[test]
    fn test_small_residual_survives_large_blades() {
        // 100 blades of 200000 evenly spaced cancel; a 0.015 residual remains
        let mut records: Vec<BladeRecord> = (0..100)
            .map(|i| BladeRecord::new(200_000.0, i as f64 * 3.6))
            .collect();
        records.push(BladeRecord::new(0.015, 0.0));

        let resultant = synthesize(&records);
        assert!((resultant.magnitude - 0.015).abs() < 1e-6, "got {}", resultant.magnitude);
        let off_axis = resultant.angle.min(360.0 - resultant.angle);
        assert!(off_axis < 0.1, "angle {}", resultant.angle);

        let limits = crate::tolerance::Thresholds::new(0.01, 1.0).unwrap();
        assert_eq!(
            crate::tolerance::classify(resultant.magnitude, &limits),
            crate::tolerance::ToleranceClass::Attention
        );
    }

    #[test]
    fn test_magnitude_is_never_snapped() {
        let records = blades(&[(211522.842, 0.0), (211522.842, 180.0), (0.5, 90.0)]);
        let resultant = synthesize(&records);
        let (x, y) = (resultant.sum_x, resultant.sum_y);
        assert_eq!(resultant.magnitude, x.hypot(y));
        assert!((resultant.magnitude - 0.5).abs() < 1e-6);
        assert!((resultant.angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_zero_magnitude() {
        let resultant = synthesize(&[BladeRecord::new(0.0, 123.0)]);
        assert_eq!(resultant.magnitude, 0.0);
        assert_eq!(resultant.angle, 0.0);
    }
}
