//! # Phasor Formulas
//!
//! Conversions between the polar form used by balancing machines
//! (magnitude, phase in degrees) and Cartesian components.
//!
//! ## Conventions
//!
//! - Angles are in degrees everywhere in the public API
//! - 0° lies on the +x axis of the math frame; angles increase counter-clockwise
//! - Normalized angles lie in `[0, 360)`

/// Full turn in degrees
pub const FULL_TURN_DEG: f64 = 360.0;

/// Convert a polar phasor to Cartesian components.
///
/// # Formulas
/// - x = m·cos(φ)
/// - y = m·sin(φ)
///
/// # Returns
/// `(x, y)`
#[inline]
pub fn polar_to_cartesian(magnitude: f64, phase_deg: f64) -> (f64, f64) {
    let (sin, cos) = phase_deg.to_radians().sin_cos();
    (magnitude * cos, magnitude * sin)
}

/// Convert Cartesian components back to `(magnitude, angle)`.
///
/// # Formulas
/// - m = hypot(x, y)
/// - θ = (atan2(y, x) + 360) mod 360
///
/// `hypot` avoids the overflow of squaring large moments.
#[inline]
pub fn cartesian_to_polar(x: f64, y: f64) -> (f64, f64) {
    let magnitude = x.hypot(y);
    let angle = normalize_degrees(y.atan2(x).to_degrees());
    (magnitude, angle)
}

/// Normalize an angle in degrees to `[0, 360)`.
///
/// `rem_euclid` can round up to exactly 360 for tiny negative inputs,
/// so that case folds back to 0.
///
/// ```rust
/// use balance_core::equations::normalize_degrees;
///
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(720.0), 0.0);
/// ```
#[inline]
pub fn normalize_degrees(angle_deg: f64) -> f64 {
    let normalized = angle_deg.rem_euclid(FULL_TURN_DEG);
    if normalized >= FULL_TURN_DEG {
        0.0
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_polar_to_cartesian_quadrants() {
        let (x, y) = polar_to_cartesian(10.0, 0.0);
        assert!((x - 10.0).abs() < EPS && y.abs() < EPS);

        let (x, y) = polar_to_cartesian(10.0, 90.0);
        assert!(x.abs() < EPS && (y - 10.0).abs() < EPS);

        let (x, y) = polar_to_cartesian(10.0, 180.0);
        assert!((x + 10.0).abs() < EPS && y.abs() < EPS);

        let (x, y) = polar_to_cartesian(10.0, 270.0);
        assert!(x.abs() < EPS && (y + 10.0).abs() < EPS);
    }

    #[test]
    fn test_cartesian_to_polar_third_quadrant() {
        let (m, a) = cartesian_to_polar(-1.0, -1.0);
        assert!((m - 2f64.sqrt()).abs() < EPS);
        assert!((a - 225.0).abs() < EPS);
    }

    #[test]
    fn test_cartesian_to_polar_no_overflow() {
        let (m, _) = cartesian_to_polar(1e200, 1e200);
        assert!(m.is_finite());
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-360.0), 0.0);
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(-1e-20), 0.0);
        assert!(normalize_degrees(-1e-13) < 360.0);
    }
}
