//! # Blade Records
//!
//! A `BladeRecord` is one measured blade: an optional serial number, the
//! static moment magnitude, and the phase angle in degrees.
//!
//! ## JSON Example
//!
//! ```json
//! { "serial": "B-07", "magnitude": 211522.842, "phase": 3.913 }
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::polar_to_cartesian;

/// One blade measurement.
///
/// Phase is not normalized on input; trigonometry takes it modulo 360.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BladeRecord {
    /// Blade serial / position label, when the input row carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    /// Static moment magnitude (>= 0)
    pub magnitude: f64,

    /// Phase angle in degrees
    pub phase: f64,
}

impl BladeRecord {
    /// Create a record without a serial.
    pub fn new(magnitude: f64, phase: f64) -> Self {
        BladeRecord {
            serial: None,
            magnitude,
            phase,
        }
    }

    /// Create a record with a serial.
    pub fn with_serial(serial: impl Into<String>, magnitude: f64, phase: f64) -> Self {
        BladeRecord {
            serial: Some(serial.into()),
            magnitude,
            phase,
        }
    }

    /// Cartesian components `(x, y)` of this blade's phasor
    pub fn components(&self) -> (f64, f64) {
        polar_to_cartesian(self.magnitude, self.phase)
    }

    /// Label for tables and chart traces: the serial, or the 1-based row number.
    pub fn label(&self, index: usize) -> String {
        match &self.serial {
            Some(serial) => serial.clone(),
            None => format!("#{}", index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_omitted_from_json_when_absent() {
        let record = BladeRecord::new(10.0, 90.0);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"magnitude":10.0,"phase":90.0}"#);

        let parsed: BladeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_label_falls_back_to_row_number() {
        assert_eq!(BladeRecord::new(1.0, 0.0).label(4), "#5");
        assert_eq!(BladeRecord::with_serial("A12", 1.0, 0.0).label(4), "A12");
    }

    #[test]
    fn test_components() {
        let (x, y) = BladeRecord::new(2.0, 90.0).components();
        assert!(x.abs() < 1e-12);
        assert!((y - 2.0).abs() < 1e-12);
    }
}
