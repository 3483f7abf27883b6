//! # Phase Grid
//!
//! Template rows for manual entry: `N` blades at evenly spaced phases, with
//! serials `1..=N` and zero magnitude, ready to be filled in and fed back
//! through the parser.
//!
//! ```rust
//! use balance_core::grid::{phase_grid, grid_to_text};
//!
//! let grid = phase_grid(4, 0.0).unwrap();
//! let phases: Vec<f64> = grid.iter().map(|r| r.phase).collect();
//! assert_eq!(phases, vec![0.0, 90.0, 180.0, 270.0]);
//! assert!(grid_to_text(&grid).starts_with("1\t0\t0"));
//! ```

use crate::blade::BladeRecord;
use crate::equations::{normalize_degrees, FULL_TURN_DEG};
use crate::errors::{BalanceError, BalanceResult};

/// Upper bound on generated rows, far above any real blade row
pub const MAX_GRID_BLADES: usize = 10_000;

/// Build `blade_count` evenly spaced rows starting at `start_phase` degrees.
pub fn phase_grid(blade_count: usize, start_phase: f64) -> BalanceResult<Vec<BladeRecord>> {
    if blade_count == 0 || blade_count > MAX_GRID_BLADES {
        return Err(BalanceError::invalid_input(
            "blade_count",
            blade_count.to_string(),
            format!("Blade count must be between 1 and {}", MAX_GRID_BLADES),
        ));
    }
    if !start_phase.is_finite() {
        return Err(BalanceError::invalid_input(
            "start_phase",
            start_phase.to_string(),
            "Start phase must be a finite number",
        ));
    }

    let step = FULL_TURN_DEG / blade_count as f64;
    Ok((0..blade_count)
        .map(|i| {
            BladeRecord::with_serial(
                (i + 1).to_string(),
                0.0,
                normalize_degrees(start_phase + step * i as f64),
            )
        })
        .collect())
}

/// Tab-separated `serial magnitude phase` lines, one per record.
///
/// Records without a serial fall back to two columns.
pub fn grid_to_text(records: &[BladeRecord]) -> String {
    records
        .iter()
        .map(|r| match &r.serial {
            Some(serial) => format!("{}\t{}\t{}", serial, r.magnitude, r.phase),
            None => format!("{}\t{}", r.magnitude, r.phase),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_blades, ParseOptions};

    #[test]
    fn test_spacing_and_serials() {
        let grid = phase_grid(3, 10.0).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], BladeRecord::with_serial("1", 0.0, 10.0));
        assert_eq!(grid[1].phase, 130.0);
        assert_eq!(grid[2].phase, 250.0);
        assert_eq!(grid[2].serial.as_deref(), Some("3"));
    }

    #[test]
    fn test_start_phase_wraps() {
        let grid = phase_grid(2, 270.0).unwrap();
        assert_eq!(grid[1].phase, 90.0);
    }

    #[test]
    fn test_zero_blades_rejected() {
        assert!(phase_grid(0, 0.0).is_err());
        assert!(phase_grid(3, f64::NAN).is_err());
    }

    #[test]
    fn test_text_reads_back_through_parser() {
        let mut grid = phase_grid(8, 0.0).unwrap();
        grid[2].magnitude = 12.5;
        let text = grid_to_text(&grid);
        let parsed = parse_blades(&text, &ParseOptions::strict()).unwrap();
        assert_eq!(parsed.records, grid);
    }
}
