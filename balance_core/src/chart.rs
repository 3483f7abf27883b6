//! # Polar Chart
//!
//! Chart model and SVG rendering for the blade phasors and their resultant.
//!
//! ## Orientation
//!
//! 0° points to the top of the chart and angles increase counter-clockwise,
//! matching the way phase marks are read off a rotor face:
//!
//! ```text
//!             0°
//!             │
//!    90° ─────┼───── 270°
//!             │
//!            180°
//! ```
//!
//! ## Example
//!
//! ```rust
//! use balance_core::analysis::analyze;
//! use balance_core::chart::{ChartStyle, PolarChart};
//! use balance_core::settings::Settings;
//!
//! let analysis = analyze("10 0\n10 90", &Settings::default()).unwrap();
//! let chart = PolarChart::from_analysis(&analysis);
//! let svg = chart.to_svg(&ChartStyle::default());
//! assert!(svg.starts_with("<svg"));
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::errors::{BalanceError, BalanceResult};

/// Margin between the outer ring and the SVG edge, in px
const CHART_MARGIN: f64 = 36.0;

/// Smallest radius for the resultant marker so a tiny resultant stays visible
const MIN_MARKER_RADIUS: f64 = 4.0;

/// Visual settings for the polar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Width and height of the square chart, px
    pub size: f64,
    /// Number of concentric magnitude rings
    pub rings: u32,
    /// Angle between radial spokes, degrees
    pub spoke_step_deg: f64,
    pub background: String,
    pub grid_color: String,
    pub text_color: String,
    pub blade_color: String,
    pub resultant_color: String,
    pub font_family: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            size: 480.0,
            rings: 4,
            spoke_step_deg: 30.0,
            background: "#ffffff".to_string(),
            grid_color: "#e2e8f0".to_string(),
            text_color: "#64748b".to_string(),
            blade_color: "rgba(148,163,184,0.45)".to_string(),
            resultant_color: "#ef4444".to_string(),
            font_family: "DejaVu Sans, Arial, sans-serif".to_string(),
        }
    }
}

impl ChartStyle {
    pub fn validate(&self) -> BalanceResult<()> {
        if !(self.size.is_finite() && self.size > 2.0 * CHART_MARGIN) {
            return Err(BalanceError::invalid_input(
                "chart.size",
                self.size.to_string(),
                format!("Chart size must be larger than {}", 2.0 * CHART_MARGIN),
            ));
        }
        if self.rings == 0 {
            return Err(BalanceError::invalid_input("chart.rings", "0", "At least one ring is required"));
        }
        if !(self.spoke_step_deg > 0.0 && self.spoke_step_deg <= 360.0) {
            return Err(BalanceError::invalid_input(
                "chart.spoke_step_deg",
                self.spoke_step_deg.to_string(),
                "Spoke step must be in (0, 360]",
            ));
        }
        Ok(())
    }
}

/// One line from the origin to `(magnitude, angle)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarTrace {
    pub label: String,
    pub magnitude: f64,
    /// Degrees, counter-clockwise from the top
    pub angle: f64,
}

/// Everything needed to draw the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarChart {
    /// One trace per blade, in input order
    pub blades: Vec<PolarTrace>,
    /// The resultant, `None` for an empty analysis
    pub resultant: Option<PolarTrace>,
    /// Magnitude at the outer ring
    pub scale_max: f64,
}

impl PolarChart {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let blades: Vec<PolarTrace> = analysis
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| PolarTrace {
                label: r.label(i),
                magnitude: r.magnitude,
                angle: r.phase,
            })
            .collect();

        let resultant = (!analysis.is_empty()).then(|| PolarTrace {
            label: "Resultant".to_string(),
            magnitude: analysis.resultant.magnitude,
            angle: analysis.resultant.angle,
        });

        let largest = analysis.max_blade_magnitude().max(analysis.resultant.magnitude);

        PolarChart {
            blades,
            resultant,
            scale_max: nice_ceiling(largest),
        }
    }

    /// Render a standalone SVG document.
    pub fn to_svg(&self, style: &ChartStyle) -> String {
        let size = style.size;
        let center = size / 2.0;
        let radius = center - CHART_MARGIN;
        let rings = style.rings.max(1);
        let px_per_unit = radius / self.scale_max;

        // Style strings come from user settings and land inside attributes
        let background = xml_escape(&style.background);
        let grid_color = xml_escape(&style.grid_color);
        let text_color = xml_escape(&style.text_color);
        let blade_color = xml_escape(&style.blade_color);
        let resultant_color = xml_escape(&style.resultant_color);
        let font_family = xml_escape(&style.font_family);

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg viewBox="0 0 {size} {size}" width="{size}" height="{size}" xmlns="http://www.w3.org/2000/svg">"#
        ));
        svg.push_str(&format!(
            r#"<rect x="0" y="0" width="{size}" height="{size}" fill="{}"/>"#,
            background
        ));

        // Rings with magnitude labels
        for i in 1..=rings {
            let value = self.scale_max * i as f64 / rings as f64;
            let r = value * px_per_unit;
            svg.push_str(&format!(
                r#"<circle cx="{center:.1}" cy="{center:.1}" r="{r:.1}" fill="none" stroke="{}" stroke-width="1"/>"#,
                grid_color
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="10" fill="{}" font-family="{}">{}</text>"#,
                center + 3.0,
                center - r - 3.0,
                text_color,
                font_family,
                format_tick(value)
            ));
        }

        // Spokes with angle labels
        let mut angle = 0.0;
        while angle < 360.0 - 1e-9 {
            let (x, y) = to_screen(center, radius, angle);
            svg.push_str(&format!(
                r#"<line x1="{center:.1}" y1="{center:.1}" x2="{x:.1}" y2="{y:.1}" stroke="{}" stroke-width="1"/>"#,
                grid_color
            ));
            let (lx, ly) = to_screen(center, radius + 16.0, angle);
            svg.push_str(&format!(
                r#"<text x="{lx:.1}" y="{:.1}" font-size="11" fill="{}" font-family="{}" text-anchor="middle">{}°</text>"#,
                ly + 4.0,
                text_color,
                font_family,
                format_angle(angle)
            ));
            angle += style.spoke_step_deg;
        }

        // Individual blade traces
        for trace in &self.blades {
            let (x, y) = to_screen(center, trace.magnitude * px_per_unit, trace.angle);
            svg.push_str(&format!(
                r#"<line x1="{center:.1}" y1="{center:.1}" x2="{x:.2}" y2="{y:.2}" stroke="{}" stroke-width="1"><title>{}: {} @ {}°</title></line>"#,
                blade_color,
                xml_escape(&trace.label),
                trace.magnitude,
                trace.angle
            ));
        }

        // Resultant on top
        if let Some(resultant) = &self.resultant {
            let (x, y) = to_screen(center, resultant.magnitude * px_per_unit, resultant.angle);
            svg.push_str(&format!(
                r#"<line x1="{center:.1}" y1="{center:.1}" x2="{x:.2}" y2="{y:.2}" stroke="{}" stroke-width="4" stroke-linecap="round"/>"#,
                resultant_color
            ));
            svg.push_str(&format!(
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="{MIN_MARKER_RADIUS}" fill="{}"><title>Resultant: {:.6} @ {:.2}°</title></circle>"#,
                resultant_color, resultant.magnitude, resultant.angle
            ));
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Screen position of a point `r` px from the centre at `angle_deg`
/// (0° up, counter-clockwise).
fn to_screen(center: f64, r: f64, angle_deg: f64) -> (f64, f64) {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    (center - r * sin, center - r * cos)
}

/// Round up to 1, 2, or 5 times a power of ten. Non-positive input maps to 1.
fn nice_ceiling(value: f64) -> f64 {
    if !(value.is_finite() && value > 0.0) {
        return 1.0;
    }
    let exponent = value.log10().floor();
    let base = 10f64.powf(exponent);
    let fraction = value / base;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

fn format_tick(value: f64) -> String {
    if value >= 100.0 {
        format!("{:.0}", value)
    } else if value >= 1.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.3}", value)
    }
}

fn format_angle(angle: f64) -> String {
    if angle.fract() == 0.0 {
        format!("{:.0}", angle)
    } else {
        format!("{:.1}", angle)
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
