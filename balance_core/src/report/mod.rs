//! # Reports
//!
//! Static reports built from one [`Analysis`]. Each output format has its own
//! [`ReportRenderer`]; callers pick one with [`renderer_for`] and get bytes
//! back, ready to be written with [`crate::file_io::write_atomic`].
//!
//! ## Formats
//!
//! - [`ReportFormat::Html`] - single self-contained page with inline SVG chart
//! - [`ReportFormat::Pdf`] - Typst-compiled PDF
//! - [`ReportFormat::Json`] - versioned [`json::ReportDocument`], loadable again
//! - [`ReportFormat::Svg`] - the polar chart alone
//!
//! ## Example
//!
//! ```rust
//! use balance_core::analysis::analyze;
//! use balance_core::report::{renderer_for, Report, ReportFormat, ReportMeta};
//! use balance_core::settings::Settings;
//!
//! let settings = Settings::default();
//! let analysis = analyze("10 0\n12 120\n9 240", &settings).unwrap();
//! let report = Report::new(ReportMeta::from_settings(&settings.report), analysis, settings.chart.clone());
//!
//! let html = renderer_for(ReportFormat::Html).render(&report).unwrap();
//! assert!(String::from_utf8(html).unwrap().contains("Resultant"));
//! ```

pub mod html;
pub mod json;
pub mod mailto;
pub mod pdf;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::Analysis;
use crate::chart::{ChartStyle, PolarChart};
use crate::errors::{BalanceError, BalanceResult};
use crate::file_io::write_atomic;
use crate::settings::ReportSettings;

pub use html::HtmlRenderer;
pub use json::{JsonRenderer, ReportDocument};
pub use pdf::PdfRenderer;

/// Report header data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Unique report number
    pub id: Uuid,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub customer: String,
    pub engineer: String,
    /// Recipient of the order-request link
    pub contact_email: String,
}

impl ReportMeta {
    pub fn new(
        title: impl Into<String>,
        customer: impl Into<String>,
        engineer: impl Into<String>,
        contact_email: impl Into<String>,
    ) -> Self {
        ReportMeta {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            title: title.into(),
            customer: customer.into(),
            engineer: engineer.into(),
            contact_email: contact_email.into(),
        }
    }

    pub fn from_settings(settings: &ReportSettings) -> Self {
        ReportMeta::new(
            settings.title.clone(),
            settings.customer.clone(),
            settings.engineer.clone(),
            settings.contact_email.clone(),
        )
    }

    /// First 8 hex digits of the id, for page footers
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub meta: ReportMeta,
    pub analysis: Analysis,
    pub chart_style: ChartStyle,
}

impl Report {
    pub fn new(meta: ReportMeta, analysis: Analysis, chart_style: ChartStyle) -> Self {
        Report {
            meta,
            analysis,
            chart_style,
        }
    }

    /// The polar chart SVG for this report
    pub fn chart_svg(&self) -> String {
        PolarChart::from_analysis(&self.analysis).to_svg(&self.chart_style)
    }

    /// The order-request `mailto:` link for this report
    pub fn order_link(&self) -> String {
        mailto::order_request_link(&self.meta.contact_email, &self.analysis)
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Pdf,
    Json,
    Svg,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [
        ReportFormat::Html,
        ReportFormat::Pdf,
        ReportFormat::Json,
        ReportFormat::Svg,
    ];

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Pdf => "pdf",
            ReportFormat::Json => "json",
            ReportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('.').to_ascii_lowercase();
        ReportFormat::ALL
            .into_iter()
            .find(|format| format.extension() == wanted)
            .ok_or_else(|| {
                BalanceError::invalid_input("format", s, "Expected one of: html, pdf, json, svg")
            })
    }
}

/// A report output format.
pub trait ReportRenderer {
    fn format(&self) -> ReportFormat;

    fn render(&self, report: &Report) -> BalanceResult<Vec<u8>>;
}

/// Polar chart alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl ReportRenderer for SvgRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Svg
    }

    fn render(&self, report: &Report) -> BalanceResult<Vec<u8>> {
        Ok(report.chart_svg().into_bytes())
    }
}

/// Pick the renderer for a format.
pub fn renderer_for(format: ReportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Html => Box::new(HtmlRenderer),
        ReportFormat::Pdf => Box::new(PdfRenderer),
        ReportFormat::Json => Box::new(JsonRenderer),
        ReportFormat::Svg => Box::new(SvgRenderer),
    }
}

/// Render `report` as `format` and write it atomically to `path`.
pub fn render_to_file(report: &Report, format: ReportFormat, path: &Path) -> BalanceResult<()> {
    let bytes = renderer_for(format).render(report)?;
    write_atomic(path, &bytes)?;
    info!(
        "{} report {} written to {} ({} bytes)",
        format,
        report.meta.short_id(),
        path.display(),
        bytes.len()
    );
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::blade::BladeRecord;
    use crate::tolerance::Thresholds;

    pub(crate) fn sample_report() -> Report {
        let analysis = Analysis::from_records(
            vec![
                BladeRecord::with_serial("S01", 211522.842, 0.0),
                BladeRecord::with_serial("S02", 211621.13, 3.913),
                BladeRecord::with_serial("S03", 211498.5, 7.826),
            ],
            Thresholds::new(1.0, 10.0).unwrap(),
        );
        Report::new(
            ReportMeta::new("Blade Vector Analysis", "Unit 2 LP", "J. Kim", "orders@example.com"),
            analysis,
            ChartStyle::default(),
        )
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("PDF".parse::<ReportFormat>().unwrap(), ReportFormat::Pdf);
        assert_eq!(".html".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert!("docx".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_renderer_for_matches_format() {
        for format in ReportFormat::ALL {
            assert_eq!(renderer_for(format).format(), format);
        }
    }

    #[test]
    fn test_svg_renderer() {
        let bytes = SvgRenderer.render(&sample_report()).unwrap();
        assert!(bytes.starts_with(b"<svg"));
    }

    #[test]
    fn test_render_to_file() {
        let path = std::env::temp_dir().join("bbal_test_report.html");
        render_to_file(&sample_report(), ReportFormat::Html, &path).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Unit 2 LP"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_short_id() {
        let meta = ReportMeta::new("t", "c", "e", "x@y.z");
        assert_eq!(meta.short_id().len(), 8);
    }
}
