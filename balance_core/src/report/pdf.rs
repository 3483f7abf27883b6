//! # PDF Report
//!
//! Compiles the analysis report with Typst.
//!
//! ## Architecture
//!
//! - The Typst template is an embedded string constant
//! - Data is injected with `{{PLACEHOLDER}}` replacement before compilation
//! - The polar chart is served to Typst as the virtual file `chart.svg`
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)

use chrono::{Datelike, Utc};
use log::debug;
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use super::{Report, ReportFormat, ReportRenderer};
use crate::analysis::EMPTY_PLACEHOLDER;
use crate::equations::{generate_appendix_typst, synthesis_equations};
use crate::errors::{BalanceError, BalanceResult};
use crate::tolerance::ToleranceClass;

/// Virtual path the template uses for the chart image
const CHART_FILE: &str = "chart.svg";

/// Bundled fonts, parsed on first use.
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    let fonts: Vec<Font> = typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
        .collect();
    debug!("loaded {} bundled fonts for PDF rendering", fonts.len());
    fonts
});

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world: one in-memory source plus the chart SVG.
struct PdfWorld {
    main: Source,
    chart_svg: Bytes,
    book: LazyHash<FontBook>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String, chart_svg: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            chart_svg: Bytes::new(chart_svg.into_bytes()),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = id.vpath().as_rootless_path();
        if path == std::path::Path::new(CHART_FILE) {
            Ok(self.chart_svg.clone())
        } else {
            Err(FileError::NotFound(path.into()))
        }
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

// ============================================================================
// PDF Template
// ============================================================================

const REPORT_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[B-Balance Blade Vector Analysis]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Report: {{REPORT_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{TITLE}}]
  ]
]

#v(12pt)

#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
  [Customer:], [{{CUSTOMER}}],
  [Engineer:], [{{ENGINEER}}],
  [Date:], [{{DATE}}],
  [Blades:], [{{BLADE_COUNT}}],
  [Skipped lines:], [{{SKIPPED_COUNT}}],
)

#v(12pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

{{BODY}}

#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

#text(size: 9pt, fill: gray)[
  Request an optimized blade arrangement: #link("{{ORDER_LINK}}")[{{CONTACT_EMAIL}}]
]
"##;

const RESULTS_TEMPLATE: &str = r##"
== Resultant Unbalance

#table(
  columns: (1fr, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Quantity*], [*Value*]),
  [Magnitude], [{{MAGNITUDE}}],
  [Angle], [{{ANGLE}}°],
  [Sum of X components], [{{SUM_X}}],
  [Sum of Y components], [{{SUM_Y}}],
  [Warn threshold], [{{WARN}}],
  [Critical threshold], [{{CRITICAL}}],
)

#v(12pt)

#align(center)[
  #block(width: auto, fill: rgb("{{CLASS_FILL}}"), inset: 16pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[{{HEADLINE}}]
    #v(4pt)
    #text(size: 10pt)[{{DIAGNOSIS}}]
  ]
]

#v(12pt)

== Polar Chart

#align(center)[#image("chart.svg", width: 70%)]

== Blade Data

#table(
  columns: (auto, 1fr, 1fr),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, right),
  table.header([*Blade*], [*Magnitude*], [*Phase (deg)*]),
{{BLADE_ROWS}}
)
"##;

// ============================================================================
// Renderer
// ============================================================================

/// Typst-backed PDF report.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl ReportRenderer for PdfRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    fn render(&self, report: &Report) -> BalanceResult<Vec<u8>> {
        let source = build_typst_source(report);
        let world = PdfWorld::new(source, report.chart_svg());

        let warned = typst::compile(&world);
        let document = warned.output.map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
            BalanceError::render_error(
                "pdf",
                format!("Typst compilation failed: {}", error_msgs.join("; ")),
            )
        })?;

        typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
            BalanceError::render_error(
                "pdf",
                format!("PDF rendering failed: {}", error_msgs.join("; ")),
            )
        })
    }
}

/// Fill the templates with the report data.
fn build_typst_source(report: &Report) -> String {
    let analysis = &report.analysis;
    let meta = &report.meta;

    let body = if analysis.is_empty() {
        format!(
            "#block(width: 100%, fill: rgb(\"#f8fafc\"), inset: 16pt, radius: 4pt)[{}]\n",
            escape_typst(EMPTY_PLACEHOLDER)
        )
    } else {
        let resultant = &analysis.resultant;
        let mut results = fill_template(
            RESULTS_TEMPLATE,
            &[
                ("MAGNITUDE", format!("{:.6}", resultant.magnitude)),
                ("ANGLE", format!("{:.2}", resultant.angle)),
                ("SUM_X", format!("{:.6}", resultant.sum_x)),
                ("SUM_Y", format!("{:.6}", resultant.sum_y)),
                ("WARN", analysis.thresholds.warn.to_string()),
                ("CRITICAL", analysis.thresholds.critical.to_string()),
                ("CLASS_FILL", class_fill(analysis.class).to_string()),
                ("HEADLINE", analysis.class.headline().to_string()),
                ("DIAGNOSIS", analysis.class.diagnosis().to_string()),
                ("BLADE_ROWS", build_blade_rows(report)),
            ],
        );
        results.push_str(&generate_appendix_typst(&synthesis_equations()));
        results
    };

    fill_template(
        REPORT_TEMPLATE,
        &[
            ("REPORT_ID", meta.short_id()),
            ("DATE", meta.generated_at.format("%Y-%m-%d").to_string()),
            ("TITLE", escape_typst(&meta.title)),
            ("CUSTOMER", escape_typst(&meta.customer)),
            ("ENGINEER", escape_typst(&meta.engineer)),
            ("BLADE_COUNT", analysis.blade_count().to_string()),
            ("SKIPPED_COUNT", analysis.skipped_count().to_string()),
            ("ORDER_LINK", escape_typst_string(&report.order_link())),
            ("CONTACT_EMAIL", escape_typst(&meta.contact_email)),
            ("BODY", body),
        ],
    )
}

/// Replace each `{{KEY}}` in `template` with its value in one pass.
///
/// Inserted values are never scanned again, so user text that looks like a
/// placeholder stays literal. Unknown keys are left as they are.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let filled = after.find("}}").and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, value))
        });
        match filled {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn class_fill(class: ToleranceClass) -> &'static str {
    match class {
        ToleranceClass::Stable => "#d4edda",
        ToleranceClass::Attention => "#fff3cd",
        ToleranceClass::Critical => "#f8d7da",
    }
}

fn build_blade_rows(report: &Report) -> String {
    report
        .analysis
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!(
                "  [{}], [{:.3}], [{:.3}],",
                escape_typst(&record.label(i)),
                record.magnitude,
                record.phase
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape special Typst characters in user-provided markup text.
///
/// Covers inline markup and the characters that open comments (`//`, `/*`),
/// headings, lists or shorthands (`=`, `-`, `+`, `~`).
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            '/' => "\\/".to_string(),
            '=' => "\\=".to_string(),
            '-' => "\\-".to_string(),
            '+' => "\\+".to_string(),
            '~' => "\\~".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Escape text placed inside a Typst string literal
fn escape_typst_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_pdf_generation() {
        let pdf = PdfRenderer.render(&sample_report());

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_empty_report_still_renders() {
        let mut report = sample_report();
        report.analysis.records.clear();
        let source = build_typst_source(&report);
        assert!(source.contains("No blade data yet"));
        assert!(!source.contains("chart.svg"));

        let pdf_bytes = PdfRenderer.render(&report).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_source_carries_results() {
        let source = build_typst_source(&sample_report());
        assert!(source.contains("[S02], [211621.130], [3.913],"));
        assert!(source.contains("Appendix: List of Equations"));
        assert!(source.contains("mailto:orders@example.com"));
        assert!(!source.contains("{{"));
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("#1 [draft]"), "\\#1 \\[draft\\]");
        assert_eq!(escape_typst("a@b.c"), "a\\@b.c");
        assert_eq!(escape_typst_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_typst("a // b"), "a \\/\\/ b");
        assert_eq!(escape_typst("= x - y"), "\\= x \\- y");
    }

    #[test]
    fn test_comment_markers_in_user_text_render() {
        let mut report = sample_report();
        report.analysis.records[1].serial = Some("S//1".to_string());
        report.meta.customer = "Unit 2 // LP /* rig */".to_string();
        report.meta.title = "= Stage 3 - LP".to_string();

        let source = build_typst_source(&report);
        assert!(source.contains("[S\\/\\/1]"));
        assert!(source.contains("Unit 2 \\/\\/ LP"));

        let pdf_bytes = PdfRenderer.render(&report).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_placeholder_text_in_metadata_stays_literal() {
        let mut report = sample_report();
        report.meta.title = "{{BODY}}".to_string();
        report.meta.customer = "{{TITLE}}".to_string();

        let source = build_typst_source(&report);
        assert!(source.contains("[{{BODY}}]"));
        assert!(source.contains("[{{TITLE}}]"));
        assert_eq!(source.matches("== Resultant Unbalance").count(), 1);
        assert_eq!(source.matches("Appendix: List of Equations").count(), 1);

        let pdf_bytes = PdfRenderer.render(&report).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_fill_template_single_pass() {
        let filled = fill_template(
            "{{A}} and {{B}} and {{C}}",
            &[("A", "{{B}}".to_string()), ("B", "b".to_string())],
        );
        assert_eq!(filled, "{{B}} and b and {{C}}");
    }
}
