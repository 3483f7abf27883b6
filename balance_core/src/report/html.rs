//! Self-contained HTML report: inline CSS, inline SVG chart, no scripts.

use super::{Report, ReportFormat, ReportRenderer};
use crate::analysis::EMPTY_PLACEHOLDER;
use crate::equations::synthesis_equations;
use crate::errors::BalanceResult;
use crate::tolerance::ToleranceClass;

const STYLE: &str = concat!(
    ":root{--bg:#f8fafc;--fg:#0f172a;--muted:#64748b;--card:#ffffff;--border:#e2e8f0;",
    "--accent:#1e40af;--ok:#16a34a;--warn:#d97706;--err:#dc2626}",
    " body{margin:0;background:var(--bg);color:var(--fg);",
    "font-family:Segoe UI,system-ui,-apple-system,Arial,sans-serif}",
    " .container{max-width:1100px;margin:0 auto;padding:24px}",
    " .header{display:flex;align-items:flex-end;justify-content:space-between;gap:12px;",
    "margin-bottom:16px;border-bottom:3px solid var(--accent);padding-bottom:12px}",
    " .title{font-size:22px;font-weight:700;color:var(--accent)}",
    " .sub{color:var(--muted);font-size:13px}",
    " .grid{display:grid;grid-template-columns:repeat(4,minmax(0,1fr));gap:12px}",
    " .card{background:var(--card);border:1px solid var(--border);border-radius:10px;",
    "padding:14px;box-shadow:0 1px 0 rgba(0,0,0,.04)}",
    " .hero{text-align:center;padding:28px;background:#eff6ff;border:1px solid #bfdbfe}",
    " .hero .value{font-size:56px;font-weight:700;color:var(--accent);margin:6px 0}",
    " .hero .angle{font-size:20px;color:var(--accent)}",
    " .metric .label{color:var(--muted);font-size:12px}",
    " .metric .value{font-size:20px;font-weight:700}",
    " .section{margin-top:18px}",
    " .section h3{margin:0 0 10px 0;font-size:16px;font-weight:600}",
    " .split{display:grid;grid-template-columns:3fr 2fr;gap:12px}",
    " .status{border-left:6px solid var(--muted)}",
    " .status.ok{border-left-color:var(--ok)}",
    " .status.warn{border-left-color:var(--warn)}",
    " .status.err{border-left-color:var(--err)}",
    " .status h4{margin:0 0 6px 0;font-size:18px}",
    " .table{width:100%;border-collapse:separate;border-spacing:0;background:var(--card);",
    "border:1px solid var(--border);border-radius:10px;overflow:hidden}",
    " .table th{background:#f1f5f9;text-align:left;font-weight:600;padding:8px 10px;",
    "border-bottom:1px solid var(--border)}",
    " .table td{padding:8px 10px;border-bottom:1px solid var(--border)}",
    " .table td.num{text-align:right;font-family:Consolas,Monaco,monospace}",
    " .code{font-family:Consolas,Monaco,monospace;background:#f1f5f9;border-radius:6px;",
    "padding:2px 6px}",
    " .button{display:block;text-align:center;background:var(--accent);color:#ffffff;",
    "text-decoration:none;font-weight:700;border-radius:10px;padding:18px;margin-top:10px}",
    " .placeholder{text-align:center;color:var(--muted);padding:48px}",
    " .chart svg{width:100%;height:auto}",
    " .footer{margin-top:22px;color:var(--muted);font-size:12px;text-align:center}",
    " @media (max-width:900px){.grid{grid-template-columns:repeat(2,minmax(0,1fr))}",
    ".split{grid-template-columns:1fr}}",
);

/// Single-page HTML report.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn render(&self, report: &Report) -> BalanceResult<Vec<u8>> {
        Ok(render_html(report).into_bytes())
    }
}

/// Build the full page.
pub fn render_html(report: &Report) -> String {
    let meta = &report.meta;
    let analysis = &report.analysis;

    let mut s = String::new();
    s.push_str(concat!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">",
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    ));
    s.push_str(&format!(
        "<title>{}</title><style>{}</style></head><body><div class=\"container\">",
        html_escape(&meta.title),
        STYLE
    ));

    s.push_str(&format!(
        "<div class=\"header\"><div><div class=\"title\">{}</div>",
        html_escape(&meta.title)
    ));
    s.push_str(&format!(
        "<div class=\"sub\">Customer: {} | Engineer: {}</div></div>",
        html_escape(&meta.customer),
        html_escape(&meta.engineer)
    ));
    s.push_str(&format!(
        "<div class=\"sub\">{} | Report {}</div></div>",
        meta.generated_at.format("%Y-%m-%d %H:%M UTC"),
        meta.short_id()
    ));

    if analysis.is_empty() {
        s.push_str(&format!(
            "<div class=\"card placeholder\">{}</div>",
            html_escape(EMPTY_PLACEHOLDER)
        ));
        if analysis.skipped_count() > 0 {
            s.push_str(&format!(
                "<div class=\"section sub\">{} input line(s) could not be read.</div>",
                analysis.skipped_count()
            ));
        }
        s.push_str(&footer(report));
        s.push_str("</div></body></html>");
        return s;
    }

    let resultant = &analysis.resultant;
    s.push_str(concat!(
        "<div class=\"card hero\">",
        "<div class=\"sub\">Total Resultant Unbalance (Static Moment Sum)</div>"
    ));
    s.push_str(&format!("<div class=\"value\">{:.6}</div>", resultant.magnitude));
    s.push_str(&format!(
        "<div class=\"angle\">at Vector Angle: <b>{:.2}°</b></div></div>",
        resultant.angle
    ));

    s.push_str("<div class=\"section grid\">");
    s.push_str(&metric("Blades", &analysis.blade_count().to_string()));
    s.push_str(&metric("Skipped Lines", &analysis.skipped_count().to_string()));
    s.push_str(&metric("Sum X", &format!("{:.6}", resultant.sum_x)));
    s.push_str(&metric("Sum Y", &format!("{:.6}", resultant.sum_y)));
    s.push_str("</div>");

    s.push_str("<div class=\"section split\">");
    s.push_str(&format!(
        "<div class=\"card chart\"><h3>Polar Vector Map</h3>{}</div>",
        report.chart_svg()
    ));
    s.push_str("<div>");
    s.push_str(&format!(
        concat!(
            "<div class=\"card status {}\"><h4>{}</h4><div>{}</div>",
            "<div class=\"sub\" style=\"margin-top:8px\">Warn {} | Critical {}</div></div>"
        ),
        status_class(analysis.class),
        analysis.class.headline(),
        analysis.class.diagnosis(),
        analysis.thresholds.warn,
        analysis.thresholds.critical
    ));
    s.push_str(&format!(
        "<a class=\"button\" href=\"{}\">Request Optimized Blade Arrangement</a>",
        html_escape(&report.order_link())
    ));
    s.push_str("</div></div>");

    if !analysis.skipped.is_empty() {
        s.push_str(&table_open("Skipped Lines", &["Line", "Content", "Reason"]));
        for skipped in &analysis.skipped {
            s.push_str(&format!(
                "<tr><td>{}</td><td><span class=\"code\">{}</span></td><td>{}</td></tr>",
                skipped.line_number,
                html_escape(&skipped.content),
                html_escape(&skipped.reason)
            ));
        }
        s.push_str(TABLE_CLOSE);
    }

    s.push_str(&table_open("Blade Data", &["Blade", "Magnitude", "Phase (deg)"]));
    for (i, record) in analysis.records.iter().enumerate() {
        s.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{:.3}</td><td class=\"num\">{:.3}</td></tr>",
            html_escape(&record.label(i)),
            record.magnitude,
            record.phase
        ));
    }
    s.push_str(TABLE_CLOSE);

    s.push_str(&table_open("Equations", &["Step", "Formula"]));
    for equation in synthesis_equations() {
        let m = equation.metadata();
        s.push_str(&format!(
            "<tr><td>{}</td><td><span class=\"code\">{}</span></td></tr>",
            m.name,
            html_escape(m.formula_plain)
        ));
    }
    s.push_str(TABLE_CLOSE);

    s.push_str(&footer(report));
    s.push_str("</div></body></html>");
    s
}

const TABLE_CLOSE: &str = "</tbody></table></div>";

/// Section heading plus table header row.
fn table_open(heading: &str, columns: &[&str]) -> String {
    let header: String = columns.iter().map(|c| format!("<th>{}</th>", c)).collect();
    format!(
        concat!(
            "<div class=\"section\"><h3>{}</h3>",
            "<table class=\"table\"><thead><tr>{}</tr></thead><tbody>"
        ),
        heading, header
    )
}

fn metric(label: &str, value: &str) -> String {
    format!(
        concat!(
            "<div class=\"card metric\"><div class=\"label\">{}</div>",
            "<div class=\"value\">{}</div></div>"
        ),
        label, value
    )
}

fn status_class(class: ToleranceClass) -> &'static str {
    match class {
        ToleranceClass::Stable => "ok",
        ToleranceClass::Attention => "warn",
        ToleranceClass::Critical => "err",
    }
}

fn footer(report: &Report) -> String {
    format!(
        "<div class=\"footer\">B-Balance Blade Vector Analysis | {}</div>",
        html_escape(&report.meta.contact_email)
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
