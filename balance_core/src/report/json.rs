//! Machine-readable export of an analysis.
//!
//! The document carries a `schema_version` so that
//! [`crate::file_io::load_report_document`] can refuse files written by an
//! incompatible release.

use serde::{Deserialize, Serialize};

use super::{Report, ReportFormat, ReportMeta, ReportRenderer};
use crate::analysis::Analysis;
use crate::errors::{BalanceError, BalanceResult};

/// Current export schema version
pub const SCHEMA_VERSION: &str = "0.1.0";

/// On-disk form of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub schema_version: String,
    pub meta: ReportMeta,
    pub analysis: Analysis,
}

impl ReportDocument {
    pub fn from_report(report: &Report) -> Self {
        ReportDocument {
            schema_version: SCHEMA_VERSION.to_string(),
            meta: report.meta.clone(),
            analysis: report.analysis.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> BalanceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BalanceError::SerializationError {
            reason: e.to_string(),
        })
    }
}

/// Pretty-printed [`ReportDocument`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, report: &Report) -> BalanceResult<Vec<u8>> {
        Ok(ReportDocument::from_report(report).to_json_pretty()?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_json_carries_schema_and_results() {
        let bytes = JsonRenderer.render(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["analysis"]["class"], "CRITICAL");
        assert_eq!(value["analysis"]["records"].as_array().unwrap().len(), 3);
        assert_eq!(value["meta"]["customer"], "Unit 2 LP");
    }

    #[test]
    fn test_document_reads_back() {
        let report = sample_report();
        let json = ReportDocument::from_report(&report).to_json_pretty().unwrap();
        let doc: ReportDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.meta, report.meta);
        assert_eq!(doc.analysis.blade_count(), 3);
        assert_eq!(doc.analysis.records[1].serial.as_deref(), Some("S02"));
        assert_eq!(doc.analysis.class, report.analysis.class);
    }
}
