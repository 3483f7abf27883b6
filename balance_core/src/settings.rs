//! # Settings
//!
//! Request-scoped configuration: tolerance band, parser policy, report
//! metadata defaults, and chart style. Stored as TOML; every field is
//! optional and falls back to its default.
//!
//! ## File Example (`bbal.toml`)
//!
//! ```toml
//! [thresholds]
//! warn = 1.0
//! critical = 10.0
//!
//! [parser]
//! malformed_lines = "reject"
//!
//! [report]
//! title = "Blade Vector Analysis"
//! customer = "Plant 3, Unit 2"
//! contact_email = "orders@example.com"
//!
//! [chart]
//! size = 480.0
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::chart::ChartStyle;
use crate::errors::{BalanceError, BalanceResult};
use crate::file_io::write_atomic;
use crate::parser::ParseOptions;
use crate::tolerance::Thresholds;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "bbal.toml";

/// Default report title
pub const DEFAULT_REPORT_TITLE: &str = "Blade Vector Analysis";

/// Default recipient for optimization order requests
pub const DEFAULT_CONTACT_EMAIL: &str = "orders@b-balance.tech";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tolerance band for classification
    pub thresholds: Thresholds,
    /// Parser behaviour for malformed lines
    pub parser: ParseOptions,
    /// Report metadata defaults
    pub report: ReportSettings,
    /// Polar chart style
    pub chart: ChartStyle,
}

/// Report metadata defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Report title
    pub title: String,
    /// Customer / unit description
    pub customer: String,
    /// Engineer responsible for the measurement
    pub engineer: String,
    /// Recipient of the order-request link
    pub contact_email: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            title: DEFAULT_REPORT_TITLE.to_string(),
            customer: String::new(),
            engineer: String::new(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file and validate them.
    pub fn load(path: &Path) -> BalanceResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BalanceError::file_error("read settings", path.display().to_string(), e.to_string())
        })?;
        let settings = Settings::from_toml_str(&content)
            .map_err(|e| BalanceError::config_error(path.display().to_string(), e.to_string()))?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load `path` if given (it must exist), else [`DEFAULT_SETTINGS_FILE`]
    /// when present, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> BalanceResult<Self> {
        match path {
            Some(path) => Settings::load(path),
            None => {
                let fallback = Path::new(DEFAULT_SETTINGS_FILE);
                if fallback.exists() {
                    Settings::load(fallback)
                } else {
                    Ok(Settings::default())
                }
            }
        }
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> BalanceResult<Self> {
        let settings: Settings = toml::from_str(content).map_err(|e| BalanceError::SerializationError {
            reason: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> BalanceResult<String> {
        toml::to_string_pretty(self).map_err(|e| BalanceError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Save settings with atomic write semantics.
    pub fn save(&self, path: &Path) -> BalanceResult<()> {
        let content = self.to_toml_string()?;
        write_atomic(path, content.as_bytes())
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> BalanceResult<()> {
        self.thresholds.validate()?;
        self.chart.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MalformedLinePolicy;
    use std::env::temp_dir;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = Settings::from_toml_str("[thresholds]\nwarn = 1.0\ncritical = 10.0\n").unwrap();
        assert_eq!(settings.thresholds, Thresholds::new(1.0, 10.0).unwrap());
        assert_eq!(settings.parser.malformed_lines, MalformedLinePolicy::Skip);
        assert_eq!(settings.report.title, DEFAULT_REPORT_TITLE);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_reject_policy_from_toml() {
        let settings = Settings::from_toml_str("[parser]\nmalformed_lines = \"reject\"\n").unwrap();
        assert_eq!(settings.parser.malformed_lines, MalformedLinePolicy::Reject);
    }

    #[test]
    fn test_invalid_band_rejected() {
        let err = Settings::from_toml_str("[thresholds]\nwarn = 5.0\ncritical = 1.0\n").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_dir().join("bbal_test_settings_roundtrip.toml");
        let mut settings = Settings::default();
        settings.report.customer = "Unit 4 LP rotor".to_string();
        settings.thresholds = Thresholds::new(1.0, 10.0).unwrap();

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = temp_dir().join("bbal_test_settings_does_not_exist.toml");
        let err = Settings::load_or_default(Some(&path)).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
