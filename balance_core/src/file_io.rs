//! # File I/O Module
//!
//! File operations with safety features:
//! - **Atomic saves**: write to `.tmp`, sync, rename, so a crash never leaves
//!   a half-written report or settings file behind
//! - **Version validation**: exported analyses are checked for schema
//!   compatibility before they are trusted
//!
//! ## Example
//!
//! ```rust,no_run
//! use balance_core::file_io::{load_report_document, save_report_document};
//! use balance_core::report::{Report, ReportDocument};
//! use std::path::Path;
//!
//! # fn demo(report: &Report) -> balance_core::errors::BalanceResult<()> {
//! let path = Path::new("rotor_a.json");
//! save_report_document(&ReportDocument::from_report(report), path)?;
//! let doc = load_report_document(path)?;
//! println!("{} blades", doc.analysis.blade_count());
//! # Ok(())
//! # }
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{BalanceError, BalanceResult};
use crate::report::json::SCHEMA_VERSION;
use crate::report::ReportDocument;

/// Write `bytes` to `path` atomically.
///
/// # Process
///
/// 1. Write to `<path>.tmp`
/// 2. Sync to disk (fsync)
/// 3. Rename over the final path
///
/// On failure the temp file is removed and the destination is untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> BalanceResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        BalanceError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BalanceError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BalanceError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BalanceError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Read a UTF-8 text file (pasted blade data, settings).
pub fn read_text(path: &Path) -> BalanceResult<String> {
    fs::read_to_string(path)
        .map_err(|e| BalanceError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Save an exported analysis as pretty JSON.
pub fn save_report_document(doc: &ReportDocument, path: &Path) -> BalanceResult<()> {
    let json = doc.to_json_pretty()?;
    write_atomic(path, json.as_bytes())
}

/// Load an exported analysis.
///
/// # Errors
///
/// - `FileError` if the file cannot be read
/// - `SerializationError` if the JSON is invalid
/// - `VersionMismatch` if the schema version is incompatible
pub fn load_report_document(path: &Path) -> BalanceResult<ReportDocument> {
    let json = read_text(path)?;
    parse_report_document(&json)
}

/// Parse and version-check an exported analysis.
pub fn parse_report_document(json: &str) -> BalanceResult<ReportDocument> {
    // Check the version before the full parse so an incompatible file
    // reports a version error rather than a field error.
    let raw: serde_json::Value =
        serde_json::from_str(json).map_err(|e| BalanceError::SerializationError {
            reason: e.to_string(),
        })?;
    let file_version = raw
        .get("schema_version")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    validate_version(file_version)?;

    serde_json::from_value(raw).map_err(|e| BalanceError::SerializationError {
        reason: e.to_string(),
    })
}

/// Check schema version compatibility
fn validate_version(file_version: &str) -> BalanceResult<()> {
    let mismatch = || BalanceError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // In 0.x a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 {
        if file_parts[1] > current_parts[1] {
            return Err(mismatch());
        }
    }

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
