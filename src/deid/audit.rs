//! Audit logger for de-identification runs
//!
//! One entry per written file. Original values are stored only as SHA-256
//! hashes; plaintext never reaches the log.

use crate::deid::actions::ActionRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    source: String,
    output: String,
    changes_count: usize,
    changes: Vec<AuditChange>,
}

/// Audit change entry (with hashed original value)
#[derive(Debug, Serialize)]
struct AuditChange {
    tag: String,
    keyword: String,
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value_hash: Option<String>,
}

/// Audit logger for de-identification operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory if needed
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
        })
    }

    /// Log the changes made while producing one output file
    pub fn log_file(&self, source: &Path, output: &Path, changes: &[ActionRecord]) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: source.display().to_string(),
            output: output.display().to_string(),
            changes_count: changes.len(),
            changes: changes
                .iter()
                .map(|change| AuditChange {
                    tag: change.tag.to_string(),
                    keyword: change.keyword.clone(),
                    action: change.action,
                    value_hash: change.original.as_deref().map(hash_value),
                })
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Source: {} | Output: {} | Changes: {}",
                entry.timestamp, entry.source, entry.output, entry.changes_count
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

/// SHA-256 of a value, hex encoded
fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_dictionary_std::tags;
    use tempfile::tempdir;

    #[test]
    fn test_hash_value() {
        assert_eq!(hash_value("Doe^John"), hash_value("Doe^John"));
        assert_ne!(hash_value("Doe^John"), hash_value("Roe^Jane"));
    }

    #[test]
    fn test_log_file_never_contains_plaintext() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit").join("deid.log");
        let logger = AuditLogger::new(log_path.clone(), true).unwrap();

        let change = ActionRecord {
            tag: tags::PATIENT_NAME,
            keyword: "PatientName".to_string(),
            action: "REMOVE",
            original: Some("Doe^John".to_string()),
        };
        logger
            .log_file(Path::new("in/0002.DCM"), Path::new("out/0002.DCM"), &[change])
            .unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("in/0002.DCM"));
        assert!(content.contains("PatientName"));
        assert!(!content.contains("Doe^John"));
    }
}
