//! Run summary
//!
//! Collects per-file outcomes of a batch and renders them to the log or to a
//! JSON file.

use anyhow::{Context, Result};
use med_decoder::{ExtractSummary, SessionInfo};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one file in a batch
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub metadata: SessionInfo,
    pub summary: Option<ExtractSummary>,
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn success(input: PathBuf, metadata: SessionInfo, summary: ExtractSummary) -> Self {
        Self {
            input,
            metadata,
            summary: Some(summary),
            error: None,
        }
    }

    pub fn failure(input: PathBuf, metadata: SessionInfo, error: String) -> Self {
        Self {
            input,
            metadata,
            summary: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    pub rows_written: usize,
    /// True when `on_error = "abort"` stopped the run early
    pub aborted: bool,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new(files: Vec<FileOutcome>, aborted: bool) -> Self {
        let processed = files.iter().filter(|f| f.summary.is_some()).count();
        let rows_written = files
            .iter()
            .filter_map(|f| f.summary.as_ref())
            .map(|s| s.rows)
            .sum();

        Self {
            processed,
            failed: files.len() - processed,
            rows_written,
            aborted,
            files,
        }
    }

    /// Log the totals and every failure
    pub fn log_summary(&self) {
        log::info!(
            "Batch {}: {} processed, {} failed, {} rows written",
            if self.aborted { "aborted" } else { "finished" },
            self.processed,
            self.failed,
            self.rows_written
        );
        for file in self.files.iter().filter(|f| f.error.is_some()) {
            log::warn!(
                "  {:?} {}: {}",
                file.input,
                file.metadata,
                file.error.as_deref().unwrap_or_default()
            );
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run summary")?;
        fs::write(path, json).with_context(|| format!("Failed to write run summary: {:?}", path))?;
        log::info!("Run summary written to {:?}", path);
        Ok(())
    }
}
