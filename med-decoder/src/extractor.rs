//! Main extraction API
//!
//! This module provides the primary interface for the decoder library.
//! `Extractor` runs the single-file pipeline: load → locate → reshape → write.
//! Any failure before the write leaves the output directory untouched.

use crate::config::ExtractConfig;
use crate::grid::RawGrid;
use crate::locator::{locate_block, DataBlock};
use crate::output::{write_tidy_csv, OutputKey};
use crate::reshape::reshape;
use crate::types::{Result, SessionInfo, TidyRow};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of a successful extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    pub key: OutputKey,
    pub output: PathBuf,
    pub rows: usize,
    pub block: DataBlock,
}

/// The main extractor struct - entry point for all extraction operations
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    /// Create a new extractor, validating the configuration
    pub fn new(config: ExtractConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Load a raw file and return the tidy rows of the configured variable
    /// without writing anything
    ///
    /// # Arguments
    /// * `path` - Path to the MED raw file
    /// * `info` - Metadata tuple, used for diagnostics
    pub fn read_rows(&self, path: &Path, info: &SessionInfo) -> Result<(DataBlock, Vec<TidyRow>)> {
        let grid = RawGrid::load(path, &self.config)?;
        self.check_subject(&grid, info);

        let block = locate_block(&grid, &self.config.marker, &self.config.section_sentinel)
            .map_err(|e| e.with_metadata(info))?;
        let rows = reshape(&grid, &block, self.config.trim_event_zeros)?;
        Ok((block, rows))
    }

    /// Extract the configured variable and write `<output_dir>/<key>.csv`
    ///
    /// # Arguments
    /// * `path` - Path to the MED raw file
    /// * `info` - Phase, subject and session; they name the output file
    /// * `output_dir` - Existing directory for the tidy table
    ///
    /// # Example
    /// ```no_run
    /// use med_decoder::{ExtractConfig, Extractor, Label, Phase, SessionInfo};
    /// use std::path::Path;
    ///
    /// let extractor = Extractor::new(ExtractConfig::new()).unwrap();
    /// let info = SessionInfo::new(
    ///     Phase::Sequence(vec![Label::from("A"), Label::from(1i64)]),
    ///     "034",
    ///     1i64,
    /// );
    /// let summary = extractor
    ///     .extract(Path::new("raw/subject034"), &info, Path::new("tidy"))
    ///     .unwrap();
    /// assert_eq!(summary.key.as_str(), "A10341");
    /// ```
    pub fn extract(&self, path: &Path, info: &SessionInfo, output_dir: &Path) -> Result<ExtractSummary> {
        let (block, rows) = self.read_rows(path, info)?;

        let key = OutputKey::new(info);
        let output = key.path_in(output_dir);
        write_tidy_csv(&output, &rows, self.config.write_header)?;

        log::info!(
            "{} -> {:?}: {} events {}",
            path.display(),
            output,
            rows.len(),
            info
        );

        Ok(ExtractSummary {
            key,
            output,
            rows: rows.len(),
            block,
        })
    }

    fn check_subject(&self, grid: &RawGrid, info: &SessionInfo) {
        if let Some(found) = self.subject_mismatch(grid, info) {
            log::warn!(
                "Subject {:?} in {:?} does not match {:?} for {}, check the file name",
                found,
                grid.source(),
                info.subject.to_string(),
                info
            );
        }
    }

    /// The file's `Subject:` value when it differs from the caller's subject
    ///
    /// `None` when the check is disabled, the field is absent, or it matches.
    pub fn subject_mismatch(&self, grid: &RawGrid, info: &SessionInfo) -> Option<String> {
        if !self.config.check_subject {
            return None;
        }
        grid.field("Subject")
            .filter(|found| *found != info.subject.to_string())
    }
}

/// Extract one variable block with the given configuration
///
/// Convenience wrapper around [`Extractor::extract`].
pub fn extract(
    path: &Path,
    info: &SessionInfo,
    output_dir: &Path,
    config: ExtractConfig,
) -> Result<ExtractSummary> {
    Extractor::new(config)?.extract(path, info, output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecoderError;

    #[test]
    fn test_extractor_rejects_invalid_config() {
        let result = Extractor::new(ExtractConfig::new().with_var_cols(0));
        assert!(matches!(result, Err(DecoderError::InvalidConfig(_))));
    }

    fn grid_with_subject(subject_row: &str) -> RawGrid {
        let content = format!("h1\nh2\nh3\n{}C:\n0: 1.1\n", subject_row);
        RawGrid::parse(&content, "subject", &ExtractConfig::new()).unwrap()
    }

    #[test]
    fn test_subject_match_is_not_reported() {
        let extractor = Extractor::new(ExtractConfig::new()).unwrap();
        let grid = grid_with_subject("Subject: 034\n");
        let info = SessionInfo::new("A", "034", 1i64);
        assert_eq!(extractor.subject_mismatch(&grid, &info), None);
    }

    #[test]
    fn test_subject_mismatch_is_reported() {
        let extractor = Extractor::new(ExtractConfig::new()).unwrap();
        let grid = grid_with_subject("Subject: 035\n");
        let info = SessionInfo::new("A", "034", 1i64);
        assert_eq!(extractor.subject_mismatch(&grid, &info).as_deref(), Some("035"));
    }

    #[test]
    fn test_missing_subject_field_is_not_reported() {
        let extractor = Extractor::new(ExtractConfig::new()).unwrap();
        let grid = grid_with_subject("");
        let info = SessionInfo::new("A", "034", 1i64);
        assert_eq!(extractor.subject_mismatch(&grid, &info), None);
    }

    #[test]
    fn test_subject_check_can_be_disabled() {
        let extractor = Extractor::new(ExtractConfig::new().with_subject_check(false)).unwrap();
        let grid = grid_with_subject("Subject: 035\n");
        let info = SessionInfo::new("A", "034", 1i64);
        assert_eq!(extractor.subject_mismatch(&grid, &info), None);
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let info = SessionInfo::new("A", "034", 1i64);
        let result = extract(
            &dir.path().join("does-not-exist"),
            &info,
            dir.path(),
            ExtractConfig::new(),
        );
        assert!(matches!(result, Err(DecoderError::IoError(_))));
    }
}
