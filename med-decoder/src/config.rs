//! Extraction configuration types
//!
//! This module defines the knobs that describe the fixed raw-file layout
//! (header size, column count, sentinels) and how the tidy table is written.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a single-file extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Number of data columns per row (the PRINTCOLUMNS setting, default: 5)
    #[serde(default = "default_var_cols")]
    pub var_cols: usize,

    /// Label-column token marking the variable to extract (default: "C:")
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Label-column token starting every array section (default: "0:")
    #[serde(default = "default_section_sentinel")]
    pub section_sentinel: String,

    /// Number of header lines skipped unconditionally (default: 3)
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,

    /// Whether to write a `time,event` header row
    #[serde(default = "default_true")]
    pub write_header: bool,

    /// Strip trailing zeros from the event part (`120.100` -> event `1`)
    #[serde(default)]
    pub trim_event_zeros: bool,

    /// Warn when the file's `Subject:` field differs from the caller's subject
    #[serde(default = "default_true")]
    pub check_subject: bool,
}

fn default_var_cols() -> usize {
    5
}

fn default_marker() -> String {
    "C:".to_string()
}

fn default_section_sentinel() -> String {
    "0:".to_string()
}

fn default_header_lines() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            var_cols: default_var_cols(),
            marker: default_marker(),
            section_sentinel: default_section_sentinel(),
            header_lines: default_header_lines(),
            write_header: true,
            trim_event_zeros: false,
            check_subject: true,
        }
    }
}

impl ExtractConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of data columns
    pub fn with_var_cols(mut self, var_cols: usize) -> Self {
        self.var_cols = var_cols;
        self
    }

    /// Builder method: set the variable marker
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Builder method: set the number of skipped header lines
    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    /// Builder method: enable or disable the header row
    pub fn with_header_row(mut self, enabled: bool) -> Self {
        self.write_header = enabled;
        self
    }

    /// Builder method: enable or disable event zero trimming
    pub fn with_trim_event_zeros(mut self, enabled: bool) -> Self {
        self.trim_event_zeros = enabled;
        self
    }

    /// Builder method: enable or disable the subject cross-check
    pub fn with_subject_check(mut self, enabled: bool) -> Self {
        self.check_subject = enabled;
        self
    }

    /// Check that the configuration describes a usable layout
    pub fn validate(&self) -> Result<()> {
        if self.var_cols == 0 {
            return Err(DecoderError::InvalidConfig(
                "var_cols must be at least 1".to_string(),
            ));
        }
        if self.marker.trim().is_empty() {
            return Err(DecoderError::InvalidConfig("marker must not be empty".to_string()));
        }
        if self.section_sentinel.trim().is_empty() {
            return Err(DecoderError::InvalidConfig(
                "section_sentinel must not be empty".to_string(),
            ));
        }
        if self.marker == self.section_sentinel {
            return Err(DecoderError::InvalidConfig(format!(
                "marker and section_sentinel are both {:?}",
                self.marker
            )));
        }
        Ok(())
    }

    /// Total columns per grid row: one label column plus the data columns
    pub fn grid_columns(&self) -> usize {
        self.var_cols + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::new();
        assert_eq!(config.var_cols, 5);
        assert_eq!(config.marker, "C:");
        assert_eq!(config.section_sentinel, "0:");
        assert_eq!(config.header_lines, 3);
        assert_eq!(config.grid_columns(), 6);
        assert!(config.write_header);
        assert!(!config.trim_event_zeros);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ExtractConfig::new()
            .with_var_cols(2)
            .with_marker("D:")
            .with_header_row(false)
            .with_trim_event_zeros(true);

        assert_eq!(config.var_cols, 2);
        assert_eq!(config.marker, "D:");
        assert!(!config.write_header);
        assert!(config.trim_event_zeros);
    }

    #[test]
    fn test_validate_rejects_bad_layouts() {
        assert!(ExtractConfig::new().with_var_cols(0).validate().is_err());
        assert!(ExtractConfig::new().with_marker(" ").validate().is_err());
        assert!(ExtractConfig::new().with_marker("0:").validate().is_err());
    }
}
