//! Raw-text loader
//!
//! Reads a MED raw file into a grid of whitespace-separated tokens. The first
//! `header_lines` lines are skipped unconditionally and blank lines are not
//! rows. Column 0 of every row is the label column (`"0:"`, `"C:"`,
//! `"Subject:"`, ...); the remaining tokens are data cells. Short rows simply
//! have fewer cells: missing cells are never padded or treated as zero.

use crate::config::ExtractConfig;
use crate::types::{DecoderError, Result};
use std::path::{Path, PathBuf};

/// One tokenized row of the raw file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    /// 1-based line number in the source file
    pub line: usize,
    /// Label column token
    pub label: String,
    /// Data cells, at most `var_cols` of them
    pub cells: Vec<String>,
}

/// Tokenized raw file
#[derive(Debug, Clone)]
pub struct RawGrid {
    source: PathBuf,
    var_cols: usize,
    rows: Vec<GridRow>,
}

impl RawGrid {
    /// Load and tokenize a raw file from disk
    pub fn load(path: &Path, config: &ExtractConfig) -> Result<Self> {
        log::info!("Loading MED raw file: {:?}", path);

        let bytes = std::fs::read(path)?;

        // MED-PC writes with the Windows code page; fall back to Latin-1
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Raw file {:?} is not UTF-8, decoding as Latin-1", path);
                e.into_bytes().iter().map(|&b| b as char).collect()
            }
        };

        let grid = Self::parse(&content, path, config)?;
        log::debug!("Loaded {} rows from {:?}", grid.len(), path);
        Ok(grid)
    }

    /// Tokenize raw file contents
    ///
    /// `source` is only used to label errors.
    pub fn parse(content: &str, source: impl Into<PathBuf>, config: &ExtractConfig) -> Result<Self> {
        let source = source.into();
        let max_tokens = config.grid_columns();

        let line_count = content.lines().count();
        if line_count < config.header_lines {
            return Err(DecoderError::FormatError {
                path: source,
                line: line_count,
                reason: format!(
                    "expected at least {} header lines, file has {}",
                    config.header_lines, line_count
                ),
            });
        }

        let mut rows = Vec::new();
        for (idx, text) in content.lines().enumerate().skip(config.header_lines) {
            let line = idx + 1;
            let mut tokens = text.split_whitespace();
            let Some(label) = tokens.next() else {
                continue;
            };
            let cells: Vec<String> = tokens.map(str::to_string).collect();

            if cells.len() + 1 > max_tokens {
                return Err(DecoderError::FormatError {
                    path: source,
                    line,
                    reason: format!(
                        "row has {} tokens, expected at most {} (1 label + {} data columns)",
                        cells.len() + 1,
                        max_tokens,
                        config.var_cols
                    ),
                });
            }

            log::trace!("Row {} (line {}): {} {:?}", rows.len(), line, label, cells);
            rows.push(GridRow {
                line,
                label: label.to_string(),
                cells,
            });
        }

        Ok(Self {
            source,
            var_cols: config.var_cols,
            rows,
        })
    }

    /// Path the grid was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of data columns per row
    pub fn var_cols(&self) -> usize {
        self.var_cols
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&GridRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indices of all rows whose label equals `token`, ascending
    pub fn rows_labeled(&self, token: &str) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.label == token)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Value of a header field such as `Subject: 034`
    ///
    /// Returns the data cells of the first row labeled `<name>:` joined by a
    /// single space, or `None` if there is no such row.
    pub fn field(&self, name: &str) -> Option<String> {
        let label = format!("{}:", name);
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.cells.join(" "))
    }
}
