//! Section locator
//!
//! Every MED array is written as a label row (`C:`) followed by rows labeled
//! with the array offset of their first cell (`0:`, `5:`, `10:`, ...). The
//! `0:` rows therefore mark the start of every array section. A variable's
//! block starts at the section right after its label row and runs up to the
//! row before the next variable's label row.

use crate::grid::RawGrid;
use crate::types::{DecoderError, Result};
use serde::Serialize;
use std::ops::Range;

/// Ascending row indices of all section-start rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarkers(Vec<usize>);

impl SectionMarkers {
    /// Collect the rows whose label equals `sentinel`
    pub fn find(grid: &RawGrid, sentinel: &str) -> Self {
        let markers = grid.rows_labeled(sentinel);
        if markers.is_empty() {
            log::warn!("No {:?} section markers in {:?}", sentinel, grid.source());
        }
        Self(markers)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Position of the section starting exactly at `row`
    pub fn position_of(&self, row: usize) -> Option<usize> {
        self.0.binary_search(&row).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inclusive row range of the target variable's data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataBlock {
    pub start: usize,
    /// Inclusive; `start - 1` when the block holds no rows
    pub end: usize,
}

impl DataBlock {
    /// Half-open row range covered by the block
    pub fn rows(&self) -> Range<usize> {
        self.start..(self.end + 1).max(self.start)
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}

/// Locate the data block of the variable labeled `marker`
///
/// Fails with `AmbiguousMarker` unless the marker labels exactly one row, and
/// with `StructuralError` when the row after the marker is not a section start.
/// The ambiguous-marker error carries no metadata; callers attach it with
/// [`DecoderError::with_metadata`].
pub fn locate_block(grid: &RawGrid, marker: &str, sentinel: &str) -> Result<DataBlock> {
    let sections = SectionMarkers::find(grid, sentinel);
    let matches = grid.rows_labeled(marker);

    if matches.len() != 1 {
        return Err(DecoderError::AmbiguousMarker {
            path: grid.source().to_path_buf(),
            marker: marker.to_string(),
            occurrences: matches.len(),
            metadata: None,
        });
    }
    let marker_row = matches[0];

    let position = sections
        .position_of(marker_row + 1)
        .ok_or_else(|| DecoderError::StructuralError {
            path: grid.source().to_path_buf(),
            marker: marker.to_string(),
            row: marker_row,
        })?;

    let start = sections.as_slice()[position];
    let end = match sections.as_slice().get(position + 1) {
        // Skip the next variable's label row
        Some(&next) => next - 2,
        None => grid.len() - 1,
    };

    log::debug!(
        "Located {} block in {:?}: rows {}..={} ({} sections in file)",
        marker,
        grid.source(),
        start,
        end,
        sections.len()
    );

    Ok(DataBlock { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;

    fn grid_from_labels(labels: &[&str]) -> RawGrid {
        let mut content = String::from("h1\nh2\nh3\n");
        for label in labels {
            content.push_str(label);
            content.push_str(" 1.1\n");
        }
        RawGrid::parse(&content, "labels", &ExtractConfig::new()).unwrap()
    }

    #[test]
    fn test_block_ends_before_next_variable() {
        // Sections at rows 2, 10 and 25, marker at row 1
        let mut labels = vec!["x"; 30];
        labels[1] = "C:";
        labels[2] = "0:";
        labels[9] = "D:";
        labels[10] = "0:";
        labels[24] = "E:";
        labels[25] = "0:";
        let grid = grid_from_labels(&labels);

        let block = locate_block(&grid, "C:", "0:").unwrap();
        assert_eq!(block, DataBlock { start: 2, end: 8 });
        assert_eq!(block.len(), 7);
    }

    #[test]
    fn test_last_section_runs_to_end_of_grid() {
        let grid = grid_from_labels(&["A:", "0:", "x", "C:", "0:", "5:", "10:"]);
        let block = locate_block(&grid, "C:", "0:").unwrap();
        assert_eq!(block, DataBlock { start: 4, end: 6 });
    }

    #[test]
    fn test_missing_marker_is_ambiguous() {
        let grid = grid_from_labels(&["A:", "0:"]);
        match locate_block(&grid, "C:", "0:") {
            Err(DecoderError::AmbiguousMarker { occurrences, marker, .. }) => {
                assert_eq!(occurrences, 0);
                assert_eq!(marker, "C:");
            }
            other => panic!("expected AmbiguousMarker, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_marker_is_ambiguous() {
        let grid = grid_from_labels(&["C:", "0:", "C:", "0:"]);
        assert!(matches!(
            locate_block(&grid, "C:", "0:"),
            Err(DecoderError::AmbiguousMarker { occurrences: 2, .. })
        ));
    }

    #[test]
    fn test_marker_without_section_is_structural_error() {
        let grid = grid_from_labels(&["C:", "x", "0:"]);
        assert!(matches!(
            locate_block(&grid, "C:", "0:"),
            Err(DecoderError::StructuralError { row: 0, .. })
        ));
    }

    #[test]
    fn test_empty_block_range() {
        let block = DataBlock { start: 3, end: 2 };
        assert!(block.is_empty());
        assert_eq!(block.rows(), 3..3);
    }
}
