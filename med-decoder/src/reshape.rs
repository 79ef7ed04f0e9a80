//! Value reshaper
//!
//! Flattens a located block into one ordered run of encoded `time.event`
//! values and splits each into a tidy row.

use crate::grid::RawGrid;
use crate::locator::DataBlock;
use crate::types::{DecoderError, Result, TidyRow};

/// A non-empty data cell from the block, with its grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedValue<'a> {
    pub row: usize,
    /// 1-based data column (the label column is column 0)
    pub column: usize,
    pub line: usize,
    pub text: &'a str,
}

/// Flatten the block's data cells in row-major order, dropping empty cells
pub fn flatten<'a>(grid: &'a RawGrid, block: &DataBlock) -> Vec<EncodedValue<'a>> {
    grid.rows()
        .get(block.rows())
        .unwrap_or_default()
        .iter()
        .zip(block.rows())
        .flat_map(|(row, index)| {
            row.cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(col, cell)| EncodedValue {
                    row: index,
                    column: col + 1,
                    line: row.line,
                    text: cell.as_str(),
                })
        })
        .collect()
}

/// Split one encoded value on its single `.`
pub fn split_value(grid: &RawGrid, value: &EncodedValue<'_>, trim_event_zeros: bool) -> Result<TidyRow> {
    let invalid = |reason: &str| DecoderError::EncodingError {
        path: grid.source().to_path_buf(),
        cell: value.text.to_string(),
        row: value.row,
        column: value.column,
        line: value.line,
        reason: reason.to_string(),
    };

    let (time, event) = value
        .text
        .split_once('.')
        .ok_or_else(|| invalid("missing '.' between time and event"))?;

    if event.contains('.') {
        return Err(invalid("more than one '.'"));
    }
    if time.is_empty() || event.is_empty() {
        return Err(invalid("empty time or event component"));
    }

    let event = if trim_event_zeros {
        match event.trim_end_matches('0') {
            "" => "0",
            trimmed => trimmed,
        }
    } else {
        event
    };

    Ok(TidyRow {
        time: time.to_string(),
        event: event.to_string(),
    })
}

/// Reshape a block into tidy rows, preserving flattening order
pub fn reshape(grid: &RawGrid, block: &DataBlock, trim_event_zeros: bool) -> Result<Vec<TidyRow>> {
    let values = flatten(grid, block);
    log::debug!("Flattened {} cells from rows {:?}", values.len(), block.rows());

    values
        .iter()
        .map(|value| split_value(grid, value, trim_event_zeros))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;

    fn grid(body: &str) -> RawGrid {
        let content = format!("h1\nh2\nh3\n{}", body);
        RawGrid::parse(&content, "block", &ExtractConfig::new()).unwrap()
    }

    #[test]
    fn test_flatten_row_major_and_drops_missing_cells() {
        let grid = grid("C:\n0: 1.1 2.2 3.3 4.4 5.5\n5: 6.6 7.7\n");
        let values = flatten(&grid, &DataBlock { start: 1, end: 2 });
        let texts: Vec<&str> = values.iter().map(|v| v.text).collect();
        assert_eq!(texts, vec!["1.1", "2.2", "3.3", "4.4", "5.5", "6.6", "7.7"]);
        assert_eq!(values[5].row, 2);
        assert_eq!(values[5].column, 1);
        assert_eq!(values[5].line, 6);
    }

    #[test]
    fn test_reshape_splits_time_and_event() {
        let grid = grid("C:\n0: 120.100 130.200 0.000\n");
        let rows = reshape(&grid, &DataBlock { start: 1, end: 1 }, false).unwrap();
        assert_eq!(
            rows,
            vec![
                TidyRow { time: "120".into(), event: "100".into() },
                TidyRow { time: "130".into(), event: "200".into() },
                TidyRow { time: "0".into(), event: "000".into() },
            ]
        );
    }

    #[test]
    fn test_trim_event_zeros() {
        let grid = grid("C:\n0: 120.100 130.250 7.000\n");
        let rows = reshape(&grid, &DataBlock { start: 1, end: 1 }, true).unwrap();
        let events: Vec<&str> = rows.iter().map(|r| r.event.as_str()).collect();
        assert_eq!(events, vec!["1", "25", "0"]);
    }

    #[test]
    fn test_two_dots_is_encoding_error() {
        let grid = grid("C:\n0: 1.1 12.5.3\n");
        match reshape(&grid, &DataBlock { start: 1, end: 1 }, false) {
            Err(DecoderError::EncodingError { cell, column, .. }) => {
                assert_eq!(cell, "12.5.3");
                assert_eq!(column, 2);
            }
            other => panic!("expected EncodingError, got {:?}", other),
        }
    }

    #[test]
    fn test_no_dot_is_encoding_error() {
        let grid = grid("C:\n0: 15\n");
        assert!(matches!(
            reshape(&grid, &DataBlock { start: 1, end: 1 }, false),
            Err(DecoderError::EncodingError { .. })
        ));
    }

    #[test]
    fn test_empty_block_yields_no_rows() {
        let grid = grid("C:\n0: 1.1\n");
        let rows = reshape(&grid, &DataBlock { start: 1, end: 0 }, false).unwrap();
        assert!(rows.is_empty());
    }
}
