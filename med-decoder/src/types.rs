//! Core types for the MED decoder library
//!
//! This module defines the metadata tuple that identifies one recording
//! (phase, subject, session), the tidy rows emitted by the reshaper, and the
//! error taxonomy shared by every stage of the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors that can occur while extracting a variable block
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Malformed raw file {path:?} at line {line}: {reason}")]
    FormatError {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error(
        "Marker {marker:?} found {occurrences} times in {path:?} (expected exactly one), possible error in {}. Duplicate file?",
        describe_metadata(.metadata)
    )]
    AmbiguousMarker {
        path: PathBuf,
        marker: String,
        occurrences: usize,
        metadata: Option<SessionInfo>,
    },

    #[error("Marker {marker:?} at row {row} of {path:?} is not followed by a section boundary")]
    StructuralError {
        path: PathBuf,
        marker: String,
        row: usize,
    },

    #[error("Invalid encoded value {cell:?} in {path:?} at row {row}, column {column} (line {line}): {reason}")]
    EncodingError {
        path: PathBuf,
        cell: String,
        row: usize,
        column: usize,
        line: usize,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

fn describe_metadata(metadata: &Option<SessionInfo>) -> String {
    match metadata {
        Some(info) => info.to_string(),
        None => "unknown session".to_string(),
    }
}

impl DecoderError {
    /// Attach the metadata tuple to an ambiguous-marker error
    ///
    /// The locator only sees the grid; the extractor knows which recording it
    /// is working on and fills it in before the error leaves the library.
    pub fn with_metadata(self, info: &SessionInfo) -> Self {
        match self {
            DecoderError::AmbiguousMarker {
                path,
                marker,
                occurrences,
                metadata: None,
            } => DecoderError::AmbiguousMarker {
                path,
                marker,
                occurrences,
                metadata: Some(info.clone()),
            },
            other => other,
        }
    }
}

/// A scalar metadata value, written as either text or an integer
///
/// Text is kept verbatim so subjects like `"034"` keep their leading zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Integer(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Integer(v) => write!(f, "{}", v),
            Label::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Integer(value)
    }
}

/// Experimental phase: a single label, or a sequence such as `["A", 1]`
/// for phase plus condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Phase {
    Single(Label),
    Sequence(Vec<Label>),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Single(label) => write!(f, "{}", label),
            Phase::Sequence(labels) => {
                for label in labels {
                    write!(f, "{}", label)?;
                }
                Ok(())
            }
        }
    }
}

impl From<Label> for Phase {
    fn from(value: Label) -> Self {
        Phase::Single(value)
    }
}

impl From<&str> for Phase {
    fn from(value: &str) -> Self {
        Phase::Single(value.into())
    }
}

impl From<i64> for Phase {
    fn from(value: i64) -> Self {
        Phase::Single(value.into())
    }
}

impl From<Vec<Label>> for Phase {
    fn from(value: Vec<Label>) -> Self {
        Phase::Sequence(value)
    }
}

/// The metadata tuple identifying one raw file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub phase: Phase,
    pub subject: Label,
    pub session: Label,
}

impl SessionInfo {
    /// Create a new metadata tuple
    pub fn new(phase: impl Into<Phase>, subject: impl Into<Label>, session: impl Into<Label>) -> Self {
        Self {
            phase: phase.into(),
            subject: subject.into(),
            session: session.into(),
        }
    }
}

impl fmt::Display for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[phase {}, subject {}, session {}]",
            self.phase, self.subject, self.session
        )
    }
}

/// One row of the tidy table: the two halves of an encoded `time.event` value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TidyRow {
    pub time: String,
    pub event: String,
}
