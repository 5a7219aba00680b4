//! Error types for the age pipeline.
//!
//! Per-record failures are built as `PipelineError` values so every stage
//! logs them the same way, but they never cross a stage boundary. Only the
//! driver-level variants (`Open`, `Spawn`, `StagePanicked`, `CountUnavailable`,
//! `InvalidConfig`) are ever returned to a caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading, parsing, or coordinating the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file could not be opened.
    #[error("error while opening '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CSV reader failed on a row (or on the header).
    #[error("csv read error: {0}")]
    Csv(#[from] csv::Error),

    /// A birthdate field did not match `YYYY/MM/DD` or is not a calendar date.
    #[error("error parsing date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// A record was too short to hold the requested field.
    #[error("record has {len} fields, field {index} is missing")]
    MissingField { index: usize, len: usize },

    /// A stage thread could not be started.
    #[error("failed to spawn stage '{stage}': {source}")]
    Spawn {
        stage: &'static str,
        #[source]
        source: io::Error,
    },

    /// A stage thread panicked before reporting completion.
    #[error("stage '{stage}' panicked")]
    StagePanicked { stage: &'static str },

    /// The aggregator finished without handing over a count.
    #[error("aggregator closed the count channel without sending a count")]
    CountUnavailable,

    /// Configuration rejected before the pipeline started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    pub fn invalid_date(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_display() {
        let err = PipelineError::invalid_date("not-a-date", "expected YYYY/MM/DD");
        assert_eq!(
            err.to_string(),
            "error parsing date 'not-a-date': expected YYYY/MM/DD"
        );
    }

    #[test]
    fn test_open_display_includes_path() {
        let err = PipelineError::Open {
            path: PathBuf::from("user.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("user.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_stage_panicked_display() {
        let err = PipelineError::StagePanicked {
            stage: "record-source",
        };
        assert_eq!(err.to_string(), "stage 'record-source' panicked");
    }
}
