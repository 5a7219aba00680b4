//! Sequential counting entry points.
//!
//! `count_sequential` reads every row up front, then runs the RAT stage
//! chain over them. Read-error handling matches `RecordSource`: an
//! unreadable header yields no rows at all, later read errors are skipped.

use age_pipeline::{PipelineConfig, PipelineError, RawRecord, RowReader};
use tracing::warn;

use crate::executor::execute_rat;
use crate::record_stage::count_stages;

/// Drain `reader` into records, header included.
pub fn read_rows<R: RowReader>(mut reader: R) -> Vec<RawRecord> {
    let mut rows = Vec::new();
    match reader.read_row() {
        Some(Ok(header)) => rows.push(RawRecord::new(header)),
        Some(Err(e)) => {
            warn!(error = %e, "error reading header");
            return rows;
        }
        None => return rows,
    }
    while let Some(result) = reader.read_row() {
        match result {
            Ok(fields) => rows.push(RawRecord::new(fields)),
            Err(e) => warn!(error = %e, "error reading record"),
        }
    }
    rows
}

/// Count records above the configured threshold on a single thread.
pub fn count_sequential<R: RowReader>(
    reader: R,
    config: &PipelineConfig,
) -> Result<usize, PipelineError> {
    let reference = config.reference_date.ok_or_else(|| {
        PipelineError::InvalidConfig("reference date is not set".to_string())
    })?;
    let mut stages = count_stages(reference, config.threshold);
    let output = execute_rat(read_rows(reader), &mut stages);

    let total = output
        .first()
        .ok_or(PipelineError::CountUnavailable)?
        .field(0)?;
    total
        .parse()
        .map_err(|_| PipelineError::CountUnavailable)
}
