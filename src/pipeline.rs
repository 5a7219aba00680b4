//! Pipeline driver core.
//!
//! Wires a `RecordSource` to an `AgeAggregator` on two named threads:
//!
//! ```text
//! reader -> [record-source] --rows--> [age-aggregator] --count--> driver
//! ```
//!
//! The row channel is a rendezvous channel by default, so each send blocks
//! until the aggregator takes the row. The count channel carries exactly
//! one value. The driver joins both stage threads before it reads the
//! count, so the count is never observed before the aggregator has drained
//! its input.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::aggregator::{AgeAggregator, AggregateReport};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::record::RawRecord;
use crate::source::{CsvRowReader, RecordSource, RowReader, SourceReport};

pub const SOURCE_STAGE: &str = "record-source";
pub const AGGREGATOR_STAGE: &str = "age-aggregator";

/// What a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Number of records whose age exceeded the threshold.
    pub count: usize,
    pub source: SourceReport,
    pub aggregate: AggregateReport,
}

impl PipelineOutcome {
    /// False when the header could not be read, i.e. the input was missing
    /// or unreadable rather than merely empty of data rows. The count is 0
    /// in that case either way.
    pub fn source_available(&self) -> bool {
        self.source.header_read
    }
}

/// Two-stage producer/consumer pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    reference: NaiveDate,
}

impl Pipeline {
    /// Build a pipeline from `config`.
    ///
    /// The reference date must already be set; the caller decides what
    /// "today" means.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let reference = config.reference_date.ok_or_else(|| {
            PipelineError::InvalidConfig("reference date is not set".to_string())
        })?;
        Ok(Self { config, reference })
    }

    /// Open `path` and run the pipeline over it.
    ///
    /// The file handle moves into the source stage and is closed when that
    /// stage finishes, whichever way it finishes.
    pub fn run_path(&self, path: impl AsRef<Path>) -> Result<PipelineOutcome, PipelineError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PipelineError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened input");
        self.run_reader(file)
    }

    /// Run the pipeline over delimited text from `input`.
    pub fn run_reader<R>(&self, input: R) -> Result<PipelineOutcome, PipelineError>
    where
        R: io::Read + Send + 'static,
    {
        self.run(CsvRowReader::with_config(input, &self.config))
    }

    /// Run the pipeline over an arbitrary row reader.
    pub fn run<R>(&self, reader: R) -> Result<PipelineOutcome, PipelineError>
    where
        R: RowReader + 'static,
    {
        let (row_tx, row_rx) = mpsc::sync_channel::<RawRecord>(self.config.channel_capacity);
        let (count_tx, count_rx) = mpsc::sync_channel::<usize>(1);

        let source = RecordSource::new(reader);
        let source_handle = thread::Builder::new()
            .name(SOURCE_STAGE.to_string())
            .spawn(move || source.send_to(row_tx))
            .map_err(|source| PipelineError::Spawn {
                stage: SOURCE_STAGE,
                source,
            })?;

        let aggregator = AgeAggregator::with_threshold(self.reference, self.config.threshold);
        let aggregator_handle = match thread::Builder::new()
            .name(AGGREGATOR_STAGE.to_string())
            .spawn(move || aggregator.run(row_rx, count_tx))
        {
            Ok(handle) => handle,
            Err(source) => {
                // The row receiver was dropped with the closure, so the
                // source stops at its next send.
                let _ = source_handle.join();
                return Err(PipelineError::Spawn {
                    stage: AGGREGATOR_STAGE,
                    source,
                });
            }
        };

        // Join barrier: both stages must finish before the count is read.
        let source_result = source_handle.join();
        let aggregate_result = aggregator_handle.join();

        let source_report = source_result.map_err(|_| PipelineError::StagePanicked {
            stage: SOURCE_STAGE,
        })?;
        let aggregate_report = aggregate_result.map_err(|_| PipelineError::StagePanicked {
            stage: AGGREGATOR_STAGE,
        })?;
        let count = count_rx
            .recv()
            .map_err(|_| PipelineError::CountUnavailable)?;

        info!(
            count,
            rows = source_report.rows_emitted,
            skipped = source_report.read_errors
                + source_report.malformed
                + aggregate_report.unparseable,
            "pipeline completed"
        );

        Ok(PipelineOutcome {
            count,
            source: source_report,
            aggregate: aggregate_report,
        })
    }
}
