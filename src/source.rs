//! The record source stage.
//!
//! `RecordSource` turns a fallible row reader into a stream of well-formed
//! `RawRecord`s. The first row is a header and is discarded without being
//! looked at. After that:
//!
//! - end of input stops the stream,
//! - a row read error is logged and skipped,
//! - a row with fewer than `MIN_FIELDS` fields is logged and skipped,
//! - anything else is emitted downstream.
//!
//! If the header itself cannot be read the stream ends with zero rows. That
//! is reported through `SourceReport::header_read`, never as an error.

use std::io;
use std::sync::mpsc::SyncSender;

use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::record::{MIN_FIELDS, RawRecord};

/// Result of one read: a row's fields, or the error that row produced.
pub type RowResult = Result<Vec<String>, PipelineError>;

/// Something that yields rows one at a time.
///
/// `None` is end of input. `Some(Err(_))` is a row-level failure; the
/// caller may keep reading after it.
pub trait RowReader: Send {
    fn read_row(&mut self) -> Option<RowResult>;
}

impl<I> RowReader for I
where
    I: Iterator<Item = RowResult> + Send,
{
    fn read_row(&mut self) -> Option<RowResult> {
        self.next()
    }
}

/// Row reader over delimited text.
///
/// Header handling is left to `RecordSource`, so the underlying CSV reader
/// treats every line as data.
pub struct CsvRowReader<R> {
    inner: csv::Reader<R>,
    record: csv::StringRecord,
    exhausted: bool,
}

impl<R: io::Read> CsvRowReader<R> {
    /// Comma-delimited, variable field counts.
    pub fn new(input: R) -> Self {
        Self::with_config(input, &PipelineConfig::default())
    }

    pub fn with_config(input: R, config: &PipelineConfig) -> Self {
        let inner = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(config.delimiter)
            .flexible(!config.strict_field_count)
            .from_reader(input);
        Self {
            inner,
            record: csv::StringRecord::new(),
            exhausted: false,
        }
    }
}

impl<R: io::Read> Iterator for CsvRowReader<R> {
    type Item = RowResult;

    fn next(&mut self) -> Option<RowResult> {
        if self.exhausted {
            return None;
        }
        match self.inner.read_record(&mut self.record) {
            Ok(true) => Some(Ok(self.record.iter().map(String::from).collect())),
            Ok(false) => {
                self.exhausted = true;
                None
            }
            Err(e) => {
                // An I/O failure would repeat on every retry.
                if e.is_io_error() {
                    self.exhausted = true;
                }
                Some(Err(e.into()))
            }
        }
    }
}

/// Counters collected while the source runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceReport {
    /// False when the header row could not be read (missing or unreadable input).
    pub header_read: bool,
    pub rows_emitted: usize,
    pub read_errors: usize,
    pub malformed: usize,
}

/// Producer stage: header skip, shape validation, row emission.
///
/// Also an `Iterator` over the validated records. A source can be
/// traversed once; after it ends it keeps returning `None`.
pub struct RecordSource<R> {
    reader: R,
    header_done: bool,
    finished: bool,
    report: SourceReport,
}

impl<R: RowReader> RecordSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            header_done: false,
            finished: false,
            report: SourceReport::default(),
        }
    }

    /// Counters so far.
    pub fn report(&self) -> SourceReport {
        self.report
    }

    /// Run to completion, handing each record to `emit`.
    ///
    /// `emit` returns false when downstream has gone away, which stops the
    /// source early. The reader is dropped before this returns.
    pub fn run<F>(mut self, mut emit: F) -> SourceReport
    where
        F: FnMut(RawRecord) -> bool,
    {
        for record in self.by_ref() {
            if !emit(record) {
                warn!("record consumer disconnected, stopping source");
                break;
            }
        }
        let report = self.report;
        debug!(
            header_read = report.header_read,
            emitted = report.rows_emitted,
            read_errors = report.read_errors,
            malformed = report.malformed,
            "record source completed"
        );
        report
    }

    /// Run to completion, sending each record over `out`.
    ///
    /// `out` is dropped on return, which closes the stream for the consumer.
    pub fn send_to(self, out: SyncSender<RawRecord>) -> SourceReport {
        self.run(|record| out.send(record).is_ok())
    }

    fn read_header(&mut self) -> bool {
        self.header_done = true;
        match self.reader.read_row() {
            Some(Ok(_)) => {
                self.report.header_read = true;
                true
            }
            Some(Err(e)) => {
                warn!(error = %e, "error reading header");
                false
            }
            None => {
                warn!("error reading header: input is empty");
                false
            }
        }
    }
}

impl<R: RowReader> Iterator for RecordSource<R> {
    type Item = RawRecord;

    fn next(&mut self) -> Option<RawRecord> {
        if self.finished {
            return None;
        }
        if !self.header_done && !self.read_header() {
            self.finished = true;
            return None;
        }

        loop {
            match self.reader.read_row() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.report.read_errors += 1;
                    warn!(error = %e, "error reading record");
                }
                Some(Ok(fields)) => {
                    let record = RawRecord::new(fields);
                    if record.is_well_formed() {
                        self.report.rows_emitted += 1;
                        return Some(record);
                    }
                    self.report.malformed += 1;
                    warn!(
                        fields = ?record.fields(),
                        min_fields = MIN_FIELDS,
                        "invalid record"
                    );
                }
            }
        }
    }
}
