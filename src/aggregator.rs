//! The age aggregator stage.
//!
//! Consumes validated records, parses the birthdate, and counts the rows
//! whose age on the reference date is strictly above the threshold. The
//! running count is private to the stage; only the final value leaves it,
//! once, after the input is exhausted.

use std::sync::mpsc::{Receiver, SyncSender};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::age::{BirthDate, DEFAULT_AGE_THRESHOLD, age_on};
use crate::record::RawRecord;

/// Counters collected while the aggregator runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateReport {
    /// Rows whose age exceeded the threshold.
    pub count: usize,
    /// Rows received from the source.
    pub observed: usize,
    /// Rows skipped because the birthdate did not parse.
    pub unparseable: usize,
}

/// Consumer stage: birthdate parse, age filter, count.
#[derive(Debug, Clone)]
pub struct AgeAggregator {
    reference: NaiveDate,
    threshold: i32,
    report: AggregateReport,
}

impl AgeAggregator {
    /// Aggregator using the default threshold of 30.
    pub fn new(reference: NaiveDate) -> Self {
        Self::with_threshold(reference, DEFAULT_AGE_THRESHOLD)
    }

    pub fn with_threshold(reference: NaiveDate, threshold: i32) -> Self {
        Self {
            reference,
            threshold,
            report: AggregateReport::default(),
        }
    }

    /// Fold one record into the count. Returns true if it was counted.
    ///
    /// A missing or unparseable birthdate is logged and the record skipped.
    pub fn observe(&mut self, record: &RawRecord) -> bool {
        self.report.observed += 1;

        let birth = match record.birthdate().and_then(BirthDate::parse) {
            Ok(birth) => birth,
            Err(e) => {
                self.report.unparseable += 1;
                warn!(error = %e, "skipping record");
                return false;
            }
        };

        if age_on(birth, self.reference) > self.threshold {
            self.report.count += 1;
            true
        } else {
            false
        }
    }

    /// Consume every record from `records` and return the final report.
    pub fn consume<I>(mut self, records: I) -> AggregateReport
    where
        I: IntoIterator<Item = RawRecord>,
    {
        for record in records {
            self.observe(&record);
        }
        self.report
    }

    /// Drain `rows` until the sender side closes, then hand the count to
    /// `result` exactly once.
    ///
    /// Nothing is sent before the input is exhausted. A dropped receiver on
    /// `result` is logged; the report is still returned.
    pub fn run(self, rows: Receiver<RawRecord>, result: SyncSender<usize>) -> AggregateReport {
        let report = self.consume(rows);
        info!(count = report.count, "aggregation completed, sending count");
        if result.send(report.count).is_err() {
            warn!("count receiver dropped before the count was delivered");
        }
        report
    }
}
