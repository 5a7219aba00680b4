//! Record-at-a-time stage trait and implementations.
//!
//! Each `RecordStage` processes one record at a time, returning zero or more
//! output records. Chained together they reproduce the concurrent pipeline's
//! filtering and counting on a single thread.

use age_pipeline::{BirthDate, MIN_FIELDS, RawRecord, age_on};
use chrono::NaiveDate;
use tracing::warn;

/// A pipeline stage that processes records one at a time.
pub trait RecordStage {
    /// Process a single input record, returning zero or more output records.
    fn process(&mut self, record: RawRecord) -> Vec<RawRecord>;

    /// Flush any accumulated state, returning final output records.
    ///
    /// Called after all input records have been processed. `CountStage`
    /// uses this to emit its total.
    fn flush(&mut self) -> Vec<RawRecord> {
        vec![]
    }

    /// The display name of this stage.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Stage implementations
// ---------------------------------------------------------------------------

/// SKIP n - drops the first n records (the header), passes the rest.
pub struct SkipStage {
    n: usize,
    seen: usize,
}

impl SkipStage {
    pub fn new(n: usize) -> Self {
        Self { n, seen: 0 }
    }
}

impl RecordStage for SkipStage {
    fn process(&mut self, record: RawRecord) -> Vec<RawRecord> {
        if self.seen < self.n {
            self.seen += 1;
            vec![]
        } else {
            vec![record]
        }
    }

    fn name(&self) -> &str {
        "SKIP"
    }
}

/// SHAPE n - keeps records with at least n fields.
pub struct ShapeStage {
    min_fields: usize,
}

impl ShapeStage {
    pub fn new(min_fields: usize) -> Self {
        Self { min_fields }
    }
}

impl RecordStage for ShapeStage {
    fn process(&mut self, record: RawRecord) -> Vec<RawRecord> {
        if record.len() >= self.min_fields {
            vec![record]
        } else {
            warn!(fields = ?record.fields(), "invalid record");
            vec![]
        }
    }

    fn name(&self) -> &str {
        "SHAPE"
    }
}

/// AGE > n - keeps records whose birthdate puts them above the threshold.
pub struct AgeFilterStage {
    reference: NaiveDate,
    threshold: i32,
}

impl AgeFilterStage {
    pub fn new(reference: NaiveDate, threshold: i32) -> Self {
        Self {
            reference,
            threshold,
        }
    }
}

impl RecordStage for AgeFilterStage {
    fn process(&mut self, record: RawRecord) -> Vec<RawRecord> {
        match record.birthdate().and_then(BirthDate::parse) {
            Ok(birth) if age_on(birth, self.reference) > self.threshold => vec![record],
            Ok(_) => vec![],
            Err(e) => {
                warn!(error = %e, "skipping record");
                vec![]
            }
        }
    }

    fn name(&self) -> &str {
        "AGE"
    }
}

/// COUNT - counts records and emits the total as a one-field record on flush.
pub struct CountStage {
    count: usize,
}

impl CountStage {
    pub fn new() -> Self {
        Self { count: 0 }
    }
}

impl Default for CountStage {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStage for CountStage {
    fn process(&mut self, _record: RawRecord) -> Vec<RawRecord> {
        self.count += 1;
        vec![]
    }

    fn flush(&mut self) -> Vec<RawRecord> {
        vec![RawRecord::new(vec![self.count.to_string()])]
    }

    fn name(&self) -> &str {
        "COUNT"
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// The stage chain equivalent to the concurrent pipeline:
/// `SKIP 1 | SHAPE 4 | AGE > threshold | COUNT`.
pub fn count_stages(reference: NaiveDate, threshold: i32) -> Vec<Box<dyn RecordStage>> {
    vec![
        Box::new(SkipStage::new(1)),
        Box::new(ShapeStage::new(MIN_FIELDS)),
        Box::new(AgeFilterStage::new(reference, threshold)),
        Box::new(CountStage::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn person(birthdate: &str) -> RawRecord {
        RawRecord::from_fields(&["a", "b", "c", birthdate])
    }

    #[test]
    fn test_skip_stage() {
        let mut stage = SkipStage::new(1);
        assert!(stage.process(person("1990/01/01")).is_empty());
        assert_eq!(stage.process(person("1990/01/01")).len(), 1);
        assert_eq!(stage.process(person("1990/01/01")).len(), 1);
    }

    #[test]
    fn test_shape_stage() {
        let mut stage = ShapeStage::new(MIN_FIELDS);
        assert!(stage.process(RawRecord::from_fields(&["a", "b", "c"])).is_empty());
        assert_eq!(stage.process(person("x")).len(), 1);
    }

    #[test]
    fn test_age_filter_strict() {
        let mut stage = AgeFilterStage::new(reference(), 30);
        assert!(stage.process(person("1995/01/01")).is_empty());
        assert_eq!(stage.process(person("1994/01/01")).len(), 1);
    }

    #[test]
    fn test_age_filter_bad_date() {
        let mut stage = AgeFilterStage::new(reference(), 30);
        assert!(stage.process(person("not-a-date")).is_empty());
        assert!(stage.process(RawRecord::from_fields(&["a"])).is_empty());
    }

    #[test]
    fn test_count_stage() {
        let mut stage = CountStage::new();
        assert!(stage.process(person("1990/01/01")).is_empty());
        assert!(stage.process(person("1990/01/01")).is_empty());
        let flushed = stage.flush();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].field(0).unwrap(), "2");
    }

    #[test]
    fn test_count_stage_zero() {
        let mut stage = CountStage::default();
        assert_eq!(stage.flush()[0].field(0).unwrap(), "0");
    }

    #[test]
    fn test_count_stages_names() {
        let stages = count_stages(reference(), 30);
        let names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["SKIP", "SHAPE", "AGE", "COUNT"]);
    }
}
