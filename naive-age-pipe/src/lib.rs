//! Single-threaded record-at-a-time reference for the age pipeline.
//!
//! Each data row flows through the whole stage chain (header skip, shape
//! check, age filter, count) before the next row is read. No threads or
//! channels are involved, so the count it produces is the baseline the
//! concurrent `age_pipeline::Pipeline` must match.

pub mod executor;
pub mod record_stage;
pub mod sequential;

pub use executor::execute_rat;
pub use record_stage::{
    AgeFilterStage, CountStage, RecordStage, ShapeStage, SkipStage, count_stages,
};
pub use sequential::{count_sequential, read_rows};
