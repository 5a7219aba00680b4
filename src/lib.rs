//! # age-pipeline
//!
//! A two-stage producer/consumer pipeline that counts people above an age
//! threshold in a delimited file.
//!
//! ## Overview
//!
//! - **`RecordSource`**: reads rows, drops the header, drops rows with
//!   fewer than four fields, and streams the rest.
//! - **`AgeAggregator`**: parses the `YYYY/MM/DD` birthdate in field 3,
//!   computes an age against a fixed reference date, and counts ages
//!   strictly above the threshold.
//! - **`Pipeline`**: runs both stages on their own threads, joins them, and
//!   hands back the single count.
//!
//! Bad rows and bad dates are logged through `tracing` and skipped. They
//! never fail the run.
//!
//! ## Example
//!
//! ```
//! use age_pipeline::{Pipeline, PipelineConfig};
//! use chrono::NaiveDate;
//!
//! let input = "name,email,city,birthdate\n\
//!              ann,ann@example.com,paris,1990/05/01\n\
//!              bob,bob@example.com,rome,2000/05/01\n";
//!
//! let config = PipelineConfig::new()
//!     .with_reference_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
//! let outcome = Pipeline::new(config)
//!     .unwrap()
//!     .run_reader(std::io::Cursor::new(input))
//!     .unwrap();
//!
//! assert_eq!(outcome.count, 1);
//! ```

pub mod age;
pub mod aggregator;
pub mod config;
pub mod error;
#[cfg(test)]
mod log_capture;
pub mod pipeline;
pub mod record;
pub mod source;

pub use age::{BirthDate, DEFAULT_AGE_THRESHOLD, age_on};
pub use aggregator::{AgeAggregator, AggregateReport};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineOutcome};
pub use record::{BIRTHDATE_FIELD, MIN_FIELDS, RawRecord};
pub use source::{CsvRowReader, RecordSource, RowReader, RowResult, SourceReport};
