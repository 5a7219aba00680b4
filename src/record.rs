//! Raw delimited records.
//!
//! A `RawRecord` is one data row as it came off the reader: an ordered list
//! of string fields. It lives for a single trip through the pipeline.

use crate::error::PipelineError;

/// Minimum number of fields a row needs to be considered well-formed.
pub const MIN_FIELDS: usize = 4;

/// Zero-based index of the birthdate field.
pub const BIRTHDATE_FIELD: usize = 3;

/// One row of input fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<String>,
}

impl RawRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Build a record from string slices. Convenient in tests and demos.
    pub fn from_fields(fields: &[&str]) -> Self {
        Self::new(fields.iter().map(|f| f.to_string()).collect())
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when the row has at least `MIN_FIELDS` fields.
    pub fn is_well_formed(&self) -> bool {
        self.fields.len() >= MIN_FIELDS
    }

    /// Field at `index`, or `MissingField` if the row is too short.
    pub fn field(&self, index: usize) -> Result<&str, PipelineError> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or(PipelineError::MissingField {
                index,
                len: self.fields.len(),
            })
    }

    /// The raw birthdate string (field 3).
    pub fn birthdate(&self) -> Result<&str, PipelineError> {
        self.field(BIRTHDATE_FIELD)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}
