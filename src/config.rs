//! Pipeline configuration.

use chrono::NaiveDate;

use crate::age::DEFAULT_AGE_THRESHOLD;
use crate::error::PipelineError;

/// Settings shared by the driver and both stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Ages strictly greater than this are counted.
    pub threshold: i32,
    /// Date ages are measured against. `None` means the driver substitutes
    /// today's date before the stages start.
    pub reference_date: Option<NaiveDate>,
    /// Slots in the row channel. 0 is a rendezvous handoff.
    pub channel_capacity: usize,
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Require every row to have as many fields as the header row.
    pub strict_field_count: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_AGE_THRESHOLD,
            reference_date: None,
            channel_capacity: 0,
            delimiter: b',',
            strict_field_count: false,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_strict_field_count(mut self, strict: bool) -> Self {
        self.strict_field_count = strict;
        self
    }

    /// Check settings that would otherwise only fail once the reader runs.
    pub fn validate(&self) -> Result<(), PipelineError> {
        match self.delimiter {
            b'"' => Err(PipelineError::InvalidConfig(
                "delimiter cannot be a double quote".to_string(),
            )),
            b'\n' | b'\r' => Err(PipelineError::InvalidConfig(
                "delimiter cannot be a line terminator".to_string(),
            )),
            d if !d.is_ascii() => Err(PipelineError::InvalidConfig(format!(
                "delimiter must be ASCII, got byte 0x{d:02x}"
            ))),
            _ => Ok(()),
        }
    }
}
