//! Report error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::period::PeriodError;

/// Errors that can occur during report generation.
///
/// All variants are validation failures raised before any aggregation work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start of the requested range.
        start: DateTime<Utc>,
        /// End of the requested range.
        end: DateTime<Utc>,
    },

    /// Period name is not recognized.
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// Export format is not supported.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Snapshot exceeds the configured record limit.
    #[error("Too many records: {count} exceeds the limit of {limit}")]
    TooManyRecords {
        /// Records in the snapshot.
        count: usize,
        /// Configured maximum.
        limit: usize,
    },
}

impl From<PeriodError> for ReportError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::InvalidRange { start, end } => Self::InvalidDateRange { start, end },
            PeriodError::UnknownPeriod(name) => Self::UnknownPeriod(name),
        }
    }
}
