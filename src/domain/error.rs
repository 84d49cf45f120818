//! Domain-level errors (no external dependencies)

use chrono::NaiveDate;
use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid date range: begin {begin} is after end {end}")]
    InvalidDateRange { begin: NaiveDate, end: NaiveDate },

    #[error("invalid node path: '{0}'")]
    InvalidNodePath(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
