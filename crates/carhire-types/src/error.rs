//! Error types for carhire

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::CarCategory;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Why a single table row could not be decoded.
///
/// Never surfaces to callers: the offending row is skipped and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid number in column {column}: {value:?}")]
    InvalidNumber { column: &'static str, value: String },

    #[error("invalid decimal in column {column}: {value:?}")]
    InvalidDecimal { column: &'static str, value: String },

    #[error("invalid date in column {column}: {value:?}")]
    InvalidDate { column: &'static str, value: String },

    #[error("unknown {kind} literal: {value:?}")]
    UnknownLiteral { kind: &'static str, value: String },

    #[error("end date {end} is before start date {start}")]
    ReversedRange { start: NaiveDate, end: NaiveDate },
}

/// Coarse classification used by callers to pick a presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Disk, table format or configuration trouble
    Infrastructure,
    /// Bad input: the request can be corrected and retried
    Validation,
    /// The request does not fit the current state of the records
    State,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(String),

    #[error("Car {car_id} is not available between {from} and {to}")]
    Unavailable {
        car_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    },

    #[error("Car {car_id} has no tariff assigned")]
    NoTariff { car_id: i64 },

    #[error("No tariff defined for category {0}")]
    MissingCategoryTariff(CarCategory),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not permitted: {0}")]
    Forbidden(String),
}

impl Error {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Shorthand for a missing record
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("{} with id {}", what, id))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::Csv(_) | Error::Json(_) | Error::Config(_) => {
                ErrorKind::Infrastructure
            }
            Error::Validation(_)
            | Error::Unavailable { .. }
            | Error::NoTariff { .. }
            | Error::MissingCategoryTariff(_) => ErrorKind::Validation,
            Error::NotFound(_) | Error::InvalidState(_) | Error::Forbidden(_) => ErrorKind::State,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinguishable() {
        let day = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let unavailable = Error::Unavailable {
            car_id: 1,
            from: day,
            to: day,
        };
        assert_eq!(unavailable.kind(), ErrorKind::Validation);
        assert_eq!(Error::not_found("car", 7).kind(), ErrorKind::State);
        assert_eq!(
            Error::InvalidState("done".into()).kind(),
            ErrorKind::State
        );
        assert_eq!(
            Error::Io(std::io::Error::other("disk")).kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("reservation", 12);
        assert_eq!(err.to_string(), "Not found: reservation with id 12");
    }
}
