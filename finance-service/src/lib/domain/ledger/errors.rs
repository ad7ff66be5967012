use chrono::NaiveDate;
use thiserror::Error;

/// Error for finance record operations
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Budget ends ({end}) before it starts ({start})")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
