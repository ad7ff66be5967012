use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use crate::domain::identity::models::IdentityId;
use crate::domain::ledger::errors::LedgerError;

/// Record unique identifier, assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Money amount. Finite and never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, LedgerError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: RecordId,
    pub owner: IdentityId,
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub id: RecordId,
    pub owner: IdentityId,
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: RecordId,
    pub owner: IdentityId,
    pub name: String,
    pub amount: Amount,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub name: String,
    pub amount: Amount,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: String,
}

impl NewBudget {
    /// Ensure the budget period does not end before it starts.
    pub fn validate_period(&self) -> Result<(), LedgerError> {
        if self.end_date < self.start_date {
            Err(LedgerError::InvalidPeriod {
                start: self.start_date,
                end: self.end_date,
            })
        } else {
            Ok(())
        }
    }
}
