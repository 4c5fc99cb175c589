//! Transaction model
//!
//! A ledger transaction is an income or an outcome of a non-negative amount,
//! filed under exactly one category. Transactions are immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming into the ledger
    Income,
    /// Money leaving the ledger
    Outcome,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }

    /// Signed contribution of `value` to the ledger total
    pub fn signed(&self, value: Money) -> Money {
        match self {
            Self::Income => value,
            Self::Outcome => -value,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "outcome" => Ok(Self::Outcome),
            _ => Err(TransactionValidationError::UnknownKind(s.to_string())),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Short description ("Salary", "Rent")
    pub title: String,

    /// Amount, always non-negative; the direction lives in `kind`
    pub value: Money,

    /// Income or outcome
    pub kind: TransactionKind,

    /// The category this transaction is filed under
    pub category_id: CategoryId,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        title: impl Into<String>,
        value: Money,
        kind: TransactionKind,
        category_id: CategoryId,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            title: title.into(),
            value,
            kind,
            category_id,
            created_at: Utc::now(),
        }
    }

    /// Signed contribution of this transaction to the ledger total
    pub fn signed_value(&self) -> Money {
        self.kind.signed(self.value)
    }
}

/// Check that a title is usable
pub fn validate_title(title: &str) -> Result<(), TransactionValidationError> {
    if title.trim().is_empty() {
        return Err(TransactionValidationError::EmptyTitle);
    }
    Ok(())
}

/// Check that an amount is usable as a transaction value
pub fn validate_value(value: Money) -> Result<(), TransactionValidationError> {
    if value.is_negative() {
        return Err(TransactionValidationError::NegativeValue(value));
    }
    Ok(())
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.title, self.kind, self.value)
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyTitle,
    NegativeValue(Money),
    UnknownKind(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Transaction title cannot be empty"),
            Self::NegativeValue(value) => {
                write!(f, "Transaction value cannot be negative: {}", value)
            }
            Self::UnknownKind(kind) => write!(
                f,
                "Unknown transaction kind '{}' (expected 'income' or 'outcome')",
                kind
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
