//! Ledger balance and the read model handed to callers

use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::error::{TallyError, TallyResult};
use super::transaction::{Transaction, TransactionKind};

/// Income, outcome and net total over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub income: Money,
    pub outcome: Money,
    pub total: Money,
}

impl Balance {
    /// Aggregate a set of transactions
    ///
    /// Fails with `Storage` if the stored amounts add up past the range of
    /// `Money`.
    pub fn from_transactions<'a, I>(transactions: I) -> TallyResult<Self>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .try_fold(Self::default(), |balance, txn| {
                balance.checked_record(txn.kind, txn.value).ok_or_else(|| {
                    TallyError::Storage(format!(
                        "Ledger totals overflow at transaction {}",
                        txn.id
                    ))
                })
            })
    }

    /// The balance after one more transaction, or `None` on overflow
    pub fn checked_record(&self, kind: TransactionKind, value: Money) -> Option<Self> {
        let (income, outcome) = match kind {
            TransactionKind::Income => (self.income.checked_add(value)?, self.outcome),
            TransactionKind::Outcome => (self.income, self.outcome.checked_add(value)?),
        };

        Some(Self {
            income,
            outcome,
            total: income.checked_sub(outcome)?,
        })
    }

    /// Whether an outcome of `value` would exceed the current total
    pub fn cannot_cover(&self, value: Money) -> bool {
        value > self.total
    }
}

/// Every transaction plus the balance over them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub transactions: Vec<Transaction>,
    pub balance: Balance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryId;

    fn txn(cents: i64, kind: TransactionKind) -> Transaction {
        Transaction::new("t", Money::from_cents(cents), kind, CategoryId::new())
    }

    #[test]
    fn test_empty_balance() {
        let balance = Balance::from_transactions(&Vec::<Transaction>::new()).unwrap();
        assert_eq!(balance, Balance::default());
        assert!(balance.total.is_zero());
    }

    #[test]
    fn test_balance_aggregation() {
        let txns = vec![
            txn(200000, TransactionKind::Income),
            txn(50000, TransactionKind::Outcome),
            txn(1050, TransactionKind::Outcome),
        ];
        let balance = Balance::from_transactions(&txns).unwrap();

        assert_eq!(balance.income.cents(), 200000);
        assert_eq!(balance.outcome.cents(), 51050);
        assert_eq!(balance.total.cents(), 148950);
    }

    #[test]
    fn test_cannot_cover() {
        let balance = Balance::from_transactions(&[txn(1000, TransactionKind::Income)]).unwrap();
        assert!(!balance.cannot_cover(Money::from_cents(1000)));
        assert!(balance.cannot_cover(Money::from_cents(1001)));
    }

    #[test]
    fn test_serialization_shape() {
        let balance = Balance::from_transactions(&[txn(300, TransactionKind::Income)]).unwrap();
        let json = serde_json::to_value(balance).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "income": 300, "outcome": 0, "total": 300 })
        );
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let big = i64::MAX - 100;
        let txns = vec![
            txn(big, TransactionKind::Income),
            txn(big, TransactionKind::Income),
        ];

        let err = Balance::from_transactions(&txns).unwrap_err();
        assert!(matches!(err, TallyError::Storage(_)));
    }

    #[test]
    fn test_checked_record() {
        let balance = Balance::default()
            .checked_record(TransactionKind::Income, Money::from_cents(500))
            .unwrap()
            .checked_record(TransactionKind::Outcome, Money::from_cents(800))
            .unwrap();
        assert_eq!(balance.total.cents(), -300);

        let full = Balance::default()
            .checked_record(TransactionKind::Income, Money::from_cents(i64::MAX))
            .unwrap();
        assert!(full
            .checked_record(TransactionKind::Income, Money::from_cents(1))
            .is_none());
    }
}
