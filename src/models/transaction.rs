//! Transaction model
//!
//! Income and expense events recorded against a budget period and,
//! optionally, one of its categories.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{BudgetId, CategoryId, TransactionId};
use super::money::Money;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.pad("Income"),
            Self::Expense => f.pad("Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(TransactionValidationError::UnknownType(other.to_string())),
        }
    }
}

/// A single income or expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// The period this transaction belongs to
    pub budget_id: BudgetId,

    /// Cleared (not deleted) when the category is removed
    pub category_id: Option<CategoryId>,

    pub transaction_type: TransactionType,

    /// Always stored as a positive amount; the type carries the direction
    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        budget_id: BudgetId,
        transaction_type: TransactionType,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            budget_id,
            category_id: None,
            transaction_type,
            amount,
            date,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn income(budget_id: BudgetId, amount: Money, date: NaiveDate) -> Self {
        Self::new(budget_id, TransactionType::Income, amount, date)
    }

    pub fn expense(budget_id: BudgetId, amount: Money, date: NaiveDate) -> Self {
        Self::new(budget_id, TransactionType::Expense, amount, date)
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Signed effect on the balance: positive for income, negative for expense
    pub fn signed_amount(&self) -> Money {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Drop the category reference, keeping the record itself
    pub fn clear_category(&mut self) {
        self.category_id = None;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Vec<TransactionValidationError> {
        let mut errors = Vec::new();
        if !self.amount.is_positive() {
            errors.push(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if self.amount.exceeds_max() {
            errors.push(TransactionValidationError::AmountTooLarge(self.amount));
        }
        errors
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.transaction_type,
            self.amount,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    UnknownType(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount must be at most {} (got {})", Money::MAX, amount)
            }
            Self::UnknownType(t) => {
                write!(f, "Unknown transaction type '{}', expected income or expense", t)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_signed_amount() {
        let budget_id = BudgetId::new();
        let income = Transaction::income(budget_id, Money::from_units(50), day());
        let expense = Transaction::expense(budget_id, Money::from_units(20), day());
        assert_eq!(income.signed_amount(), Money::from_units(50));
        assert_eq!(expense.signed_amount(), Money::from_units(-20));
        assert!(income.is_income());
        assert!(expense.is_expense());
    }

    #[test]
    fn test_clear_category_keeps_record() {
        let mut txn = Transaction::expense(BudgetId::new(), Money::from_units(5), day())
            .with_category(CategoryId::new());
        txn.clear_category();
        assert!(txn.category_id.is_none());
        assert_eq!(txn.amount, Money::from_units(5));
    }

    #[test]
    fn test_blank_note_is_none() {
        let txn = Transaction::expense(BudgetId::new(), Money::from_units(5), day()).with_note("  ");
        assert!(txn.note.is_none());
    }

    #[test]
    fn test_validate_amount() {
        let txn = Transaction::expense(BudgetId::new(), Money::zero(), day());
        assert_eq!(
            txn.validate(),
            vec![TransactionValidationError::NonPositiveAmount(Money::zero())]
        );
    }

    #[test]
    fn test_validate_amount_limit() {
        let at_limit = Transaction::expense(BudgetId::new(), Money::MAX, day());
        assert!(at_limit.validate().is_empty());

        let huge = Money::from_units(900_000_000_000_000);
        let txn = Transaction::expense(BudgetId::new(), huge, day());
        assert_eq!(
            txn.validate(),
            vec![TransactionValidationError::AmountTooLarge(huge)]
        );
    }

    #[test]
    fn test_type_parsing_and_serde() {
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert!("transfer".parse::<TransactionType>().is_err());
        let json = serde_json::to_string(&TransactionType::Expense).unwrap();
        assert_eq!(json, "\"expense\"");
    }

    #[test]
    fn test_display() {
        let txn = Transaction::expense(BudgetId::new(), Money::from_units(200), day());
        assert_eq!(txn.to_string(), "Expense - $200.00 - 2025-01-15");
    }
}
