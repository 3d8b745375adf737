//! Budget period model
//!
//! A dated window with a total budget amount. Categories and transactions
//! belong to exactly one period.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;
use super::user::Email;

/// Length of a period when no end date is given
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// A budget period owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub id: BudgetId,

    /// Owning user
    pub owner: Email,

    pub start_date: NaiveDate,

    /// Fixed at creation; never auto-extended
    pub end_date: NaiveDate,

    pub total_budget: Money,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl BudgetPeriod {
    /// Create a period; `end_date` defaults to `start_date + period_days`
    ///
    /// Fails when the default end date falls outside the calendar range.
    pub fn new(
        owner: Email,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        total_budget: Money,
        period_days: i64,
    ) -> Result<Self, PeriodValidationError> {
        let end_date = match end_date {
            Some(end) => end,
            None => u64::try_from(period_days)
                .ok()
                .and_then(|days| start_date.checked_add_days(Days::new(days)))
                .ok_or(PeriodValidationError::EndOutOfRange {
                    start: start_date,
                    days: period_days,
                })?,
        };

        let now = Utc::now();
        Ok(Self {
            id: BudgetId::new(),
            owner,
            start_date,
            end_date,
            total_budget,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if a date falls within this period (inclusive on both ends)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of days covered, counting both ends
    pub fn length_in_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn set_total_budget(&mut self, amount: Money) {
        self.total_budget = amount;
        self.updated_at = Utc::now();
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Vec<PeriodValidationError> {
        let mut errors = Vec::new();
        if self.end_date < self.start_date {
            errors.push(PeriodValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.total_budget.is_negative() {
            errors.push(PeriodValidationError::NegativeBudget);
        } else if self.total_budget.exceeds_max() {
            errors.push(PeriodValidationError::BudgetTooLarge(self.total_budget));
        }
        errors
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} ({})",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            self.total_budget
        )
    }
}

/// Validation errors for budget periods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodValidationError {
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    EndOutOfRange { start: NaiveDate, days: i64 },
    NegativeBudget,
    BudgetTooLarge(Money),
}

impl fmt::Display for PeriodValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
            Self::EndOutOfRange { start, days } => {
                write!(f, "No valid end date {} days after {}", days, start)
            }
            Self::NegativeBudget => write!(f, "Total budget cannot be negative"),
            Self::BudgetTooLarge(amount) => {
                write!(f, "Total budget must be at most {} (got {})", Money::MAX, amount)
            }
        }
    }
}

impl std::error::Error for PeriodValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_date_defaults_to_thirty_days() {
        let period = BudgetPeriod::new(
            Email::new("a@b.c"),
            date(2025, 1, 1),
            None,
            Money::from_units(1000),
            DEFAULT_PERIOD_DAYS,
        )
        .unwrap();
        assert_eq!(period.end_date, date(2025, 1, 31));
        assert!(period.is_active);
        assert_eq!(period.length_in_days(), 31);
    }

    #[test]
    fn test_explicit_end_date_kept() {
        let period = BudgetPeriod::new(
            Email::new("a@b.c"),
            date(2025, 2, 1),
            Some(date(2025, 2, 28)),
            Money::zero(),
            DEFAULT_PERIOD_DAYS,
        )
        .unwrap();
        assert_eq!(period.end_date, date(2025, 2, 28));
    }

    #[test]
    fn test_contains() {
        let period = BudgetPeriod::new(
            Email::new("a@b.c"),
            date(2025, 1, 1),
            None,
            Money::zero(),
            DEFAULT_PERIOD_DAYS,
        )
        .unwrap();
        assert!(period.contains(date(2025, 1, 1)));
        assert!(period.contains(date(2025, 1, 31)));
        assert!(!period.contains(date(2025, 2, 1)));
    }

    #[test]
    fn test_validation() {
        let mut period = BudgetPeriod::new(
            Email::new("a@b.c"),
            date(2025, 1, 10),
            Some(date(2025, 1, 1)),
            Money::from_cents(-1),
            DEFAULT_PERIOD_DAYS,
        )
        .unwrap();
        assert_eq!(period.validate().len(), 2);

        period.end_date = date(2025, 1, 20);
        period.total_budget = Money::zero();
        assert!(period.validate().is_empty());
    }

    #[test]
    fn test_default_end_past_calendar_is_an_error() {
        let start = date(262142, 12, 20);
        let result = BudgetPeriod::new(
            Email::new("a@b.c"),
            start,
            None,
            Money::zero(),
            DEFAULT_PERIOD_DAYS,
        );
        assert_eq!(
            result.unwrap_err(),
            PeriodValidationError::EndOutOfRange { start, days: 30 }
        );

        assert!(BudgetPeriod::new(Email::new("a@b.c"), start, Some(start), Money::zero(), 30).is_ok());
    }

    #[test]
    fn test_budget_limit() {
        let mut period = BudgetPeriod::new(
            Email::new("a@b.c"),
            date(2025, 1, 1),
            None,
            Money::MAX,
            DEFAULT_PERIOD_DAYS,
        )
        .unwrap();
        assert!(period.validate().is_empty());

        period.total_budget = Money::from_cents(Money::MAX.cents() + 1);
        assert_eq!(
            period.validate(),
            vec![PeriodValidationError::BudgetTooLarge(period.total_budget)]
        );
    }
}
