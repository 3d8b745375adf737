//! Daily and monthly summary rows
//!
//! Both are fully derived from transactions. They are never edited by hand;
//! the summary service recomputes the whole aggregate and upserts the row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, DailySummaryId, MonthlySummaryId};
use super::money::Money;
use super::percentage::Percentage;

/// Totals for a single day of a budget period, unique per (period, date)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub id: DailySummaryId,
    pub budget_id: BudgetId,
    pub date: NaiveDate,
    pub total_income: Money,
    pub total_expense: Money,
    /// income - expense
    pub net_amount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The recomputed figures of a daily summary, without row identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DailyTotals {
    pub total_income: Money,
    pub total_expense: Money,
    pub net_amount: Money,
}

impl DailyTotals {
    pub fn new(total_income: Money, total_expense: Money) -> Self {
        Self {
            total_income,
            total_expense,
            net_amount: total_income - total_expense,
        }
    }
}

impl DailySummary {
    pub fn new(budget_id: BudgetId, date: NaiveDate, totals: DailyTotals) -> Self {
        let now = Utc::now();
        Self {
            id: DailySummaryId::new(),
            budget_id,
            date,
            total_income: totals.total_income,
            total_expense: totals.total_expense,
            net_amount: totals.net_amount,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn totals(&self) -> DailyTotals {
        DailyTotals {
            total_income: self.total_income,
            total_expense: self.total_expense,
            net_amount: self.net_amount,
        }
    }

    /// Overwrite the figures; returns false if nothing changed
    pub fn apply(&mut self, totals: DailyTotals) -> bool {
        if self.totals() == totals {
            return false;
        }
        self.total_income = totals.total_income;
        self.total_expense = totals.total_expense;
        self.net_amount = totals.net_amount;
        self.updated_at = Utc::now();
        true
    }
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Income: {}, Expense: {}",
            self.date.format("%Y-%m-%d"),
            self.total_income,
            self.total_expense
        )
    }
}

/// Totals for a whole budget period, one row per period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub id: MonthlySummaryId,
    pub budget_id: BudgetId,
    pub total_income: Money,
    pub total_expense: Money,
    /// total_budget - total_expense
    pub remaining_balance: Money,
    /// Share of the total budget not consumed by expenses
    pub savings_rate: Percentage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The recomputed figures of a monthly summary, without row identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyTotals {
    pub total_income: Money,
    pub total_expense: Money,
    pub remaining_balance: Money,
    pub savings_rate: Percentage,
}

impl MonthlyTotals {
    /// Derive the period figures from the budget and its income/expense sums
    pub fn new(total_budget: Money, total_income: Money, total_expense: Money) -> Self {
        Self {
            total_income,
            total_expense,
            remaining_balance: total_budget - total_expense,
            savings_rate: Percentage::of(total_budget - total_expense, total_budget),
        }
    }
}

impl MonthlySummary {
    pub fn new(budget_id: BudgetId, totals: MonthlyTotals) -> Self {
        let now = Utc::now();
        Self {
            id: MonthlySummaryId::new(),
            budget_id,
            total_income: totals.total_income,
            total_expense: totals.total_expense,
            remaining_balance: totals.remaining_balance,
            savings_rate: totals.savings_rate,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn totals(&self) -> MonthlyTotals {
        MonthlyTotals {
            total_income: self.total_income,
            total_expense: self.total_expense,
            remaining_balance: self.remaining_balance,
            savings_rate: self.savings_rate,
        }
    }

    /// Overwrite the figures; returns false if nothing changed
    pub fn apply(&mut self, totals: MonthlyTotals) -> bool {
        if self.totals() == totals {
            return false;
        }
        self.total_income = totals.total_income;
        self.total_expense = totals.total_expense;
        self.remaining_balance = totals.remaining_balance;
        self.savings_rate = totals.savings_rate;
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_net() {
        let totals = DailyTotals::new(Money::zero(), Money::from_units(200));
        assert_eq!(totals.net_amount, Money::from_units(-200));
    }

    #[test]
    fn test_daily_apply_reports_change() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let mut row = DailySummary::new(BudgetId::new(), date, DailyTotals::default());
        let first_update = row.updated_at;

        assert!(!row.apply(DailyTotals::default()));
        assert_eq!(row.updated_at, first_update);

        assert!(row.apply(DailyTotals::new(Money::from_units(10), Money::zero())));
        assert_eq!(row.net_amount, Money::from_units(10));
    }

    #[test]
    fn test_monthly_totals() {
        let totals = MonthlyTotals::new(
            Money::from_units(1000),
            Money::from_units(50),
            Money::from_units(200),
        );
        assert_eq!(totals.remaining_balance, Money::from_units(800));
        assert_eq!(totals.savings_rate.as_f64(), 80.0);
    }

    #[test]
    fn test_zero_budget_savings_rate_is_zero() {
        let totals = MonthlyTotals::new(Money::zero(), Money::zero(), Money::from_units(75));
        assert_eq!(totals.savings_rate, Percentage::zero());
        assert_eq!(totals.remaining_balance, Money::from_units(-75));
    }

    #[test]
    fn test_overspent_savings_rate_is_negative() {
        let totals = MonthlyTotals::new(Money::from_units(100), Money::zero(), Money::from_units(150));
        assert_eq!(totals.savings_rate.as_f64(), -50.0);
    }
}
