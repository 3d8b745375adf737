//! Summary service
//!
//! Maintains the daily and monthly summary rows of a budget period. Every
//! refresh recomputes the whole aggregate from the stored transactions and
//! upserts the row under its natural key; nothing is ever incremented.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetId, BudgetPeriod, DailySummary, DailyTotals, Email, Money, MonthlySummary,
    MonthlyTotals, Transaction,
};
use crate::storage::{Storage, Upserted};

use super::owned_budget;

/// Service for summary maintenance
pub struct SummaryService<'a> {
    storage: &'a Storage,
}

/// What a full rebuild touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Daily rows recomputed
    pub days: usize,
    /// Rows whose stored figures changed (daily and monthly)
    pub changed: usize,
}

/// Income and expense sums, or `None` if either overflows
pub(crate) fn checked_totals<'t>(
    transactions: impl IntoIterator<Item = &'t Transaction>,
) -> Option<(Money, Money)> {
    transactions
        .into_iter()
        .try_fold((Money::zero(), Money::zero()), |(income, expense), txn| {
            if txn.is_income() {
                Some((income.checked_add(txn.amount)?, expense))
            } else {
                Some((income, expense.checked_add(txn.amount)?))
            }
        })
}

pub(crate) const TOTALS_OUT_OF_RANGE: &str = "Period totals exceed the supported amount range";

/// Income and expense sums over a set of transactions
pub(crate) fn sum_by_type<'t>(
    transactions: impl IntoIterator<Item = &'t Transaction>,
) -> BudgetResult<(Money, Money)> {
    checked_totals(transactions).ok_or_else(|| BudgetError::validation(TOTALS_OUT_OF_RANGE))
}

impl<'a> SummaryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Recompute and store the summary of `date` within a budget period
    pub fn update_or_create_daily(
        &self,
        owner: &Email,
        budget_id: BudgetId,
        date: NaiveDate,
    ) -> BudgetResult<DailySummary> {
        let budget = owned_budget(self.storage, owner, budget_id)?;
        let outcome = self.refresh_daily(&budget, date)?;
        if outcome.is_changed() {
            self.storage.summaries.save()?;
        }
        Ok(outcome.into_row())
    }

    /// Recompute and store the period-level summary of a budget period
    pub fn update_or_create_monthly(
        &self,
        owner: &Email,
        budget_id: BudgetId,
    ) -> BudgetResult<MonthlySummary> {
        let budget = owned_budget(self.storage, owner, budget_id)?;
        let outcome = self.refresh_monthly(&budget)?;
        if outcome.is_changed() {
            self.storage.summaries.save()?;
        }
        Ok(outcome.into_row())
    }

    /// Recompute every daily row of a period, then its monthly row.
    ///
    /// Covers each date that has transactions and each date that already has
    /// a row, so a row left behind by deleted transactions is zeroed.
    pub fn rebuild(&self, owner: &Email, budget_id: BudgetId) -> BudgetResult<RebuildReport> {
        let budget = owned_budget(self.storage, owner, budget_id)?;

        let mut dates: BTreeSet<NaiveDate> = self
            .storage
            .transactions
            .get_by_budget(budget.id)?
            .iter()
            .map(|t| t.date)
            .collect();
        dates.extend(
            self.storage
                .summaries
                .daily_for_budget(budget.id)?
                .iter()
                .map(|d| d.date),
        );

        let mut report = RebuildReport::default();
        for date in dates {
            report.days += 1;
            if self.refresh_daily(&budget, date)?.is_changed() {
                report.changed += 1;
            }
        }
        if self.refresh_monthly(&budget)?.is_changed() {
            report.changed += 1;
        }

        if report.changed > 0 {
            self.storage.summaries.save()?;
        }
        Ok(report)
    }

    /// Daily rows of a period, newest date first
    pub fn list_daily(&self, owner: &Email, budget_id: BudgetId) -> BudgetResult<Vec<DailySummary>> {
        let budget = owned_budget(self.storage, owner, budget_id)?;
        let mut days = self.storage.summaries.daily_for_budget(budget.id)?;
        days.reverse();
        Ok(days)
    }

    pub fn get_monthly(
        &self,
        owner: &Email,
        budget_id: BudgetId,
    ) -> BudgetResult<Option<MonthlySummary>> {
        let budget = owned_budget(self.storage, owner, budget_id)?;
        self.storage.summaries.get_monthly(budget.id)
    }

    /// Recompute one daily row without saving; the caller persists
    pub(crate) fn refresh_daily(
        &self,
        budget: &BudgetPeriod,
        date: NaiveDate,
    ) -> BudgetResult<Upserted<DailySummary>> {
        let same_day = self
            .storage
            .transactions
            .get_by_budget_and_date(budget.id, date)?;
        let (income, expense) = sum_by_type(&same_day)?;

        let outcome = self
            .storage
            .summaries
            .upsert_daily(budget.id, date, DailyTotals::new(income, expense))?;

        let name = Some(date.format("%Y-%m-%d").to_string());
        match &outcome {
            Upserted::Created(row) => self.storage.log_create(
                &budget.owner,
                EntityType::DailySummary,
                row.id.to_string(),
                name,
                row,
            )?,
            Upserted::Updated { before, after } => self.storage.log_update(
                &budget.owner,
                EntityType::DailySummary,
                after.id.to_string(),
                name,
                before,
                after,
                Some(format!("net: {} -> {}", before.net_amount, after.net_amount)),
            )?,
            Upserted::Unchanged(_) => {}
        }

        Ok(outcome)
    }

    /// Recompute the monthly row without saving; the caller persists
    pub(crate) fn refresh_monthly(
        &self,
        budget: &BudgetPeriod,
    ) -> BudgetResult<Upserted<MonthlySummary>> {
        let transactions = self.storage.transactions.get_by_budget(budget.id)?;
        let (income, expense) = sum_by_type(&transactions)?;

        let outcome = self.storage.summaries.upsert_monthly(
            budget.id,
            MonthlyTotals::new(budget.total_budget, income, expense),
        )?;

        let name = Some(budget.to_string());
        match &outcome {
            Upserted::Created(row) => self.storage.log_create(
                &budget.owner,
                EntityType::MonthlySummary,
                row.id.to_string(),
                name,
                row,
            )?,
            Upserted::Updated { before, after } => self.storage.log_update(
                &budget.owner,
                EntityType::MonthlySummary,
                after.id.to_string(),
                name,
                before,
                after,
                Some(format!(
                    "remaining: {} -> {}, savings rate: {} -> {}",
                    before.remaining_balance,
                    after.remaining_balance,
                    before.savings_rate,
                    after.savings_rate
                )),
            )?,
            Upserted::Unchanged(_) => {}
        }

        Ok(outcome)
    }
}
