//! Budget service
//!
//! Budget period lifecycle (create, update, delete with cascade) and the
//! read-time period aggregates: total spent, total income, remaining balance
//! and the per-category summary.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetId, BudgetPeriod, Category, Email, Money, Percentage, DEFAULT_PERIOD_DAYS,
};
use crate::services::{CategoryService, SummaryService};
use crate::storage::Storage;

use super::summary::sum_by_type;
use super::{diff_summary, ensure_valid, owned_budget};

/// Service for budget period management
pub struct BudgetService<'a> {
    storage: &'a Storage,
    period_days: i64,
}

/// Spending figures for one category of a period
#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub category: Category,
    pub allocated: Money,
    pub spent: Money,
    /// allocated - spent, negative when overspent
    pub remaining: Money,
    /// spent / allocated, zero when nothing is allocated
    pub percentage: Percentage,
}

/// Fields that can change on an existing period
#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub total_budget: Option<Money>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// What a cascading delete removed
#[derive(Debug, Clone)]
pub struct DeletedBudget {
    pub budget: BudgetPeriod,
    pub categories: usize,
    pub transactions: usize,
    pub summaries: usize,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            period_days: DEFAULT_PERIOD_DAYS,
        }
    }

    /// Length given to new periods created without an end date
    pub fn with_period_days(mut self, days: i64) -> Self {
        self.period_days = days;
        self
    }

    /// Create a budget period.
    ///
    /// At most one period may start on a given date for the same owner.
    pub fn create(
        &self,
        owner: &Email,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        total_budget: Money,
    ) -> BudgetResult<BudgetPeriod> {
        let budget = BudgetPeriod::new(
            owner.clone(),
            start_date,
            end_date,
            total_budget,
            self.period_days,
        )
        .map_err(|e| BudgetError::validation(e.to_string()))?;
        ensure_valid(budget.validate())?;

        if self.storage.budgets.find_by_start(owner, start_date)?.is_some() {
            return Err(BudgetError::Duplicate {
                entity_type: "Budget",
                identifier: start_date.format("%Y-%m-%d").to_string(),
            });
        }

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            owner,
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.to_string()),
            &budget,
        )?;

        Ok(budget)
    }

    pub fn get(&self, owner: &Email, id: BudgetId) -> BudgetResult<BudgetPeriod> {
        owned_budget(self.storage, owner, id)
    }

    /// Find a period of `owner` by ID or by its start date ("YYYY-MM-DD")
    pub fn find(&self, owner: &Email, identifier: &str) -> BudgetResult<Option<BudgetPeriod>> {
        if let Ok(start) = NaiveDate::parse_from_str(identifier.trim(), "%Y-%m-%d") {
            if let Some(budget) = self.storage.budgets.find_by_start(owner, start)? {
                return Ok(Some(budget));
            }
        }
        self.storage.budgets.find_for_owner(owner, identifier)
    }

    /// Like `find`, but a miss is an error
    pub fn resolve(&self, owner: &Email, identifier: &str) -> BudgetResult<BudgetPeriod> {
        self.find(owner, identifier)?
            .ok_or_else(|| BudgetError::budget_not_found(identifier))
    }

    /// All periods of `owner`, newest start date first
    pub fn list(&self, owner: &Email) -> BudgetResult<Vec<BudgetPeriod>> {
        self.storage.budgets.get_by_owner(owner)
    }

    /// The newest active period of `owner` that covers `date`
    pub fn current_for(&self, owner: &Email, date: NaiveDate) -> BudgetResult<Option<BudgetPeriod>> {
        Ok(self
            .list(owner)?
            .into_iter()
            .find(|b| b.is_active && b.contains(date)))
    }

    /// The period covering `date`, else the newest period of `owner`
    pub fn current_or_latest(
        &self,
        owner: &Email,
        date: NaiveDate,
    ) -> BudgetResult<Option<BudgetPeriod>> {
        match self.current_for(owner, date)? {
            Some(budget) => Ok(Some(budget)),
            None => Ok(self.list(owner)?.into_iter().next()),
        }
    }

    /// Change the total, end date or active flag of a period.
    ///
    /// A new total refreshes the period's monthly summary.
    pub fn update(
        &self,
        owner: &Email,
        id: BudgetId,
        update: BudgetUpdate,
    ) -> BudgetResult<BudgetPeriod> {
        let mut budget = owned_budget(self.storage, owner, id)?;
        let before = budget.clone();

        if let Some(total) = update.total_budget {
            budget.set_total_budget(total);
        }
        if let Some(end) = update.end_date {
            budget.end_date = end;
            budget.updated_at = chrono::Utc::now();
        }
        if let Some(active) = update.is_active {
            budget.set_active(active);
        }
        ensure_valid(budget.validate())?;

        let mut changes = Vec::new();
        if before.total_budget != budget.total_budget {
            changes.push(format!("total: {} -> {}", before.total_budget, budget.total_budget));
        }
        if before.end_date != budget.end_date {
            changes.push(format!("end: {} -> {}", before.end_date, budget.end_date));
        }
        if before.is_active != budget.is_active {
            changes.push(format!("active: {} -> {}", before.is_active, budget.is_active));
        }
        let Some(diff) = diff_summary(changes) else {
            return Ok(before);
        };

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            owner,
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.to_string()),
            &before,
            &budget,
            Some(diff),
        )?;

        if before.total_budget != budget.total_budget
            && SummaryService::new(self.storage)
                .refresh_monthly(&budget)?
                .is_changed()
        {
            self.storage.summaries.save()?;
        }

        Ok(budget)
    }

    /// Delete a period together with its categories, transactions and summaries
    pub fn delete(&self, owner: &Email, id: BudgetId) -> BudgetResult<DeletedBudget> {
        let budget = owned_budget(self.storage, owner, id)?;

        let categories = self.storage.categories.delete_for_budget(budget.id)?;
        let transactions = self.storage.transactions.delete_for_budget(budget.id)?;
        let (daily, monthly) = self.storage.summaries.delete_for_budget(budget.id)?;
        self.storage.budgets.delete(budget.id)?;

        self.storage.categories.save()?;
        self.storage.transactions.save()?;
        self.storage.summaries.save()?;
        self.storage.budgets.save()?;

        let mut entries = Vec::new();
        for category in &categories {
            entries.push(
                AuditEntry::delete(
                    EntityType::Category,
                    category.id.to_string(),
                    Some(category.name.clone()),
                    category,
                )
                .by(owner),
            );
        }
        for txn in &transactions {
            entries.push(
                AuditEntry::delete(EntityType::Transaction, txn.id.to_string(), None, txn).by(owner),
            );
        }
        for day in &daily {
            entries.push(
                AuditEntry::delete(EntityType::DailySummary, day.id.to_string(), None, day)
                    .by(owner),
            );
        }
        if let Some(month) = &monthly {
            entries.push(
                AuditEntry::delete(EntityType::MonthlySummary, month.id.to_string(), None, month)
                    .by(owner),
            );
        }
        entries.push(
            AuditEntry::delete(
                EntityType::Budget,
                budget.id.to_string(),
                Some(budget.to_string()),
                &budget,
            )
            .by(owner),
        );
        self.storage.log_batch(&entries)?;

        Ok(DeletedBudget {
            categories: categories.len(),
            transactions: transactions.len(),
            summaries: daily.len() + usize::from(monthly.is_some()),
            budget,
        })
    }

    /// Sum of expense transactions in the period
    pub fn total_spent(&self, budget: &BudgetPeriod) -> BudgetResult<Money> {
        let transactions = self.storage.transactions.get_by_budget(budget.id)?;
        Ok(sum_by_type(&transactions)?.1)
    }

    /// Sum of income transactions in the period
    pub fn total_income(&self, budget: &BudgetPeriod) -> BudgetResult<Money> {
        let transactions = self.storage.transactions.get_by_budget(budget.id)?;
        Ok(sum_by_type(&transactions)?.0)
    }

    /// total_budget - total_spent
    pub fn remaining_balance(&self, budget: &BudgetPeriod) -> BudgetResult<Money> {
        Ok(budget.total_budget - self.total_spent(budget)?)
    }

    /// Allocated, spent, remaining and percentage used for every category
    pub fn categories_summary(&self, budget: &BudgetPeriod) -> BudgetResult<Vec<CategorySummary>> {
        let categories = self.storage.categories.get_by_budget(budget.id)?;
        let category_service = CategoryService::new(self.storage);

        categories
            .into_iter()
            .map(|category| {
                let spent = category_service.get_spent(&category)?;
                Ok(CategorySummary {
                    allocated: category.allocated_amount,
                    spent,
                    remaining: category.allocated_amount - spent,
                    percentage: Percentage::of(spent, category.allocated_amount),
                    category,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::{CategoryType, Transaction};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn owner() -> Email {
        Email::new("alice@example.com")
    }

    #[test]
    fn test_create_defaults_end_date() {
        let (_temp, storage) = create_test_storage();
        let budget = BudgetService::new(&storage)
            .create(&owner(), date(1), None, Money::from_units(1000))
            .unwrap();
        assert_eq!(budget.end_date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert!(budget.is_active);

        let short = BudgetService::new(&storage)
            .with_period_days(7)
            .create(&owner(), date(2), None, Money::zero())
            .unwrap();
        assert_eq!(short.end_date, date(9));
    }

    #[test]
    fn test_duplicate_start_date_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.create(&owner(), date(1), None, Money::zero()).unwrap();

        let err = service
            .create(&owner(), date(1), None, Money::from_units(5))
            .unwrap_err();
        assert!(err.is_duplicate());

        // Another user may use the same start date
        service
            .create(&Email::new("bob@example.com"), date(1), None, Money::zero())
            .unwrap();
    }

    #[test]
    fn test_invalid_period_collects_errors() {
        let (_temp, storage) = create_test_storage();
        let err = BudgetService::new(&storage)
            .create(&owner(), date(10), Some(date(5)), Money::from_units(-1))
            .unwrap_err();
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_period_aggregates() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let budget = service
            .create(&owner(), date(1), None, Money::from_units(1000))
            .unwrap();

        let food = Category::predefined(budget.id, CategoryType::Food, Money::from_units(300));
        let travel = Category::predefined(budget.id, CategoryType::Transport, Money::zero());
        storage.categories.upsert(food.clone()).unwrap();
        storage.categories.upsert(travel.clone()).unwrap();
        storage
            .transactions
            .upsert(Transaction::expense(budget.id, Money::from_units(200), date(5)).with_category(food.id))
            .unwrap();
        storage
            .transactions
            .upsert(Transaction::income(budget.id, Money::from_units(50), date(6)))
            .unwrap();

        assert_eq!(service.total_spent(&budget).unwrap(), Money::from_units(200));
        assert_eq!(service.total_income(&budget).unwrap(), Money::from_units(50));
        assert_eq!(service.remaining_balance(&budget).unwrap(), Money::from_units(800));

        let summary = service.categories_summary(&budget).unwrap();
        let food_row = summary.iter().find(|s| s.category.id == food.id).unwrap();
        assert_eq!(food_row.spent, Money::from_units(200));
        assert_eq!(food_row.remaining, Money::from_units(100));
        assert_eq!(food_row.percentage.to_string(), "66.67%");

        let travel_row = summary.iter().find(|s| s.category.id == travel.id).unwrap();
        assert_eq!(travel_row.percentage, Percentage::zero());
    }

    #[test]
    fn test_current_for() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let january = service.create(&owner(), date(1), None, Money::zero()).unwrap();
        let february = service
            .create(&owner(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), None, Money::zero())
            .unwrap();

        let found = service.current_for(&owner(), date(15)).unwrap().unwrap();
        assert_eq!(found.id, january.id);

        service
            .update(&owner(), january.id, BudgetUpdate { is_active: Some(false), ..Default::default() })
            .unwrap();
        assert!(service.current_for(&owner(), date(15)).unwrap().is_none());

        let fallback = service
            .current_or_latest(&owner(), NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(fallback.id, february.id);
    }

    #[test]
    fn test_update_total_refreshes_monthly_summary() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let budget = service
            .create(&owner(), date(1), None, Money::from_units(1000))
            .unwrap();
        SummaryService::new(&storage)
            .update_or_create_monthly(&owner(), budget.id)
            .unwrap();

        service
            .update(
                &owner(),
                budget.id,
                BudgetUpdate {
                    total_budget: Some(Money::from_units(1500)),
                    ..Default::default()
                },
            )
            .unwrap();

        let monthly = storage.summaries.get_monthly(budget.id).unwrap().unwrap();
        assert_eq!(monthly.remaining_balance, Money::from_units(1500));
    }

    #[test]
    fn test_delete_cascades() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let budget = service
            .create(&owner(), date(1), None, Money::from_units(1000))
            .unwrap();
        CategoryService::new(&storage).setup_defaults(&owner(), budget.id).unwrap();
        storage
            .transactions
            .upsert(Transaction::expense(budget.id, Money::from_units(5), date(2)))
            .unwrap();
        SummaryService::new(&storage).rebuild(&owner(), budget.id).unwrap();

        let deleted = service.delete(&owner(), budget.id).unwrap();
        assert_eq!(deleted.categories, 9);
        assert_eq!(deleted.transactions, 1);
        assert_eq!(deleted.summaries, 2);

        assert_eq!(storage.budgets.count().unwrap(), 0);
        assert_eq!(storage.categories.count().unwrap(), 0);
        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert!(storage.summaries.get_monthly(budget.id).unwrap().is_none());
    }

    #[test]
    fn test_other_owner_cannot_see_budget() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let budget = service.create(&owner(), date(1), None, Money::zero()).unwrap();

        let mallory = Email::new("mallory@example.com");
        assert!(service.get(&mallory, budget.id).unwrap_err().is_not_found());
        assert!(service.delete(&mallory, budget.id).unwrap_err().is_not_found());
        assert!(service.find(&mallory, "2025-01-01").unwrap().is_none());
    }

    #[test]
    fn test_create_rejects_end_date_past_calendar() {
        let (_temp, storage) = create_test_storage();
        let start = NaiveDate::from_ymd_opt(262142, 12, 20).unwrap();
        let err = BudgetService::new(&storage)
            .create(&owner(), start, None, Money::from_units(1000))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(BudgetService::new(&storage).list(&owner()).unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_oversized_total() {
        let (_temp, storage) = create_test_storage();
        let err = BudgetService::new(&storage)
            .create(&owner(), date(1), None, Money::parse("10000000000").unwrap())
            .unwrap_err();
        assert!(err.is_validation());
    }
}
