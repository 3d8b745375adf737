//! Transaction service
//!
//! Recording, editing and deleting income and expense records. Every write
//! refreshes the daily summary of each affected date and the monthly summary
//! of the period with a full recomputation.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetId, BudgetPeriod, CategoryId, Email, Money, Transaction, TransactionId,
    TransactionType,
};
use crate::services::{BudgetService, CategoryService, SummaryService};
use crate::storage::Storage;

use super::summary::{checked_totals, TOTALS_OUT_OF_RANGE};
use super::{diff_summary, owned_budget};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub budget_id: BudgetId,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: Option<CategoryId>,
    pub note: Option<String>,
}

/// Fields that can change on an existing transaction.
///
/// `category` and `note` are doubly optional: `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub category: Option<Option<CategoryId>>,
    pub note: Option<Option<String>>,
}

/// Options for listing transactions of a period
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub category_id: Option<CategoryId>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    fn matches(&self, txn: &Transaction) -> bool {
        if self.category_id.is_some() && txn.category_id != self.category_id {
            return false;
        }
        if let Some(kind) = self.transaction_type {
            if txn.transaction_type != kind {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        true
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a transaction in a period
    pub fn add(&self, owner: &Email, input: NewTransaction) -> BudgetResult<Transaction> {
        let budget = owned_budget(self.storage, owner, input.budget_id)?;

        let mut txn = Transaction::new(budget.id, input.transaction_type, input.amount, input.date);
        txn.category_id = input.category;
        if let Some(note) = input.note {
            txn = txn.with_note(note);
        }
        self.validate(&txn)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            owner,
            EntityType::Transaction,
            txn.id.to_string(),
            txn.note.clone(),
            &txn,
        )?;

        self.refresh_summaries(&budget, &[txn.date])?;
        Ok(txn)
    }

    /// Record an expense for today in the active period covering today.
    ///
    /// `category` is looked up by name or ID within that period.
    pub fn quick_add(
        &self,
        owner: &Email,
        amount: Money,
        category: Option<&str>,
        note: Option<String>,
        today: NaiveDate,
    ) -> BudgetResult<Transaction> {
        let budget = BudgetService::new(self.storage)
            .current_for(owner, today)?
            .ok_or_else(|| {
                BudgetError::budget_not_found(format!("active budget covering {}", today))
            })?;

        let category = match category {
            Some(identifier) => Some(
                CategoryService::new(self.storage)
                    .resolve(owner, budget.id, identifier)?
                    .id,
            ),
            None => None,
        };

        self.add(
            owner,
            NewTransaction {
                budget_id: budget.id,
                transaction_type: TransactionType::Expense,
                amount,
                date: today,
                category,
                note,
            },
        )
    }

    /// Fetch a transaction whose period belongs to `owner`
    pub fn get(&self, owner: &Email, id: TransactionId) -> BudgetResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| BudgetError::transaction_not_found(id.to_string()))?;
        owned_budget(self.storage, owner, txn.budget_id)
            .map_err(|_| BudgetError::transaction_not_found(id.to_string()))?;
        Ok(txn)
    }

    /// Resolve a full or short ID among all transactions of `owner`
    pub fn find(&self, owner: &Email, identifier: &str) -> BudgetResult<Option<Transaction>> {
        let budget_ids: Vec<_> = self
            .storage
            .budgets
            .get_by_owner(owner)?
            .iter()
            .map(|b| b.id)
            .collect();
        self.storage.transactions.find_in_budgets(&budget_ids, identifier)
    }

    /// Like `find`, but a miss is an error
    pub fn resolve(&self, owner: &Email, identifier: &str) -> BudgetResult<Transaction> {
        self.find(owner, identifier)?
            .ok_or_else(|| BudgetError::transaction_not_found(identifier))
    }

    /// Transactions of a period, newest first
    pub fn list(
        &self,
        owner: &Email,
        budget_id: BudgetId,
        filter: &TransactionFilter,
    ) -> BudgetResult<Vec<Transaction>> {
        owned_budget(self.storage, owner, budget_id)?;

        let matching = self
            .storage
            .transactions
            .get_by_budget(budget_id)?
            .into_iter()
            .filter(|t| filter.matches(t));

        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    pub fn update(
        &self,
        owner: &Email,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> BudgetResult<Transaction> {
        let mut txn = self.get(owner, id)?;
        let before = txn.clone();

        if let Some(kind) = update.transaction_type {
            txn.transaction_type = kind;
        }
        if let Some(amount) = update.amount {
            txn.amount = amount;
        }
        if let Some(date) = update.date {
            txn.date = date;
        }
        if let Some(category) = update.category {
            txn.category_id = category;
        }
        if let Some(note) = update.note {
            txn = txn.with_note(note.unwrap_or_default());
        }
        self.validate(&txn)?;

        let mut changes = Vec::new();
        if before.transaction_type != txn.transaction_type {
            changes.push(format!("type: {} -> {}", before.transaction_type, txn.transaction_type));
        }
        if before.amount != txn.amount {
            changes.push(format!("amount: {} -> {}", before.amount, txn.amount));
        }
        if before.date != txn.date {
            changes.push(format!("date: {} -> {}", before.date, txn.date));
        }
        if before.category_id != txn.category_id {
            changes.push("category changed".to_string());
        }
        if before.note != txn.note {
            changes.push("note changed".to_string());
        }
        let Some(diff) = diff_summary(changes) else {
            return Ok(before);
        };

        txn.updated_at = chrono::Utc::now();
        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            owner,
            EntityType::Transaction,
            txn.id.to_string(),
            txn.note.clone(),
            &before,
            &txn,
            Some(diff),
        )?;

        let budget = owned_budget(self.storage, owner, txn.budget_id)?;
        self.refresh_summaries(&budget, &[before.date, txn.date])?;
        Ok(txn)
    }

    pub fn delete(&self, owner: &Email, id: TransactionId) -> BudgetResult<Transaction> {
        let txn = self.get(owner, id)?;
        let budget = owned_budget(self.storage, owner, txn.budget_id)?;

        self.storage.transactions.delete(txn.id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            owner,
            EntityType::Transaction,
            txn.id.to_string(),
            txn.note.clone(),
            &txn,
        )?;

        self.refresh_summaries(&budget, &[txn.date])?;
        Ok(txn)
    }

    /// Positive amount, and a category (if any) from the same period
    fn validate(&self, txn: &Transaction) -> BudgetResult<()> {
        let mut errors: Vec<String> = txn.validate().iter().map(ToString::to_string).collect();

        if let Some(category_id) = txn.category_id {
            match self.storage.categories.get(category_id)? {
                Some(category) if category.budget_id == txn.budget_id => {}
                Some(category) => errors.push(format!(
                    "Category '{}' belongs to a different budget",
                    category.name
                )),
                None => errors.push(format!("Category not found: {}", category_id)),
            }
        }

        // The period totals must stay representable once this record is stored
        let existing = self.storage.transactions.get_by_budget(txn.budget_id)?;
        let after_write = existing
            .iter()
            .filter(|t| t.id != txn.id)
            .chain(std::iter::once(txn));
        if checked_totals(after_write).is_none() {
            errors.push(TOTALS_OUT_OF_RANGE.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BudgetError::Validation(errors))
        }
    }

    fn refresh_summaries(&self, budget: &BudgetPeriod, dates: &[NaiveDate]) -> BudgetResult<()> {
        let summaries = SummaryService::new(self.storage);

        let mut changed = false;
        let mut seen: Vec<NaiveDate> = Vec::with_capacity(dates.len());
        for &date in dates {
            if seen.contains(&date) {
                continue;
            }
            seen.push(date);
            changed |= summaries.refresh_daily(budget, date)?.is_changed();
        }
        changed |= summaries.refresh_monthly(budget)?.is_changed();

        if changed {
            self.storage.summaries.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::CategoryType;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn owner() -> Email {
        Email::new("alice@example.com")
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn setup_budget(storage: &Storage) -> BudgetPeriod {
        BudgetService::new(storage)
            .create(&owner(), date(1), None, Money::from_units(1000))
            .unwrap()
    }

    fn expense(budget: &BudgetPeriod, units: i64, day: u32) -> NewTransaction {
        NewTransaction {
            budget_id: budget.id,
            transaction_type: TransactionType::Expense,
            amount: Money::from_units(units),
            date: date(day),
            category: None,
            note: None,
        }
    }

    #[test]
    fn test_add_refreshes_summaries() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        let food = CategoryService::new(&storage)
            .create_predefined(&owner(), budget.id, CategoryType::Food, Money::from_units(300), None)
            .unwrap();

        let service = TransactionService::new(&storage);
        service
            .add(&owner(), NewTransaction { category: Some(food.id), ..expense(&budget, 200, 5) })
            .unwrap();

        let day = storage.summaries.get_daily(budget.id, date(5)).unwrap().unwrap();
        assert_eq!(day.total_income, Money::zero());
        assert_eq!(day.total_expense, Money::from_units(200));
        assert_eq!(day.net_amount, Money::from_units(-200));

        let monthly = storage.summaries.get_monthly(budget.id).unwrap().unwrap();
        assert_eq!(monthly.remaining_balance, Money::from_units(800));
    }

    #[test]
    fn test_validation_collects_errors() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        let other = BudgetService::new(&storage)
            .create(&owner(), date(20), None, Money::zero())
            .unwrap();
        let foreign_category = CategoryService::new(&storage)
            .create_custom(&owner(), other.id, "Elsewhere", Money::zero(), None)
            .unwrap();

        let err = TransactionService::new(&storage)
            .add(
                &owner(),
                NewTransaction {
                    category: Some(foreign_category.id),
                    ..expense(&budget, 0, 5)
                },
            )
            .unwrap_err();
        assert_eq!(err.messages().len(), 2);
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_update_moves_between_days() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        let service = TransactionService::new(&storage);
        let txn = service.add(&owner(), expense(&budget, 30, 5)).unwrap();

        let moved = service
            .update(
                &owner(),
                txn.id,
                TransactionUpdate {
                    date: Some(date(7)),
                    amount: Some(Money::from_units(45)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(moved.date, date(7));

        let old_day = storage.summaries.get_daily(budget.id, date(5)).unwrap().unwrap();
        assert_eq!(old_day.total_expense, Money::zero());
        let new_day = storage.summaries.get_daily(budget.id, date(7)).unwrap().unwrap();
        assert_eq!(new_day.total_expense, Money::from_units(45));
    }

    #[test]
    fn test_delete_zeroes_daily_summary() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        let service = TransactionService::new(&storage);
        let txn = service.add(&owner(), expense(&budget, 30, 5)).unwrap();

        service.delete(&owner(), txn.id).unwrap();
        assert_eq!(storage.transactions.count().unwrap(), 0);

        let day = storage.summaries.get_daily(budget.id, date(5)).unwrap().unwrap();
        assert_eq!(day.net_amount, Money::zero());
        let monthly = storage.summaries.get_monthly(budget.id).unwrap().unwrap();
        assert_eq!(monthly.total_expense, Money::zero());
    }

    #[test]
    fn test_quick_add_uses_active_budget() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        CategoryService::new(&storage)
            .setup_defaults(&owner(), budget.id)
            .unwrap();

        let txn = TransactionService::new(&storage)
            .quick_add(&owner(), Money::from_units(12), Some("transportation"), None, date(10))
            .unwrap();
        assert_eq!(txn.budget_id, budget.id);
        assert!(txn.is_expense());
        assert!(txn.category_id.is_some());

        let err = TransactionService::new(&storage)
            .quick_add(&owner(), Money::from_units(12), None, None, date(1) - chrono::Duration::days(1))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_filters() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        let service = TransactionService::new(&storage);
        service.add(&owner(), expense(&budget, 10, 3)).unwrap();
        service.add(&owner(), expense(&budget, 20, 4)).unwrap();
        service
            .add(
                &owner(),
                NewTransaction {
                    transaction_type: TransactionType::Income,
                    ..expense(&budget, 500, 4)
                },
            )
            .unwrap();

        let all = service
            .list(&owner(), budget.id, &TransactionFilter::default())
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.last().unwrap().date, date(3));

        let expenses = service
            .list(
                &owner(),
                budget.id,
                &TransactionFilter {
                    transaction_type: Some(TransactionType::Expense),
                    start_date: Some(date(4)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, Money::from_units(20));

        let limited = service
            .list(&owner(), budget.id, &TransactionFilter { limit: Some(2), ..Default::default() })
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_foreign_transaction_is_not_found() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        let service = TransactionService::new(&storage);
        let txn = service.add(&owner(), expense(&budget, 10, 3)).unwrap();

        let mallory = Email::new("mallory@example.com");
        assert!(service.get(&mallory, txn.id).unwrap_err().is_not_found());
        assert!(service.find(&mallory, &txn.id.to_string()).unwrap().is_none());
        assert!(service.resolve(&owner(), &txn.id.to_string()).is_ok());
    }

    #[test]
    fn test_oversized_amount_leaves_store_untouched() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        let service = TransactionService::new(&storage);
        service.add(&owner(), expense(&budget, 40, 2)).unwrap();

        let huge = NewTransaction {
            amount: Money::parse("90000000000000000").unwrap(),
            ..expense(&budget, 0, 3)
        };
        for _ in 0..2 {
            let err = service.add(&owner(), huge.clone()).unwrap_err();
            assert!(err.is_validation());
        }

        assert_eq!(storage.transactions.get_by_budget(budget.id).unwrap().len(), 1);
        let monthly = SummaryService::new(&storage)
            .get_monthly(&owner(), budget.id)
            .unwrap()
            .unwrap();
        assert_eq!(monthly.total_expense, Money::from_units(40));
        assert_eq!(monthly.remaining_balance, Money::from_units(960));
    }

    #[test]
    fn test_period_total_overflow_is_rejected() {
        let (_temp, storage) = create_test_storage();
        let budget = setup_budget(&storage);
        let service = TransactionService::new(&storage);

        // A record written before amounts were capped
        storage
            .transactions
            .upsert(Transaction::expense(budget.id, Money::from_cents(i64::MAX - 10), date(2)))
            .unwrap();

        let err = service
            .add(
                &owner(),
                NewTransaction {
                    amount: Money::MAX,
                    ..expense(&budget, 0, 3)
                },
            )
            .unwrap_err();
        assert!(err.to_string().contains("supported amount range"));
        assert_eq!(storage.transactions.get_by_budget(budget.id).unwrap().len(), 1);

        storage
            .transactions
            .upsert(Transaction::expense(budget.id, Money::from_cents(i64::MAX - 10), date(2)))
            .unwrap();
        let rebuilt = SummaryService::new(&storage).rebuild(&owner(), budget.id);
        assert!(rebuilt.unwrap_err().is_validation());
    }
}
