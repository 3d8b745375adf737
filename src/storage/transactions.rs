//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::BudgetError;
use crate::models::{BudgetId, CategoryId, Transaction, TransactionId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

#[derive(Default)]
struct Indexed {
    data: HashMap<TransactionId, Transaction>,
    by_budget: HashMap<BudgetId, Vec<TransactionId>>,
    by_category: HashMap<CategoryId, Vec<TransactionId>>,
}

impl Indexed {
    fn insert(&mut self, txn: Transaction) {
        self.unindex(txn.id);
        self.by_budget.entry(txn.budget_id).or_default().push(txn.id);
        if let Some(cat_id) = txn.category_id {
            self.by_category.entry(cat_id).or_default().push(txn.id);
        }
        self.data.insert(txn.id, txn);
    }

    fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        self.unindex(id);
        self.data.remove(&id)
    }

    fn unindex(&mut self, id: TransactionId) {
        let Some(old) = self.data.get(&id) else {
            return;
        };
        if let Some(ids) = self.by_budget.get_mut(&old.budget_id) {
            ids.retain(|&tid| tid != id);
        }
        if let Some(cat_id) = old.category_id {
            if let Some(ids) = self.by_category.get_mut(&cat_id) {
                ids.retain(|&tid| tid != id);
            }
        }
    }

    fn collect(&self, ids: Option<&Vec<TransactionId>>) -> Vec<Transaction> {
        let mut transactions: Vec<_> = ids
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.data.get(id).cloned())
            .collect();
        transactions.sort_by(newest_first);
        transactions
    }
}

/// Newest date first, then newest creation
fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at))
}

/// Repository for transaction persistence with budget and category indexes
pub struct TransactionRepository {
    path: PathBuf,
    inner: RwLock<Indexed>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            inner: RwLock::new(Indexed::default()),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut inner = self.inner.write().map_err(lock_error)?;
        *inner = Indexed::default();
        for txn in file_data.transactions {
            inner.insert(txn);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let inner = self.inner.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = inner.data.values().cloned().collect();
        transactions.sort_by(newest_first);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, BudgetError> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner.data.get(&id).cloned())
    }

    /// Transactions of a budget period, newest first
    pub fn get_by_budget(&self, budget_id: BudgetId) -> Result<Vec<Transaction>, BudgetError> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner.collect(inner.by_budget.get(&budget_id)))
    }

    /// Transactions referencing a category, newest first
    pub fn get_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Transaction>, BudgetError> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner.collect(inner.by_category.get(&category_id)))
    }

    /// Transactions of a budget period dated exactly `date`
    pub fn get_by_budget_and_date(
        &self,
        budget_id: BudgetId,
        date: NaiveDate,
    ) -> Result<Vec<Transaction>, BudgetError> {
        Ok(self
            .get_by_budget(budget_id)?
            .into_iter()
            .filter(|t| t.date == date)
            .collect())
    }

    /// Resolve a full or short ID among the transactions of the given periods
    pub fn find_in_budgets(
        &self,
        budget_ids: &[BudgetId],
        identifier: &str,
    ) -> Result<Option<Transaction>, BudgetError> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner
            .data
            .values()
            .find(|t| budget_ids.contains(&t.budget_id) && t.id.matches(identifier))
            .cloned())
    }

    pub fn upsert(&self, txn: Transaction) -> Result<(), BudgetError> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        inner.insert(txn);
        Ok(())
    }

    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, BudgetError> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        Ok(inner.remove(id))
    }

    /// Null the category of every transaction referencing it.
    ///
    /// Returns the affected transactions as they were before the change.
    pub fn clear_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, BudgetError> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        let ids = inner.by_category.remove(&category_id).unwrap_or_default();

        let mut before = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(txn) = inner.data.get_mut(&id) {
                before.push(txn.clone());
                txn.clear_category();
            }
        }
        Ok(before)
    }

    /// Remove every transaction of a budget period, returning what was removed
    pub fn delete_for_budget(&self, budget_id: BudgetId) -> Result<Vec<Transaction>, BudgetError> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        let ids = inner.by_budget.get(&budget_id).cloned().unwrap_or_default();

        let removed = ids.into_iter().filter_map(|id| inner.remove(id)).collect();
        inner.by_budget.remove(&budget_id);
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner.data.len())
    }
}
