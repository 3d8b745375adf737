//! Budget period repository for JSON storage
//!
//! Manages loading and saving budget periods to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::BudgetError;
use crate::models::{BudgetId, BudgetPeriod, Email};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<BudgetPeriod>,
}

/// Repository for budget period persistence
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetId, BudgetPeriod>>,
}

/// Newest start date first, then newest creation
fn newest_first(a: &BudgetPeriod, b: &BudgetPeriod) -> std::cmp::Ordering {
    b.start_date
        .cmp(&a.start_date)
        .then(b.created_at.cmp(&a.created_at))
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for budget in file_data.budgets {
            data.insert(budget.id, budget);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        budgets.sort_by(newest_first);

        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<BudgetPeriod>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All periods owned by `owner`, newest first
    pub fn get_by_owner(&self, owner: &Email) -> Result<Vec<BudgetPeriod>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut budgets: Vec<_> = data
            .values()
            .filter(|b| &b.owner == owner)
            .cloned()
            .collect();
        budgets.sort_by(newest_first);
        Ok(budgets)
    }

    /// The period of `owner` starting on `start_date`, if any
    pub fn find_by_start(
        &self,
        owner: &Email,
        start_date: NaiveDate,
    ) -> Result<Option<BudgetPeriod>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data
            .values()
            .find(|b| &b.owner == owner && b.start_date == start_date)
            .cloned())
    }

    /// Resolve a full or short ID among the periods of `owner`
    pub fn find_for_owner(
        &self,
        owner: &Email,
        identifier: &str,
    ) -> Result<Option<BudgetPeriod>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data
            .values()
            .find(|b| &b.owner == owner && b.id.matches(identifier))
            .cloned())
    }

    pub fn upsert(&self, budget: BudgetPeriod) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> Result<bool, BudgetError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
