//! Goal repository for JSON storage
//!
//! Manages loading and saving savings goals to goals.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Email, Goal, GoalId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GoalData {
    goals: Vec<Goal>,
}

/// Repository for goal persistence
pub struct GoalRepository {
    path: PathBuf,
    data: RwLock<HashMap<GoalId, Goal>>,
}

/// Most recently created first
fn newest_first(a: &Goal, b: &Goal) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: GoalData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for goal in file_data.goals {
            data.insert(goal.id, goal);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut goals: Vec<_> = data.values().cloned().collect();
        goals.sort_by(newest_first);

        write_json_atomic(&self.path, &GoalData { goals })
    }

    pub fn get(&self, id: GoalId) -> Result<Option<Goal>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Goals of `owner`, newest first
    pub fn get_by_owner(&self, owner: &Email) -> Result<Vec<Goal>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut goals: Vec<_> = data
            .values()
            .filter(|g| &g.owner == owner)
            .cloned()
            .collect();
        goals.sort_by(newest_first);
        Ok(goals)
    }

    /// Find a goal of `owner` by ID or by case-insensitive title
    pub fn find_for_owner(
        &self,
        owner: &Email,
        identifier: &str,
    ) -> Result<Option<Goal>, BudgetError> {
        let goals = self.get_by_owner(owner)?;
        let identifier = identifier.trim();

        if let Some(found) = goals.iter().find(|g| g.id.matches(identifier)) {
            return Ok(Some(found.clone()));
        }

        Ok(goals
            .into_iter()
            .find(|g| g.title.eq_ignore_ascii_case(identifier)))
    }

    pub fn upsert(&self, goal: Goal) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(goal.id, goal);
        Ok(())
    }

    pub fn delete(&self, id: GoalId) -> Result<bool, BudgetError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_owner_scoped_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        repo.load().unwrap();

        let alice = Email::new("alice@example.com");
        let bob = Email::new("bob@example.com");
        let later = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let sooner = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        repo.upsert(Goal::new(alice.clone(), "Bike", Money::from_units(800), later))
            .unwrap();
        repo.upsert(Goal::new(alice.clone(), "Trip", Money::from_units(2000), sooner))
            .unwrap();
        repo.upsert(Goal::new(bob.clone(), "Car", Money::from_units(9000), sooner))
            .unwrap();

        let goals = repo.get_by_owner(&alice).unwrap();
        assert_eq!(goals.len(), 2);
        assert!(repo.find_for_owner(&alice, "bike").unwrap().is_some());
        assert!(repo.find_for_owner(&bob, "bike").unwrap().is_none());
    }
}
