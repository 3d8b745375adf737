//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{BudgetId, Category, CategoryId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

fn by_name(a: &Category, b: &Category) -> std::cmp::Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then(a.created_at.cmp(&b.created_at))
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| a.budget_id.cmp(&b.budget_id).then(by_name(a, b)));

        write_json_atomic(&self.path, &CategoryData { categories })
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Categories of one budget period, ordered by name
    pub fn get_by_budget(&self, budget_id: BudgetId) -> Result<Vec<Category>, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut categories: Vec<_> = data
            .values()
            .filter(|c| c.budget_id == budget_id)
            .cloned()
            .collect();
        categories.sort_by(by_name);
        Ok(categories)
    }

    /// Find a category of `budget_id` by ID or by case-insensitive name
    pub fn find_in_budget(
        &self,
        budget_id: BudgetId,
        identifier: &str,
    ) -> Result<Option<Category>, BudgetError> {
        let categories = self.get_by_budget(budget_id)?;
        let identifier = identifier.trim();

        if let Some(found) = categories.iter().find(|c| c.id.matches(identifier)) {
            return Ok(Some(found.clone()));
        }

        if let Some(found) = categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(found.clone()));
        }

        // Predefined categories also answer to their type key, e.g. "food"
        Ok(categories.into_iter().find(|c| {
            c.category_type
                .is_some_and(|t| t.key().eq_ignore_ascii_case(identifier))
        }))
    }

    pub fn upsert(&self, category: Category) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> Result<bool, BudgetError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id).is_some())
    }

    /// Remove every category of a budget period, returning what was removed
    pub fn delete_for_budget(&self, budget_id: BudgetId) -> Result<Vec<Category>, BudgetError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let ids: Vec<_> = data
            .values()
            .filter(|c| c.budget_id == budget_id)
            .map(|c| c.id)
            .collect();

        Ok(ids.iter().filter_map(|id| data.remove(id)).collect())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryType, Money};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp, repo) = create_test_repo();
        let budget_id = BudgetId::new();
        let food = Category::predefined(budget_id, CategoryType::Food, Money::from_units(300));
        let food_id = food.id;
        repo.upsert(food).unwrap();
        repo.upsert(Category::custom(budget_id, "Pets", Money::zero()))
            .unwrap();

        let by_name = repo.find_in_budget(budget_id, "food & dining").unwrap().unwrap();
        assert_eq!(by_name.id, food_id);

        let by_id = repo
            .find_in_budget(budget_id, &food_id.to_string())
            .unwrap()
            .unwrap();
        assert_eq!(by_id.id, food_id);

        let by_key = repo.find_in_budget(budget_id, "FOOD").unwrap().unwrap();
        assert_eq!(by_key.id, food_id);

        assert!(repo.find_in_budget(BudgetId::new(), "Pets").unwrap().is_none());
    }

    #[test]
    fn test_delete_for_budget() {
        let (_temp, repo) = create_test_repo();
        let keep = BudgetId::new();
        let drop = BudgetId::new();
        repo.upsert(Category::custom(keep, "Rent", Money::zero())).unwrap();
        repo.upsert(Category::custom(drop, "Rent", Money::zero())).unwrap();
        repo.upsert(Category::custom(drop, "Gym", Money::zero())).unwrap();

        let removed = repo.delete_for_budget(drop).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get_by_budget(keep).unwrap().len(), 1);
    }
}
