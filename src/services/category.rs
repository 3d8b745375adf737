//! Category service
//!
//! Spending categories of a budget period: creation (predefined or custom),
//! edits, deletion that keeps transactions, default setup, and the
//! spent/remaining computations.

use crate::audit::{AuditEntry, EntityType};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetId, Category, CategoryId, CategoryType, Email, Money, DEFAULT_CATEGORY_COLOR,
};
use crate::storage::Storage;

use super::summary::sum_by_type;
use super::{diff_summary, ensure_valid, owned_budget};

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
    default_color: String,
}

/// Fields that can change on an existing category
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub allocated_amount: Option<Money>,
    pub color: Option<String>,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            default_color: DEFAULT_CATEGORY_COLOR.to_string(),
        }
    }

    /// Colour given to categories created without one
    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self
    }

    /// Create a category of one of the predefined types
    pub fn create_predefined(
        &self,
        owner: &Email,
        budget_id: BudgetId,
        category_type: CategoryType,
        allocated: Money,
        color: Option<&str>,
    ) -> BudgetResult<Category> {
        let category = Category::predefined(budget_id, category_type, allocated);
        self.insert(owner, category, color)
    }

    /// Create a user-named category
    pub fn create_custom(
        &self,
        owner: &Email,
        budget_id: BudgetId,
        name: &str,
        allocated: Money,
        color: Option<&str>,
    ) -> BudgetResult<Category> {
        let category = Category::custom(budget_id, name, allocated);
        self.insert(owner, category, color)
    }

    fn insert(&self, owner: &Email, category: Category, color: Option<&str>) -> BudgetResult<Category> {
        owned_budget(self.storage, owner, category.budget_id)?;

        let category = category.with_color(color.unwrap_or(&self.default_color));
        ensure_valid(category.validate())?;
        self.ensure_unique_name(&category)?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            owner,
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    fn ensure_unique_name(&self, category: &Category) -> BudgetResult<()> {
        let clash = self
            .storage
            .categories
            .get_by_budget(category.budget_id)?
            .into_iter()
            .any(|c| c.id != category.id && c.name.eq_ignore_ascii_case(&category.name));
        if clash {
            return Err(BudgetError::Duplicate {
                entity_type: "Category",
                identifier: category.name.clone(),
            });
        }
        Ok(())
    }

    /// Fetch a category whose period belongs to `owner`
    pub fn get(&self, owner: &Email, id: CategoryId) -> BudgetResult<Category> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| BudgetError::category_not_found(id.to_string()))?;
        owned_budget(self.storage, owner, category.budget_id)
            .map_err(|_| BudgetError::category_not_found(id.to_string()))?;
        Ok(category)
    }

    /// Find a category of a period by ID or name
    pub fn find(
        &self,
        owner: &Email,
        budget_id: BudgetId,
        identifier: &str,
    ) -> BudgetResult<Option<Category>> {
        owned_budget(self.storage, owner, budget_id)?;
        self.storage.categories.find_in_budget(budget_id, identifier)
    }

    /// Like `find`, but a miss is an error
    pub fn resolve(
        &self,
        owner: &Email,
        budget_id: BudgetId,
        identifier: &str,
    ) -> BudgetResult<Category> {
        self.find(owner, budget_id, identifier)?
            .ok_or_else(|| BudgetError::category_not_found(identifier))
    }

    /// Categories of a period, ordered by name
    pub fn list(&self, owner: &Email, budget_id: BudgetId) -> BudgetResult<Vec<Category>> {
        owned_budget(self.storage, owner, budget_id)?;
        self.storage.categories.get_by_budget(budget_id)
    }

    pub fn update(
        &self,
        owner: &Email,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> BudgetResult<Category> {
        let mut category = self.get(owner, id)?;
        let before = category.clone();

        if let Some(name) = update.name {
            category.name = name.trim().to_string();
        }
        if let Some(allocated) = update.allocated_amount {
            category.allocated_amount = allocated;
        }
        if let Some(color) = update.color {
            category.color = color;
        }
        ensure_valid(category.validate())?;
        if !category.name.eq_ignore_ascii_case(&before.name) {
            self.ensure_unique_name(&category)?;
        }

        let mut changes = Vec::new();
        if before.name != category.name {
            changes.push(format!("name: {} -> {}", before.name, category.name));
        }
        if before.allocated_amount != category.allocated_amount {
            changes.push(format!(
                "allocated: {} -> {}",
                before.allocated_amount, category.allocated_amount
            ));
        }
        if before.color != category.color {
            changes.push(format!("color: {} -> {}", before.color, category.color));
        }
        let Some(diff) = diff_summary(changes) else {
            return Ok(category);
        };

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            owner,
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
            Some(diff),
        )?;

        Ok(category)
    }

    /// Delete a category.
    ///
    /// Its transactions stay in place with the category reference cleared.
    /// Returns how many transactions were detached.
    pub fn delete(&self, owner: &Email, id: CategoryId) -> BudgetResult<usize> {
        let category = self.get(owner, id)?;

        let detached = self.storage.transactions.clear_category(category.id)?;
        self.storage.categories.delete(category.id)?;

        self.storage.transactions.save()?;
        self.storage.categories.save()?;

        let mut entries = Vec::with_capacity(detached.len() + 1);
        for before in &detached {
            let mut after = before.clone();
            after.clear_category();
            entries.push(
                AuditEntry::update(
                    EntityType::Transaction,
                    before.id.to_string(),
                    None,
                    before,
                    &after,
                    Some(format!("category: {} -> none", category.name)),
                )
                .by(owner),
            );
        }
        entries.push(
            AuditEntry::delete(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                &category,
            )
            .by(owner),
        );
        self.storage.log_batch(&entries)?;

        Ok(detached.len())
    }

    /// Create one zero-allocation category for each predefined type the
    /// period does not have yet
    pub fn setup_defaults(&self, owner: &Email, budget_id: BudgetId) -> BudgetResult<Vec<Category>> {
        owned_budget(self.storage, owner, budget_id)?;
        let existing = self.storage.categories.get_by_budget(budget_id)?;

        let mut created = Vec::new();
        for &category_type in CategoryType::all() {
            let present = existing.iter().any(|c| {
                c.category_type == Some(category_type)
                    || c.name.eq_ignore_ascii_case(category_type.label())
            });
            if present {
                continue;
            }
            let category = Category::predefined(budget_id, category_type, Money::zero())
                .with_color(self.default_color.clone());
            self.storage.categories.upsert(category.clone())?;
            created.push(category);
        }

        if created.is_empty() {
            return Ok(created);
        }
        self.storage.categories.save()?;

        let entries: Vec<_> = created
            .iter()
            .map(|c| {
                AuditEntry::create(EntityType::Category, c.id.to_string(), Some(c.name.clone()), c)
                    .by(owner)
            })
            .collect();
        self.storage.log_batch(&entries)?;

        Ok(created)
    }

    /// Sum of expense transactions referencing the category
    pub fn get_spent(&self, category: &Category) -> BudgetResult<Money> {
        let transactions = self.storage.transactions.get_by_category(category.id)?;
        Ok(sum_by_type(&transactions)?.1)
    }

    /// allocated - spent; negative when overspent
    pub fn get_remaining(&self, category: &Category) -> BudgetResult<Money> {
        Ok(category.allocated_amount - self.get_spent(category)?)
    }
}
