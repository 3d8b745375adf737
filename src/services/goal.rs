//! Goal service
//!
//! Savings goals belong directly to a user and are independent of budget
//! periods. Progress is recorded by hand.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Email, Goal, GoalId, Money};
use crate::storage::Storage;

use super::{diff_summary, ensure_valid};

/// Service for goal management
pub struct GoalService<'a> {
    storage: &'a Storage,
}

/// Fields that can change on an existing goal
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub target_amount: Option<Money>,
    pub target_date: Option<NaiveDate>,
    pub current_progress: Option<Money>,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        owner: &Email,
        title: &str,
        target_amount: Money,
        target_date: NaiveDate,
        current_progress: Money,
    ) -> BudgetResult<Goal> {
        let mut goal = Goal::new(owner.clone(), title, target_amount, target_date);
        goal.current_progress = current_progress;
        ensure_valid(goal.validate())?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_create(
            owner,
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.title.clone()),
            &goal,
        )?;

        Ok(goal)
    }

    /// Fetch a goal owned by `owner`
    pub fn get(&self, owner: &Email, id: GoalId) -> BudgetResult<Goal> {
        self.storage
            .goals
            .get(id)?
            .filter(|g| &g.owner == owner)
            .ok_or_else(|| BudgetError::goal_not_found(id.to_string()))
    }

    /// Find a goal of `owner` by ID or title
    pub fn find(&self, owner: &Email, identifier: &str) -> BudgetResult<Option<Goal>> {
        self.storage.goals.find_for_owner(owner, identifier)
    }

    /// Like `find`, but a miss is an error
    pub fn resolve(&self, owner: &Email, identifier: &str) -> BudgetResult<Goal> {
        self.find(owner, identifier)?
            .ok_or_else(|| BudgetError::goal_not_found(identifier))
    }

    /// Goals of `owner`, newest first
    pub fn list(&self, owner: &Email) -> BudgetResult<Vec<Goal>> {
        self.storage.goals.get_by_owner(owner)
    }

    pub fn set_progress(&self, owner: &Email, id: GoalId, progress: Money) -> BudgetResult<Goal> {
        self.update(
            owner,
            id,
            GoalUpdate {
                current_progress: Some(progress),
                ..Default::default()
            },
        )
    }

    pub fn complete(&self, owner: &Email, id: GoalId) -> BudgetResult<Goal> {
        self.set_completed(owner, id, true)
    }

    pub fn reopen(&self, owner: &Email, id: GoalId) -> BudgetResult<Goal> {
        self.set_completed(owner, id, false)
    }

    fn set_completed(&self, owner: &Email, id: GoalId, completed: bool) -> BudgetResult<Goal> {
        let mut goal = self.get(owner, id)?;
        if goal.is_completed == completed {
            return Ok(goal);
        }
        let before = goal.clone();
        goal.set_completed(completed);

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_update(
            owner,
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.title.clone()),
            &before,
            &goal,
            Some(format!("completed: {} -> {}", before.is_completed, completed)),
        )?;

        Ok(goal)
    }

    pub fn update(&self, owner: &Email, id: GoalId, update: GoalUpdate) -> BudgetResult<Goal> {
        let mut goal = self.get(owner, id)?;
        let before = goal.clone();

        if let Some(title) = update.title {
            goal.title = title.trim().to_string();
        }
        if let Some(target) = update.target_amount {
            goal.target_amount = target;
        }
        if let Some(date) = update.target_date {
            goal.target_date = date;
        }
        if let Some(progress) = update.current_progress {
            goal.current_progress = progress;
        }
        ensure_valid(goal.validate())?;

        let mut changes = Vec::new();
        if before.title != goal.title {
            changes.push(format!("title: {} -> {}", before.title, goal.title));
        }
        if before.target_amount != goal.target_amount {
            changes.push(format!("target: {} -> {}", before.target_amount, goal.target_amount));
        }
        if before.target_date != goal.target_date {
            changes.push(format!("date: {} -> {}", before.target_date, goal.target_date));
        }
        if before.current_progress != goal.current_progress {
            changes.push(format!(
                "progress: {} -> {}",
                before.current_progress, goal.current_progress
            ));
        }
        let Some(diff) = diff_summary(changes) else {
            return Ok(before);
        };

        goal.updated_at = chrono::Utc::now();
        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_update(
            owner,
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.title.clone()),
            &before,
            &goal,
            Some(diff),
        )?;

        Ok(goal)
    }

    pub fn delete(&self, owner: &Email, id: GoalId) -> BudgetResult<Goal> {
        let goal = self.get(owner, id)?;

        self.storage.goals.delete(goal.id)?;
        self.storage.goals.save()?;

        self.storage.log_delete(
            owner,
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.title.clone()),
            &goal,
        )?;

        Ok(goal)
    }
}
