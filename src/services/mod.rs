//! Service layer
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, ownership checks, computed fields and cross-entity
//! operations such as cascades and summary refreshes. Every operation takes
//! the acting user's email explicitly.

pub mod budget;
pub mod category;
pub mod goal;
pub mod summary;
pub mod transaction;
pub mod user;

pub use budget::{BudgetService, BudgetUpdate, CategorySummary, DeletedBudget};
pub use category::{CategoryService, CategoryUpdate};
pub use goal::{GoalService, GoalUpdate};
pub use summary::{RebuildReport, SummaryService};
pub use transaction::{NewTransaction, TransactionFilter, TransactionService, TransactionUpdate};
pub use user::UserService;

use std::fmt::Display;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetId, BudgetPeriod, Email};
use crate::storage::Storage;

/// Fetch a budget period owned by `owner`.
///
/// A period belonging to someone else is reported exactly like a missing one.
pub(crate) fn owned_budget(
    storage: &Storage,
    owner: &Email,
    budget_id: BudgetId,
) -> BudgetResult<BudgetPeriod> {
    storage
        .budgets
        .get(budget_id)?
        .filter(|b| &b.owner == owner)
        .ok_or_else(|| BudgetError::budget_not_found(budget_id.to_string()))
}

/// Turn a list of model validation errors into a single collected error
pub(crate) fn ensure_valid<E: Display>(errors: Vec<E>) -> BudgetResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(BudgetError::Validation(
            errors.iter().map(ToString::to_string).collect(),
        ))
    }
}

/// Join "field: old -> new" fragments; `None` when nothing changed
pub(crate) fn diff_summary(changes: Vec<String>) -> Option<String> {
    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}
