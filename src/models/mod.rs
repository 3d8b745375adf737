//! Core data models
//!
//! This module contains the data structures of the budgeting domain:
//! users, budget periods, categories, transactions, derived summaries and
//! savings goals.

pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod percentage;
pub mod period;
pub mod summary;
pub mod transaction;
pub mod user;

pub use category::{Category, CategoryType, DEFAULT_CATEGORY_COLOR};
pub use goal::Goal;
pub use ids::{BudgetId, CategoryId, DailySummaryId, GoalId, MonthlySummaryId, TransactionId};
pub use money::Money;
pub use percentage::Percentage;
pub use period::{BudgetPeriod, DEFAULT_PERIOD_DAYS};
pub use summary::{DailySummary, DailyTotals, MonthlySummary, MonthlyTotals};
pub use transaction::{Transaction, TransactionType};
pub use user::{Email, User};
