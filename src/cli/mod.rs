//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the clap
//! argument parsing with the service layer. Handlers receive the acting
//! user's email explicitly; `main` resolves it once per invocation.

pub mod budget;
pub mod category;
pub mod goal;
pub mod summary;
pub mod transaction;
pub mod user;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use summary::{handle_summary_command, SummaryCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use user::{handle_user_command, UserCommands};

use chrono::{Local, NaiveDate};

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPeriod, Email, Money};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Parse a user-entered amount such as "12.50" or "$1,200"
pub(crate) fn parse_money(input: &str) -> BudgetResult<Money> {
    Money::parse(input).map_err(|e| BudgetError::validation(format!("Invalid amount: {}", e)))
}

/// Parse "YYYY-MM-DD" or the word "today"
pub(crate) fn parse_date(input: &str) -> BudgetResult<NaiveDate> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        BudgetError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", input))
    })
}

pub(crate) fn parse_optional_date(input: Option<&str>) -> BudgetResult<Option<NaiveDate>> {
    input.map(parse_date).transpose()
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The period named by `--budget`, else the one covering today, else the newest
pub(crate) fn resolve_budget(
    storage: &Storage,
    settings: &Settings,
    owner: &Email,
    identifier: Option<&str>,
) -> BudgetResult<BudgetPeriod> {
    let service = BudgetService::new(storage).with_period_days(settings.period_days());
    match identifier {
        Some(identifier) => service.resolve(owner, identifier),
        None => service.current_or_latest(owner, today())?.ok_or_else(|| {
            BudgetError::budget_not_found("no budget yet; create one with 'budget budget create'")
        }),
    }
}
