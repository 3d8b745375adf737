//! Display formatting for terminal output
//!
//! Turns models and service results into plain text. List views are tables
//! rendered with `tabled`; detail views are aligned label/value lines.

pub mod budget;
pub mod category;
pub mod goal;
pub mod summary;
pub mod transaction;

pub use budget::{format_budget_details, format_budget_list};
pub use category::{format_category_list, format_category_summary};
pub use goal::{format_goal_details, format_goal_list};
pub use summary::{format_daily_summaries, format_monthly_summary};
pub use transaction::{format_transaction_details, format_transaction_register};

use std::fmt::Write;

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{BudgetPeriod, Money, Transaction};

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Currency symbol and date format applied to every printed amount and date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormat {
    pub currency_symbol: String,
    pub date_format: String,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: FALLBACK_DATE_FORMAT.to_string(),
        }
    }
}

impl From<&Settings> for DisplayFormat {
    fn from(settings: &Settings) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
        }
    }
}

impl DisplayFormat {
    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format a date; an unusable strftime pattern falls back to YYYY-MM-DD
    pub fn date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", date.format(FALLBACK_DATE_FORMAT));
        }
        out
    }

    /// "start to end (total)"
    pub fn period(&self, budget: &BudgetPeriod) -> String {
        format!(
            "{} to {} ({})",
            self.date(budget.start_date),
            self.date(budget.end_date),
            self.money(budget.total_budget)
        )
    }

    /// "Expense - $12.00 - date"
    pub fn transaction(&self, txn: &Transaction) -> String {
        format!(
            "{} - {} - {}",
            txn.transaction_type,
            self.money(txn.amount),
            self.date(txn.date)
        )
    }
}

/// Render rows as a psql-style table
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Shorten `s` to at most `max` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
