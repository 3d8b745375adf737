//! Dashboard Report
//!
//! The landing view for one user: the budget period covering today (or the
//! newest one), its totals and category breakdown, its monthly summary, the
//! latest transactions, and every savings goal with progress figures.

use chrono::NaiveDate;

use crate::display::DisplayFormat;
use crate::error::BudgetResult;
use crate::models::{BudgetPeriod, Email, Goal, Money, MonthlySummary, Percentage, Transaction};
use crate::services::{
    BudgetService, CategorySummary, GoalService, SummaryService, TransactionFilter,
    TransactionService,
};
use crate::storage::Storage;

/// Figures for the period shown on the dashboard
#[derive(Debug, Clone)]
pub struct BudgetSection {
    pub budget: BudgetPeriod,
    pub total_income: Money,
    pub total_spent: Money,
    pub remaining_balance: Money,
    pub categories: Vec<CategorySummary>,
    /// Stored summary row; `None` until the first transaction or rebuild
    pub monthly: Option<MonthlySummary>,
    /// Newest first
    pub recent_transactions: Vec<Transaction>,
}

/// A goal with its derived figures
#[derive(Debug, Clone)]
pub struct GoalRow {
    pub goal: Goal,
    pub progress: Percentage,
    pub remaining: Money,
    pub days_remaining: i64,
}

/// Dashboard for one user
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub owner: Email,
    pub as_of: NaiveDate,
    pub budget: Option<BudgetSection>,
    pub goals: Vec<GoalRow>,
}

impl DashboardReport {
    /// Build the dashboard of `owner` as of `today`
    pub fn generate(
        storage: &Storage,
        owner: &Email,
        today: NaiveDate,
        recent_limit: usize,
    ) -> BudgetResult<Self> {
        let budget_service = BudgetService::new(storage);

        let budget = match budget_service.current_or_latest(owner, today)? {
            Some(budget) => {
                let recent_transactions = TransactionService::new(storage).list(
                    owner,
                    budget.id,
                    &TransactionFilter {
                        limit: Some(recent_limit),
                        ..Default::default()
                    },
                )?;

                Some(BudgetSection {
                    total_income: budget_service.total_income(&budget)?,
                    total_spent: budget_service.total_spent(&budget)?,
                    remaining_balance: budget_service.remaining_balance(&budget)?,
                    categories: budget_service.categories_summary(&budget)?,
                    monthly: SummaryService::new(storage).get_monthly(owner, budget.id)?,
                    recent_transactions,
                    budget,
                })
            }
            None => None,
        };

        let goals = GoalService::new(storage)
            .list(owner)?
            .into_iter()
            .map(|goal| GoalRow {
                progress: goal.progress_percentage(),
                remaining: goal.remaining_amount(),
                days_remaining: goal.days_remaining_from(today),
                goal,
            })
            .collect();

        Ok(Self {
            owner: owner.clone(),
            as_of: today,
            budget,
            goals,
        })
    }

    /// Number of categories spending more than they were allocated
    pub fn overspent_count(&self) -> usize {
        self.budget
            .as_ref()
            .map(|b| b.categories.iter().filter(|c| c.remaining.is_negative()).count())
            .unwrap_or(0)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, format: &DisplayFormat) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Dashboard for {} - {}\n",
            self.owner,
            format.date(self.as_of)
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        match &self.budget {
            Some(section) => {
                output.push_str(&format!("Budget: {}\n", format.period(&section.budget)));
                output.push_str(&format!(
                    "  Income: {}   Spent: {}   Remaining: {}\n",
                    format.money(section.total_income),
                    format.money(section.total_spent),
                    format.money(section.remaining_balance)
                ));
                if let Some(monthly) = &section.monthly {
                    output.push_str(&format!("  Savings rate: {}\n", monthly.savings_rate));
                }

                if !section.categories.is_empty() {
                    output.push_str(&format!(
                        "\n{:<24} {:>12} {:>12} {:>12} {:>8}\n",
                        "Category", "Allocated", "Spent", "Remaining", "Used"
                    ));
                    output.push_str(&"-".repeat(72));
                    output.push('\n');
                    for row in &section.categories {
                        let marker = if row.remaining.is_negative() { " *" } else { "" };
                        output.push_str(&format!(
                            "{:<24} {:>12} {:>12} {:>12} {:>8}{}\n",
                            row.category.name,
                            format.money(row.allocated),
                            format.money(row.spent),
                            format.money(row.remaining),
                            row.percentage,
                            marker
                        ));
                    }
                }

                output.push_str("\nRecent transactions\n");
                if section.recent_transactions.is_empty() {
                    output.push_str("  (none)\n");
                }
                for txn in &section.recent_transactions {
                    output.push_str(&format!(
                        "  {}  {:<8} {:>12}  {}\n",
                        format.date(txn.date),
                        txn.transaction_type,
                        format.money(txn.amount),
                        txn.note.as_deref().unwrap_or("")
                    ));
                }
            }
            None => output.push_str("No budget yet. Create one with `budget budget create`.\n"),
        }

        output.push_str("\nGoals\n");
        if self.goals.is_empty() {
            output.push_str("  (none)\n");
        }
        for row in &self.goals {
            let status = if row.goal.is_completed { " [done]" } else { "" };
            output.push_str(&format!(
                "  {:<24} {:>12} of {:>12} {:>8}  {} days left{}\n",
                row.goal.title,
                format.money(row.goal.current_progress),
                format.money(row.goal.target_amount),
                row.progress,
                row.days_remaining,
                status
            ));
        }

        if self.overspent_count() > 0 {
            output.push_str("\n* = Overspent\n");
        }

        output
    }
}
