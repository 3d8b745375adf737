//! Budget CLI commands
//!
//! Implements CLI commands for budget period management.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_budget_details, format_budget_list, DisplayFormat};
use crate::error::BudgetResult;
use crate::models::Email;
use crate::services::{BudgetService, BudgetUpdate};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_optional_date, resolve_budget, today};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget period
    Create {
        /// Total budget for the period (e.g., "1000" or "1000.00")
        #[arg(short, long)]
        total: String,
        /// First day (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        start: Option<String>,
        /// Last day (YYYY-MM-DD, default: start + configured period length)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// List budget periods
    List,

    /// Show a period with totals and category breakdown
    Show {
        /// Budget ID or start date (default: current)
        budget: Option<String>,
    },

    /// Edit a budget period
    Edit {
        /// Budget ID or start date
        budget: String,
        /// New total budget
        #[arg(short, long)]
        total: Option<String>,
        /// New end date
        #[arg(short, long)]
        end: Option<String>,
        /// Mark active
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Mark inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Delete a period with its categories, transactions and summaries
    Delete {
        /// Budget ID or start date
        budget: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    owner: &Email,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    let service = BudgetService::new(storage).with_period_days(settings.period_days());
    let format = DisplayFormat::from(settings);

    match cmd {
        BudgetCommands::Create { total, start, end } => {
            let start = match start {
                Some(s) => parse_date(&s)?,
                None => today(),
            };
            let budget = service.create(
                owner,
                start,
                parse_optional_date(end.as_deref())?,
                parse_money(&total)?,
            )?;

            println!("Created budget: {}", format.period(&budget));
            println!("  ID: {}", budget.id);
            println!();
            println!("Run 'budget category setup' to add the default categories.");
        }

        BudgetCommands::List => {
            print!("{}", format_budget_list(&service.list(owner)?, &format));
        }

        BudgetCommands::Show { budget } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            print!(
                "{}",
                format_budget_details(
                    &budget,
                    service.total_income(&budget)?,
                    service.total_spent(&budget)?,
                    service.remaining_balance(&budget)?,
                    &service.categories_summary(&budget)?,
                    &format,
                )
            );
        }

        BudgetCommands::Edit {
            budget,
            total,
            end,
            active,
            inactive,
        } => {
            let budget = service.resolve(owner, &budget)?;

            let is_active = match (active, inactive) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            if total.is_none() && end.is_none() && is_active.is_none() {
                println!("No changes specified. Use --total, --end, --active or --inactive.");
                return Ok(());
            }

            let update = BudgetUpdate {
                total_budget: total.as_deref().map(parse_money).transpose()?,
                end_date: parse_optional_date(end.as_deref())?,
                is_active,
            };
            let updated = service.update(owner, budget.id, update)?;
            println!("Updated budget: {}", format.period(&updated));
        }

        BudgetCommands::Delete { budget } => {
            let budget = service.resolve(owner, &budget)?;
            let deleted = service.delete(owner, budget.id)?;
            println!("Deleted budget: {}", format.period(&deleted.budget));
            println!(
                "  Removed {} categories, {} transactions, {} summaries",
                deleted.categories, deleted.transactions, deleted.summaries
            );
        }
    }

    Ok(())
}
