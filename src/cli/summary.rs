//! Summary CLI commands
//!
//! Daily and period summaries are kept current on every transaction write;
//! these commands display them and can force a recomputation.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_daily_summaries, format_monthly_summary, DisplayFormat};
use crate::error::BudgetResult;
use crate::models::Email;
use crate::services::SummaryService;
use crate::storage::Storage;

use super::{parse_date, resolve_budget};

/// Summary subcommands
#[derive(Subcommand)]
pub enum SummaryCommands {
    /// Show daily income and expense totals
    Daily {
        /// Recompute and show only this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Show the period totals and savings rate
    Monthly {
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Recompute every summary of a period from its transactions
    Rebuild {
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },
}

/// Handle a summary command
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    owner: &Email,
    cmd: SummaryCommands,
) -> BudgetResult<()> {
    let service = SummaryService::new(storage);
    let format = DisplayFormat::from(settings);

    match cmd {
        SummaryCommands::Daily { date, budget } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            println!("Budget: {}", format.period(&budget));
            println!();

            let days = match date {
                Some(date) => {
                    vec![service.update_or_create_daily(owner, budget.id, parse_date(&date)?)?]
                }
                None => service.list_daily(owner, budget.id)?,
            };
            print!("{}", format_daily_summaries(&days, &format));
        }

        SummaryCommands::Monthly { budget } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            let summary = service.update_or_create_monthly(owner, budget.id)?;
            println!("Budget: {}", format.period(&budget));
            println!();
            print!("{}", format_monthly_summary(&summary, &format));
        }

        SummaryCommands::Rebuild { budget } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            let report = service.rebuild(owner, budget.id)?;
            println!(
                "Rebuilt summaries for {}: {} days checked, {} rows changed",
                format.period(&budget),
                report.days,
                report.changed
            );
        }
    }

    Ok(())
}
