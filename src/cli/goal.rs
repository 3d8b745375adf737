//! Goal CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_goal_details, format_goal_list, DisplayFormat};
use crate::error::BudgetResult;
use crate::models::{Email, Money};
use crate::services::{GoalService, GoalUpdate};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_optional_date, today};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal title
        title: String,
        /// Amount to save
        #[arg(short, long)]
        target: String,
        /// Date to reach it by (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Amount already saved
        #[arg(short, long)]
        progress: Option<String>,
    },

    /// List goals, newest first
    List,

    /// Show a goal
    Show {
        /// Goal title or ID
        goal: String,
    },

    /// Set the amount saved so far
    Progress {
        /// Goal title or ID
        goal: String,
        /// Amount saved
        amount: String,
    },

    /// Mark a goal completed
    Complete {
        /// Goal title or ID
        goal: String,
    },

    /// Mark a completed goal as open again
    Reopen {
        /// Goal title or ID
        goal: String,
    },

    /// Edit a goal
    Edit {
        /// Goal title or ID
        goal: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New target amount
        #[arg(short, long)]
        target: Option<String>,
        /// New target date
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a goal
    Delete {
        /// Goal title or ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    owner: &Email,
    cmd: GoalCommands,
) -> BudgetResult<()> {
    let service = GoalService::new(storage);
    let format = DisplayFormat::from(settings);

    match cmd {
        GoalCommands::Add {
            title,
            target,
            date,
            progress,
        } => {
            let progress = match progress {
                Some(p) => parse_money(&p)?,
                None => Money::zero(),
            };
            let goal =
                service.create(owner, &title, parse_money(&target)?, parse_date(&date)?, progress)?;

            println!("Created goal: {}", goal.title);
            println!("  ID:     {}", goal.id);
            println!(
                "  Target: {} by {}",
                format.money(goal.target_amount),
                format.date(goal.target_date)
            );
        }

        GoalCommands::List => {
            print!("{}", format_goal_list(&service.list(owner)?, today(), &format));
        }

        GoalCommands::Show { goal } => {
            let goal = service.resolve(owner, &goal)?;
            print!("{}", format_goal_details(&goal, today(), &format));
        }

        GoalCommands::Progress { goal, amount } => {
            let goal = service.resolve(owner, &goal)?;
            let updated = service.set_progress(owner, goal.id, parse_money(&amount)?)?;
            println!(
                "{}: {} of {} ({})",
                updated.title,
                format.money(updated.current_progress),
                format.money(updated.target_amount),
                updated.progress_percentage()
            );
        }

        GoalCommands::Complete { goal } => {
            let goal = service.resolve(owner, &goal)?;
            let updated = service.complete(owner, goal.id)?;
            println!("Completed goal: {}", updated.title);
        }

        GoalCommands::Reopen { goal } => {
            let goal = service.resolve(owner, &goal)?;
            let updated = service.reopen(owner, goal.id)?;
            println!("Reopened goal: {}", updated.title);
        }

        GoalCommands::Edit {
            goal,
            title,
            target,
            date,
        } => {
            let goal = service.resolve(owner, &goal)?;

            if title.is_none() && target.is_none() && date.is_none() {
                println!("No changes specified. Use --title, --target or --date.");
                return Ok(());
            }

            let update = GoalUpdate {
                title,
                target_amount: target.as_deref().map(parse_money).transpose()?,
                target_date: parse_optional_date(date.as_deref())?,
                current_progress: None,
            };
            let updated = service.update(owner, goal.id, update)?;
            println!("Updated goal: {}", updated.title);
        }

        GoalCommands::Delete { goal } => {
            let goal = service.resolve(owner, &goal)?;
            let deleted = service.delete(owner, goal.id)?;
            println!("Deleted goal: {}", deleted.title);
        }
    }

    Ok(())
}
