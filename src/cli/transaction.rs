//! Transaction CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_register, DisplayFormat};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryId, Email, TransactionType};
use crate::services::{
    CategoryService, NewTransaction, TransactionFilter, TransactionService, TransactionUpdate,
};
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_optional_date, resolve_budget, today};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record an income or expense
    Add {
        /// Amount (e.g., "12.50")
        amount: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Record an expense for today in the current period
    Quick {
        /// Amount
        amount: String,
        /// Category name or ID
        category: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only income or only expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// From date (inclusive)
        #[arg(long)]
        from: Option<String>,
        /// To date (inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Maximum number of rows
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show a transaction
    Show {
        /// Transaction ID (full or short)
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID (full or short)
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New category name or ID
        #[arg(short, long, conflicts_with = "uncategorize")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        uncategorize: bool,
        /// New note
        #[arg(short, long, conflicts_with = "clear_note")]
        note: Option<String>,
        /// Remove the note
        #[arg(long)]
        clear_note: bool,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID (full or short)
        id: String,
    },
}

fn parse_kind(input: &str) -> BudgetResult<TransactionType> {
    input
        .parse::<TransactionType>()
        .map_err(|e| BudgetError::validation(e.to_string()))
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    owner: &Email,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    let service = TransactionService::new(storage);
    let categories = CategoryService::new(storage);
    let format = DisplayFormat::from(settings);

    let category_name = |id: CategoryId| {
        storage
            .categories
            .get(id)
            .ok()
            .flatten()
            .map(|c| c.name)
    };

    match cmd {
        TransactionCommands::Add {
            amount,
            kind,
            date,
            category,
            note,
            budget,
        } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            let category = match category {
                Some(c) => Some(categories.resolve(owner, budget.id, &c)?.id),
                None => None,
            };

            let txn = service.add(
                owner,
                NewTransaction {
                    budget_id: budget.id,
                    transaction_type: parse_kind(&kind)?,
                    amount: parse_money(&amount)?,
                    date: match date {
                        Some(d) => parse_date(&d)?,
                        None => today(),
                    },
                    category,
                    note,
                },
            )?;

            println!("Recorded {}", format.transaction(&txn));
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::Quick {
            amount,
            category,
            note,
        } => {
            let txn = service.quick_add(
                owner,
                parse_money(&amount)?,
                category.as_deref(),
                note,
                today(),
            )?;
            println!("Recorded {}", format.transaction(&txn));
        }

        TransactionCommands::List {
            budget,
            category,
            kind,
            from,
            to,
            limit,
        } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            let filter = TransactionFilter {
                category_id: match category {
                    Some(c) => Some(categories.resolve(owner, budget.id, &c)?.id),
                    None => None,
                },
                transaction_type: kind.as_deref().map(parse_kind).transpose()?,
                start_date: parse_optional_date(from.as_deref())?,
                end_date: parse_optional_date(to.as_deref())?,
                limit,
            };

            let txns = service.list(owner, budget.id, &filter)?;
            println!("Budget: {}", format.period(&budget));
            println!();
            print!(
                "{}",
                format_transaction_register(
                    &txns,
                    |t| t.category_id.and_then(category_name),
                    &format
                )
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service.resolve(owner, &id)?;
            let name = txn.category_id.and_then(category_name);
            print!("{}", format_transaction_details(&txn, name.as_deref(), &format));
        }

        TransactionCommands::Edit {
            id,
            amount,
            kind,
            date,
            category,
            uncategorize,
            note,
            clear_note,
        } => {
            let txn = service.resolve(owner, &id)?;

            let category = if uncategorize {
                Some(None)
            } else {
                match category {
                    Some(c) => Some(Some(categories.resolve(owner, txn.budget_id, &c)?.id)),
                    None => None,
                }
            };
            let note = if clear_note { Some(None) } else { note.map(Some) };

            let update = TransactionUpdate {
                transaction_type: kind.as_deref().map(parse_kind).transpose()?,
                amount: amount.as_deref().map(parse_money).transpose()?,
                date: parse_optional_date(date.as_deref())?,
                category,
                note,
            };
            let updated = service.update(owner, txn.id, update)?;
            println!("Updated {}", format.transaction(&updated));
        }

        TransactionCommands::Delete { id } => {
            let txn = service.resolve(owner, &id)?;
            let deleted = service.delete(owner, txn.id)?;
            println!("Deleted {}", format.transaction(&deleted));
        }
    }

    Ok(())
}
