//! Category CLI commands
//!
//! Implements CLI commands for category management within a budget period.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_category_list, format_category_summary, DisplayFormat};
use crate::error::BudgetResult;
use crate::models::{CategoryType, Email};
use crate::services::{BudgetService, CategoryService, CategoryUpdate};
use crate::storage::Storage;

use super::{parse_money, resolve_budget};

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add a category to a budget period
    Add {
        /// Predefined type (food, transport, ...) or a custom name
        name: String,
        /// Amount allocated to the category
        #[arg(short, long, default_value = "0")]
        allocated: String,
        /// Display colour as #RRGGBB
        #[arg(short, long)]
        color: Option<String>,
        /// Treat the name as custom even if it matches a predefined type
        #[arg(long)]
        custom: bool,
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Create the predefined categories that are missing
    Setup {
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// List categories
    List {
        /// Show allocated, spent and remaining per category
        #[arg(short, long)]
        summary: bool,
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// List the predefined category types
    Types,

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New allocated amount
        #[arg(short, long)]
        allocated: Option<String>,
        /// New colour
        #[arg(short, long)]
        color: Option<String>,
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Delete a category; its transactions become uncategorized
    Delete {
        /// Category name or ID
        category: String,
        /// Budget ID or start date (default: current)
        #[arg(short, long)]
        budget: Option<String>,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    owner: &Email,
    cmd: CategoryCommands,
) -> BudgetResult<()> {
    let service =
        CategoryService::new(storage).with_default_color(settings.default_category_color.clone());
    let format = DisplayFormat::from(settings);

    match cmd {
        CategoryCommands::Add {
            name,
            allocated,
            color,
            custom,
            budget,
        } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            let allocated = parse_money(&allocated)?;

            let predefined = if custom {
                None
            } else {
                name.parse::<CategoryType>().ok()
            };
            let category = match predefined {
                Some(kind) => {
                    service.create_predefined(owner, budget.id, kind, allocated, color.as_deref())?
                }
                None => service.create_custom(owner, budget.id, &name, allocated, color.as_deref())?,
            };

            println!("Created category: {}", category.name);
            println!("  ID:        {}", category.id);
            println!("  Allocated: {}", format.money(category.allocated_amount));
            println!("  Budget:    {}", format.period(&budget));
        }

        CategoryCommands::Setup { budget } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            let created = service.setup_defaults(owner, budget.id)?;

            if created.is_empty() {
                println!("All predefined categories already exist.");
            } else {
                println!("Created {} categories:", created.len());
                for category in &created {
                    println!("  {}", category.name);
                }
            }
        }

        CategoryCommands::List { summary, budget } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            println!("Budget: {}", format.period(&budget));
            println!();
            if summary {
                let rows = BudgetService::new(storage).categories_summary(&budget)?;
                print!("{}", format_category_summary(&rows, &format));
            } else {
                print!(
                    "{}",
                    format_category_list(&service.list(owner, budget.id)?, &format)
                );
            }
        }

        CategoryCommands::Types => {
            for kind in CategoryType::all() {
                println!("  {:<15} {}", kind.key(), kind.label());
            }
        }

        CategoryCommands::Edit {
            category,
            name,
            allocated,
            color,
            budget,
        } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            let category = service.resolve(owner, budget.id, &category)?;

            if name.is_none() && allocated.is_none() && color.is_none() {
                println!("No changes specified. Use --name, --allocated or --color.");
                return Ok(());
            }

            let update = CategoryUpdate {
                name,
                allocated_amount: allocated.as_deref().map(parse_money).transpose()?,
                color,
            };
            let updated = service.update(owner, category.id, update)?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category, budget } => {
            let budget = resolve_budget(storage, settings, owner, budget.as_deref())?;
            let category = service.resolve(owner, budget.id, &category)?;
            let detached = service.delete(owner, category.id)?;

            println!("Deleted category: {}", category.name);
            if detached > 0 {
                println!("  {} transactions are now uncategorized", detached);
            }
        }
    }

    Ok(())
}
