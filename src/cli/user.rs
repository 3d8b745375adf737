//! User CLI commands

use clap::Subcommand;

use crate::config::{BudgetPaths, Settings};
use crate::display::DisplayFormat;
use crate::error::BudgetResult;
use crate::models::Email;
use crate::services::UserService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Full name
        name: String,
        /// Email address (identifies the user)
        #[arg(short, long)]
        email: String,
        /// Make this the default user for later commands
        #[arg(long)]
        default: bool,
    },

    /// Show the current user
    Show,

    /// List registered users
    List,
}

/// Handle a user command.
///
/// `current` is the user selected with `--user` or the settings default, if any.
pub fn handle_user_command(
    storage: &Storage,
    paths: &BudgetPaths,
    settings: &mut Settings,
    current: Option<&Email>,
    cmd: UserCommands,
) -> BudgetResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Register {
            name,
            email,
            default,
        } => {
            let user = service.register(&name, &email)?;
            println!("Registered {}", user);

            if default || settings.default_user.is_none() {
                settings.default_user = Some(user.email.clone());
                settings.save(paths)?;
                println!("  Set as default user");
            }
        }

        UserCommands::Show => match current {
            Some(email) => {
                let user = service.require(email)?;
                println!("{}", user);
                let format = DisplayFormat::from(&*settings);
                println!("  Registered: {}", format.date(user.created_at.date_naive()));
            }
            None => println!("No user selected. Pass --user or register one."),
        },

        UserCommands::List => {
            let users = service.list()?;
            if users.is_empty() {
                println!("No users registered.");
            }
            for user in users {
                let marker = if Some(&user.email) == current { "*" } else { " " };
                println!("{} {}", marker, user);
            }
        }
    }

    Ok(())
}
