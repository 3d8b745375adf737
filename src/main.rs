use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use monthly_budget::cli::{
    handle_budget_command, handle_category_command, handle_goal_command, handle_summary_command,
    handle_transaction_command, handle_user_command, BudgetCommands, CategoryCommands,
    GoalCommands, SummaryCommands, TransactionCommands, UserCommands,
};
use monthly_budget::config::{BudgetPaths, Settings};
use monthly_budget::display::DisplayFormat;
use monthly_budget::models::Email;
use monthly_budget::reports::DashboardReport;
use monthly_budget::services::UserService;
use monthly_budget::storage::Storage;

#[derive(Parser)]
#[command(
    name = "budget",
    version,
    about = "Personal monthly budgeting from the command line",
    long_about = "Plan a budget period, split it into categories, record income and \
                  expenses against it, and track savings goals. Daily and period \
                  summaries are kept up to date as transactions change."
)]
struct Cli {
    /// Acting user's email (defaults to the registered default user)
    #[arg(short, long, global = true, env = "BUDGET_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// User registration
    #[command(subcommand)]
    User(UserCommands),

    /// Budget period management
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Category management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Income and expense records
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Daily and period summaries
    #[command(subcommand)]
    Summary(SummaryCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Overview of the current period and goals
    Dashboard,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

/// The registered user acting on this invocation
fn acting_user(storage: &Storage, selected: Option<Email>) -> Result<Email> {
    let Some(email) = selected else {
        bail!("No user selected. Pass --user, set BUDGET_USER, or run 'budget user register'.");
    };
    UserService::new(storage).require(&email)?;
    Ok(email)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BudgetPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let selected = cli
        .user
        .as_deref()
        .map(Email::new)
        .or_else(|| settings.default_user.clone());

    match cli.command {
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &paths, &mut settings, selected.as_ref(), cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let owner = acting_user(&storage, selected)?;
            handle_budget_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            let owner = acting_user(&storage, selected)?;
            handle_category_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            let owner = acting_user(&storage, selected)?;
            handle_transaction_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Summary(cmd)) => {
            let owner = acting_user(&storage, selected)?;
            handle_summary_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            let owner = acting_user(&storage, selected)?;
            handle_goal_command(&storage, &settings, &owner, cmd)?;
        }
        Some(Commands::Dashboard) => {
            let owner = acting_user(&storage, selected)?;
            let today = chrono::Local::now().date_naive();
            let report = DashboardReport::generate(
                &storage,
                &owner,
                today,
                settings.recent_transactions_limit,
            )?;
            print!("{}", report.format_terminal(&DisplayFormat::from(&settings)));
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing budget data at: {}", paths.data_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  budget user register \"Your Name\" --email you@example.com");
            println!("  budget budget create --total 2000");
            println!("  budget category setup");
        }
        Some(Commands::Config) => {
            println!("Monthly Budget Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Default period days: {}", settings.period_days());
            println!("  Category colour:     {}", settings.default_category_color);
            println!("  Recent transactions: {}", settings.recent_transactions_limit);
            match &settings.default_user {
                Some(email) => println!("  Default user:        {}", email),
                None => println!("  Default user:        (none)"),
            }
        }
        None => {
            println!("Monthly Budget - personal budgeting from the command line");
            println!();
            println!("Run 'budget --help' for usage information.");
        }
    }

    Ok(())
}
