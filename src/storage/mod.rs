//! Storage layer
//!
//! JSON file storage with atomic writes. Each repository keeps its records
//! in memory behind a lock and writes its whole file on save.

pub mod budgets;
pub mod categories;
pub mod file_io;
pub mod goals;
pub mod summaries;
pub mod transactions;
pub mod users;

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use summaries::{SummaryRepository, Upserted};
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetPaths;
use crate::error::BudgetError;
use crate::models::Email;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    audit: AuditLogger,
    pub users: UserRepository,
    pub budgets: BudgetRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    pub summaries: SummaryRepository,
    pub goals: GoalRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BudgetPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            users: UserRepository::new(paths.users_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            summaries: SummaryRepository::new(paths.summaries_file()),
            goals: GoalRepository::new(paths.goals_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BudgetError> {
        self.users.load()?;
        self.budgets.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        self.summaries.load()?;
        self.goals.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BudgetError> {
        self.users.save()?;
        self.budgets.save()?;
        self.categories.save()?;
        self.transactions.save()?;
        self.summaries.save()?;
        self.goals.save()?;
        Ok(())
    }

    /// Check if `init` has been run
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record the creation of an entity
    pub fn log_create<T: Serialize>(
        &self,
        actor: &Email,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BudgetError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity).by(actor))
    }

    /// Record a change to an entity
    #[allow(clippy::too_many_arguments)]
    pub fn log_update<T: Serialize>(
        &self,
        actor: &Email,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), BudgetError> {
        self.audit.log(
            &AuditEntry::update(entity_type, entity_id, entity_name, before, after, diff_summary)
                .by(actor),
        )
    }

    /// Record the deletion of an entity
    pub fn log_delete<T: Serialize>(
        &self,
        actor: &Email,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BudgetError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity).by(actor))
    }

    /// Record several entries with one write, e.g. a cascade
    pub fn log_batch(&self, entries: &[AuditEntry]) -> Result<(), BudgetError> {
        self.audit.log_batch(entries)
    }
}
