//! Monthly Budget - personal budgeting core
//!
//! This library provides the core functionality for the `budget` command-line
//! application. A user plans a budget period, splits it into categories,
//! records income and expenses against it and tracks savings goals. Daily and
//! period summaries are recomputed from the transactions on every write.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (periods, categories, transactions, goals, etc.)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `reports`: Read-only views spanning several services
//! - `display`: Plain-text formatting for the terminal
//! - `cli`: Command handlers for the `budget` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use monthly_budget::config::{BudgetPaths, Settings};
//! use monthly_budget::storage::Storage;
//!
//! let paths = BudgetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
