//! Reports
//!
//! Read-only views assembled from several services.

pub mod dashboard;

pub use dashboard::{BudgetSection, DashboardReport, GoalRow};
