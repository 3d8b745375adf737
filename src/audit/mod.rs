//! Audit logging
//!
//! Records every create, update and delete that reaches the store, with
//! before/after values, in an append-only JSON-lines file.
//!
//! - `AuditEntry`: one operation on one entity.
//! - `AuditLogger`: appends entries and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
