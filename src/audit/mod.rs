//! Audit logging for the bill splitter
//!
//! Every create, update and delete of a user, group, membership, item or
//! partition is appended to `audit.log` as one JSON line with the entity's
//! state before and/or after the change.
//!
//! - `AuditEntry`: one operation with timestamp, entity information, and
//!   optional before/after values.
//! - `AuditLogger`: appends entries to the log file and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
