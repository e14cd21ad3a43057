//! Core business logic - framework-agnostic operations over the entities.
//!
//! Nothing here knows about HTTP. Operations take a database connection, the acting
//! employee where permissions apply, and a notifier where they mutate.

/// Client registration, edits and cascading deletes
pub mod client;
/// Company singleton record
pub mod company;
/// Currency records
pub mod currency;
/// Employee lookup and bootstrap
pub mod employee;
/// Capability checks
pub mod permission;
/// Transaction (process) lifecycle and queries
pub mod process;
/// Per-currency aggregation and status classification
pub mod report;
