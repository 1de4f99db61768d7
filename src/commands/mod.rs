//! Command implementations

pub mod audit;

pub use audit::{AuditIssue, AuditReport, run_audit};
