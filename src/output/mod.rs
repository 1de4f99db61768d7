//! Terminal output formatting
//!
//! Display utilities for CLI results and pretty-printing.

pub mod display;
pub mod formatters;

pub use display::{
    print_audit_report, print_card, print_categories, print_endless_batch, print_evaluation,
    print_level_window, print_progress, print_scores,
};
