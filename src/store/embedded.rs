//! Embedded sample catalog
//!
//! A small catalog compiled into the binary so the CLI works without a file.

/// JSON text of the sample catalog
pub const SAMPLE_CATALOG: &str = include_str!("../../data/sample_catalog.json");
