//! Log setup for the command-line binary
//!
//! Output goes to stderr so command results on stdout stay machine-readable.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("logging already initialised: {0}")]
    Init(#[from] TryInitError),
}

/// Pick the log filter
///
/// An explicit directive wins, then `RUST_LOG`, then `default`.
///
/// # Errors
///
/// Returns an error if the chosen directive does not parse.
pub fn filter(explicit: Option<&str>, default: &str) -> Result<EnvFilter, LoggingError> {
    if let Some(directive) = explicit {
        return Ok(EnvFilter::try_new(directive)?);
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(default)?),
    }
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns an error for a bad directive or if a subscriber is already set.
pub fn init(explicit: Option<&str>, default: &str) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(filter(explicit, default)?)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}
