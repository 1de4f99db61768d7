use crate::auth::AuthError;
use crate::core::{CategoryId, GameMode, PuzzleId, UserId};
use crate::engine::EngineError;
use crate::store::StoreError;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

/// Failure surfaced to a caller
///
/// The message is what the caller sees; storage details never reach it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Internal(_) => 500,
        }
    }

    /// JSON body: `{"error": message}`
    #[must_use]
    pub fn body(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Unauthenticated(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "storage read failed");
        Self::Internal("Internal server error".to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NoPuzzlesAvailable => Self::not_found("No puzzles available"),
            EngineError::Store(err) => err.into(),
        }
    }
}

/// What a failed write was doing, for the error log
pub(crate) struct WriteContext<'a> {
    pub user: &'a UserId,
    pub category: CategoryId,
    pub puzzle: Option<PuzzleId>,
    pub mode: GameMode,
}

impl WriteContext<'_> {
    /// Log `err` with the write's context and hide it behind `message`
    pub(crate) fn fail(&self, err: &StoreError, message: &str) -> ApiError {
        error!(
            user = %self.user,
            category = %self.category,
            puzzle = ?self.puzzle.map(|puzzle| puzzle.0),
            mode = %self.mode,
            error = %err,
            "{message}"
        );
        ApiError::Internal(message.to_string())
    }
}
