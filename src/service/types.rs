//! Request and response shapes
//!
//! Field names match the JSON the game client exchanges with the backend.

use super::ApiError;
use crate::core::{Category, GameMode, ProgressId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Parse a JSON request body
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the body is malformed or a field has
/// the wrong type.
pub fn parse_request<T: DeserializeOwned>(json: &str) -> Result<T, ApiError> {
    serde_json::from_str(json)
        .map_err(|err| ApiError::validation(format!("Invalid request: {err}")))
}

/// A puzzle addressed by category slug and level number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRef {
    pub slug: String,
    pub level_num: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    #[serde(flatten)]
    pub puzzle: PuzzleRef,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelsRequest {
    pub slug: String,
    #[serde(default)]
    pub after_position: Option<i64>,
    #[serde(default)]
    pub before_position: Option<i64>,
    #[serde(default)]
    pub center_position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRequest {
    pub slug: String,
    pub level_num: i64,
    pub score: i64,
    pub game_mode: GameMode,
    #[serde(default)]
    pub attempts_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndlessRequest {
    pub slug: String,
    #[serde(default)]
    pub last_position: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndlessSubmitRequest {
    pub slug: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRequest {
    pub slug: String,
}

/// Result of a progress submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub id: ProgressId,
    /// Whether a new record was written
    #[serde(skip)]
    pub created: bool,
}

impl ProgressResponse {
    pub(crate) const ALREADY_RECORDED: &'static str = "Progress already recorded";

    pub(crate) const fn created(id: ProgressId) -> Self {
        Self {
            success: true,
            message: None,
            id,
            created: true,
        }
    }

    pub(crate) fn replayed(id: ProgressId) -> Self {
        Self {
            success: true,
            message: Some(Self::ALREADY_RECORDED.to_string()),
            id,
            created: false,
        }
    }

    /// 201 for a new record, 200 for a replay
    #[must_use]
    pub const fn status(&self) -> u16 {
        if self.created { 201 } else { 200 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreResponse {
    pub success: bool,
    pub high_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionResponse {
    pub solution: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// A category as listed to players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl CategorySummary {
    pub(crate) const COMPLETED_BADGE: &'static str = "Completed";
}

impl From<Category> for CategorySummary {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.0,
            name: category.name,
            slug: category.slug,
            description: category.description,
            emoji: category.emoji,
            high_score: None,
            badge: None,
        }
    }
}

/// One row of a player's endless score board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category_slug: String,
    pub high_score: i64,
}
