//! Game engine
//!
//! The storage-independent rules of the game: guess scoring, level windows,
//! endless sampling, daily selection and high-score reconciliation. Each
//! function takes the repository traits it needs and nothing more.

pub mod daily;
pub mod evaluator;
pub mod reconcile;
pub mod sampler;
pub mod similarity;
pub mod window;

pub use daily::{daily_index, daily_puzzle, default_epoch};
pub use evaluator::{GuessEvaluation, NEAR_MISS_SCORE, classify_word, evaluate_guess};
pub use reconcile::reconcile_high_score;
pub use sampler::{DEFAULT_ENDLESS_LIMIT, EndlessBatch, sample_puzzles};
pub use similarity::{MatchBlock, matching_blocks, similarity_ratio};
pub use window::{
    Anchor, DEFAULT_BATCH_SIZE, LevelItem, LevelWindow, NO_CURSOR, level_window,
    progression_center,
};

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("No puzzles available")]
    NoPuzzlesAvailable,
    #[error(transparent)]
    Store(#[from] StoreError),
}
