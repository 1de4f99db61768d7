//! Core domain types for acronym puzzles
//!
//! Pure types and functions with no storage access: word normalization,
//! per-word accuracy, acronym derivation and the entity model.

mod accuracy;
mod acronym;
mod model;
mod normalize;

pub use accuracy::WordAccuracy;
pub use acronym::acronym;
pub use model::{
    Category, CategoryId, DEFAULT_PAR_SCORE, GameMode, NewProgress, ProgressId, ProgressRecord,
    Puzzle, PuzzleCard, PuzzleId, UserId,
};
pub use normalize::{is_punctuation, normalize, normalize_sentence};
