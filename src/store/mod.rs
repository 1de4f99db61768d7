//! Repository interfaces
//!
//! The game core never builds queries itself. Everything it needs from
//! persistence goes through these traits; [`MemoryStore`] is the in-process
//! implementation used by the CLI and the tests.

pub mod catalog;
mod embedded;
pub(crate) mod memory;

pub use catalog::Catalog;
pub use embedded::SAMPLE_CATALOG;
pub use memory::MemoryStore;

use crate::core::{
    Category, CategoryId, GameMode, NewProgress, ProgressId, ProgressRecord, Puzzle, PuzzleId,
    UserId,
};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Storage failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected the write; carries the existing row
    #[error("progress record {0} already exists")]
    Duplicate(ProgressId),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which categories a slug lookup may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScope<'a> {
    /// Any category, active or not, regardless of creator
    Any,
    /// Only categories without a creator
    System,
    /// System categories plus those created by this user
    VisibleTo(&'a UserId),
}

/// A slice of the ordered levels of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelQuery {
    /// Positions in `start..=end`, ascending
    Range { start: i64, end: i64 },
    /// Up to `limit` positions greater than `after`, ascending
    After { after: i64, limit: usize },
    /// Up to `limit` positions less than `before`, descending
    Before { before: i64, limit: usize },
}

/// One level row as the window engine sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRow {
    pub puzzle_id: PuzzleId,
    pub position: u32,
    pub par_score: u32,
}

/// A player's stored result for one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelProgress {
    pub score: i64,
    pub attempts_data: Option<String>,
}

pub trait PuzzleRepository {
    /// Puzzle at `position` in `category`
    fn puzzle_at(&self, category: CategoryId, position: u32) -> StoreResult<Option<Puzzle>>;

    fn puzzle_count(&self, category: CategoryId) -> StoreResult<usize>;

    /// All positions in `category`, ascending
    fn positions(&self, category: CategoryId) -> StoreResult<Vec<u32>>;

    /// Level rows selected by `query`, in the order the query defines
    fn levels(&self, category: CategoryId, query: LevelQuery) -> StoreResult<Vec<LevelRow>>;

    /// Whether any level sits strictly below `position`
    fn has_level_before(&self, category: CategoryId, position: i64) -> StoreResult<bool>;

    /// Whether any level sits strictly above `position`
    fn has_level_after(&self, category: CategoryId, position: i64) -> StoreResult<bool>;
}

pub trait CategoryRepository {
    /// Look a category up by slug, ignoring ASCII case
    fn category_by_slug(
        &self,
        slug: &str,
        scope: CategoryScope<'_>,
    ) -> StoreResult<Option<Category>>;

    /// Active categories (system ones, plus the user's own when given),
    /// ordered by display order then name
    fn active_categories(&self, user: Option<&UserId>) -> StoreResult<Vec<Category>>;
}

pub trait ProgressRepository {
    /// Existing record for (user, puzzle, mode); for non-permanent modes only
    /// records written on `day` count
    fn find_progress(
        &self,
        user: &UserId,
        puzzle: Option<PuzzleId>,
        mode: GameMode,
        day: NaiveDate,
    ) -> StoreResult<Option<ProgressRecord>>;

    /// Insert a record, failing with [`StoreError::Duplicate`] when a
    /// permanent-mode record for the same (user, puzzle) exists
    fn insert_progress(&self, progress: NewProgress) -> StoreResult<ProgressRecord>;

    /// Highest position the user completed in `category` under levels mode
    fn highest_completed_position(
        &self,
        user: &UserId,
        category: CategoryId,
    ) -> StoreResult<Option<u32>>;

    /// Levels-mode results for the given puzzles
    fn level_progress(
        &self,
        user: &UserId,
        puzzles: &[PuzzleId],
    ) -> StoreResult<FxHashMap<PuzzleId, LevelProgress>>;

    /// Categories with at least one `mode` record written on `day`
    fn categories_played_on(
        &self,
        user: &UserId,
        mode: GameMode,
        day: NaiveDate,
    ) -> StoreResult<Vec<CategoryId>>;
}

pub trait HighScoreRepository {
    fn high_score(&self, user: &UserId, category: CategoryId) -> StoreResult<Option<i64>>;

    /// All of a user's high scores
    fn high_scores(&self, user: &UserId) -> StoreResult<FxHashMap<CategoryId, i64>>;

    /// Atomically replace the (user, category) high score with
    /// `update(current)`
    ///
    /// The row stays exclusively locked while `update` runs, so concurrent
    /// updates of the same key are serialized. Returns the stored value.
    fn update_high_score(
        &self,
        user: &UserId,
        category: CategoryId,
        update: &mut dyn FnMut(Option<i64>) -> i64,
    ) -> StoreResult<i64>;
}

pub trait UserDirectory {
    fn user_exists(&self, user: &UserId) -> StoreResult<bool>;
}

/// Everything the game service needs from storage
pub trait Store:
    PuzzleRepository + CategoryRepository + ProgressRepository + HighScoreRepository + UserDirectory
{
}

impl<T> Store for T where
    T: PuzzleRepository
        + CategoryRepository
        + ProgressRepository
        + HighScoreRepository
        + UserDirectory
{
}
