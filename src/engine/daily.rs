//! Daily puzzle selection
//!
//! Every player sees the same puzzle of a category on a given calendar day.
//! The day number since a fixed epoch indexes into the category's puzzles
//! ordered by position, so adding puzzles reshuffles future days but never
//! depends on who asks or when during the day.

use super::EngineError;
use crate::core::{CategoryId, PuzzleCard};
use crate::store::PuzzleRepository;
use chrono::NaiveDate;

/// Epoch the daily seed counts from
#[must_use]
pub fn default_epoch() -> NaiveDate {
    // NaiveDate's default is 1970-01-01
    NaiveDate::default()
}

/// Index of the daily puzzle among `count` puzzles, or `None` when there are none
#[must_use]
pub fn daily_index(today: NaiveDate, epoch: NaiveDate, count: usize) -> Option<usize> {
    let count = i64::try_from(count).ok().filter(|count| *count > 0)?;
    let seed = today.signed_duration_since(epoch).num_days();
    usize::try_from(seed.rem_euclid(count)).ok()
}

/// The puzzle of the day for `category`
///
/// # Errors
///
/// Returns [`EngineError::NoPuzzlesAvailable`] if the category has no puzzles,
/// or a storage error.
pub fn daily_puzzle<S>(
    store: &S,
    category: CategoryId,
    today: NaiveDate,
    epoch: NaiveDate,
) -> Result<PuzzleCard, EngineError>
where
    S: PuzzleRepository + ?Sized,
{
    let positions = store.positions(category)?;
    let index =
        daily_index(today, epoch, positions.len()).ok_or(EngineError::NoPuzzlesAvailable)?;
    let puzzle = store
        .puzzle_at(category, positions[index])?
        .ok_or(EngineError::NoPuzzlesAvailable)?;
    Ok(PuzzleCard::from(&puzzle))
}
