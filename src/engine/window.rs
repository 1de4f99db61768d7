//! Level windows
//!
//! Builds the page of levels a player browses in levels mode. A page is either
//! centered on a position (by default the player's progression frontier) or
//! continues from a forward/backward cursor.
//!
//! Boundary flags:
//! - forward pages fetch one extra row to learn whether more levels follow
//! - centered and backward pages check both edges directly against storage
//! - an empty page reports no neighbours and sentinel cursors

use crate::core::{CategoryId, PuzzleId, UserId};
use crate::store::{LevelQuery, LevelRow, ProgressRepository, PuzzleRepository, StoreResult};
use serde::{Deserialize, Serialize};

/// Levels per page
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Cursor value meaning "nothing in this direction"
pub const NO_CURSOR: i64 = -1;

/// Where a page is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Centered on an explicit position
    Center(i64),
    /// Levels after a cursor
    After(i64),
    /// Levels before a cursor
    Before(i64),
    /// Centered on the first level the player has not completed
    Frontier,
}

impl Anchor {
    /// Pick the anchor from request parameters
    ///
    /// Precedence: center, then after, then before, then the frontier.
    #[must_use]
    pub const fn from_params(center: Option<i64>, after: Option<i64>, before: Option<i64>) -> Self {
        match (center, after, before) {
            (Some(center), _, _) => Self::Center(center),
            (None, Some(after), _) => Self::After(after),
            (None, None, Some(before)) => Self::Before(before),
            (None, None, None) => Self::Frontier,
        }
    }
}

/// One level on a page, annotated with the player's result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelItem {
    pub puzzle_id: PuzzleId,
    pub position: u32,
    pub par_score: u32,
    pub score: Option<i64>,
    pub attempts_data: Option<String>,
    pub is_completed: bool,
}

/// A page of levels plus the cursors to reach its neighbours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelWindow {
    pub items: Vec<LevelItem>,
    pub next_cursor: i64,
    pub prev_cursor: i64,
    pub has_more: bool,
    pub has_prev: bool,
    pub batch_size: usize,
    pub center_position: Option<i64>,
}

impl LevelWindow {
    /// Positions on this page, in order
    #[must_use]
    pub fn positions(&self) -> Vec<u32> {
        self.items.iter().map(|item| item.position).collect()
    }
}

/// Center used for a player with no explicit center
///
/// The level after the highest one completed, or 1 for a new player.
///
/// # Errors
///
/// Returns a storage error if the progress lookup fails.
pub fn progression_center<S>(store: &S, user: &UserId, category: CategoryId) -> StoreResult<i64>
where
    S: ProgressRepository + ?Sized,
{
    Ok(store
        .highest_completed_position(user, category)?
        .map_or(1, |position| i64::from(position) + 1))
}

/// Build the page of levels for `anchor`
///
/// # Errors
///
/// Returns a storage error if any repository call fails.
pub fn level_window<S>(
    store: &S,
    user: &UserId,
    category: CategoryId,
    anchor: Anchor,
    batch_size: usize,
) -> StoreResult<LevelWindow>
where
    S: PuzzleRepository + ProgressRepository + ?Sized,
{
    // `overfetch_more` is only known for forward pages
    let (center, rows, overfetch_more) = match anchor {
        Anchor::Center(center) => (
            Some(center),
            centered_rows(store, category, center, batch_size)?,
            None,
        ),
        Anchor::Frontier => {
            let center = progression_center(store, user, category)?;
            (
                Some(center),
                centered_rows(store, category, center, batch_size)?,
                None,
            )
        }
        Anchor::After(after) => {
            let mut rows = store.levels(
                category,
                LevelQuery::After {
                    after,
                    limit: batch_size + 1,
                },
            )?;
            let more = rows.len() > batch_size;
            rows.truncate(batch_size);
            (None, rows, Some(more))
        }
        Anchor::Before(before) => {
            let mut rows = store.levels(
                category,
                LevelQuery::Before {
                    before,
                    limit: batch_size,
                },
            )?;
            rows.reverse();
            (None, rows, None)
        }
    };

    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Ok(LevelWindow {
            items: Vec::new(),
            next_cursor: NO_CURSOR,
            prev_cursor: NO_CURSOR,
            has_more: false,
            has_prev: false,
            batch_size,
            center_position: center,
        });
    };
    let first = i64::from(first.position);
    let last = i64::from(last.position);

    let has_prev = store.has_level_before(category, first)?;
    let has_more = match overfetch_more {
        Some(more) => more,
        None => store.has_level_after(category, last)?,
    };

    let prev_cursor = if has_prev { first - 1 } else { NO_CURSOR };
    let next_cursor = match anchor {
        // a backward page can always be continued forward from its last row
        Anchor::Before(_) => last,
        _ if has_more => last,
        _ => NO_CURSOR,
    };

    Ok(LevelWindow {
        items: annotate(store, user, &rows)?,
        next_cursor,
        prev_cursor,
        has_more,
        has_prev,
        batch_size,
        center_position: center,
    })
}

fn centered_rows<S>(
    store: &S,
    category: CategoryId,
    center: i64,
    batch_size: usize,
) -> StoreResult<Vec<LevelRow>>
where
    S: PuzzleRepository + ?Sized,
{
    let half = (batch_size / 2) as i64;
    let start = center.saturating_sub(half).max(1);
    let end = center.saturating_add(half);
    if end < start {
        return Ok(Vec::new());
    }

    let mut rows = store.levels(category, LevelQuery::Range { start, end })?;
    rows.truncate(batch_size);
    Ok(rows)
}

fn annotate<S>(store: &S, user: &UserId, rows: &[LevelRow]) -> StoreResult<Vec<LevelItem>>
where
    S: ProgressRepository + ?Sized,
{
    let ids: Vec<PuzzleId> = rows.iter().map(|row| row.puzzle_id).collect();
    let mut progress = store.level_progress(user, &ids)?;

    Ok(rows
        .iter()
        .map(|row| {
            let entry = progress.remove(&row.puzzle_id);
            LevelItem {
                puzzle_id: row.puzzle_id,
                position: row.position,
                par_score: row.par_score,
                is_completed: entry.is_some(),
                score: entry.as_ref().map(|entry| entry.score),
                attempts_data: entry.and_then(|entry| entry.attempts_data),
            }
        })
        .collect())
}
