//! In-process repository implementation
//!
//! Tables live behind a `RwLock`. High scores sit in a sharded `DashMap`; a
//! score update holds the entry (and its shard lock) for the whole
//! read-modify-write of one (user, category) row.

use super::catalog::{Catalog, HighScoreEntry};
use super::{
    CategoryRepository, CategoryScope, HighScoreRepository, LevelProgress, LevelQuery, LevelRow,
    ProgressRepository, PuzzleRepository, StoreError, StoreResult, UserDirectory,
};
use crate::core::{
    Category, CategoryId, GameMode, NewProgress, ProgressId, ProgressRecord, Puzzle, PuzzleId,
    UserId,
};
use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    users: FxHashSet<UserId>,
    categories: Vec<Category>,
    /// Puzzles per category, keyed by position
    puzzles: FxHashMap<CategoryId, BTreeMap<u32, Puzzle>>,
    progress: Vec<ProgressRecord>,
    next_progress_id: u64,
}

/// Repository implementation backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    high_scores: DashMap<(UserId, CategoryId), i64>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

/// Clamp an `i64` position interval onto the `u32` key space
fn span(start: i64, end: i64) -> Option<RangeInclusive<u32>> {
    let max = i64::from(u32::MAX);
    if start > end || end < 0 || start > max {
        return None;
    }
    let clamp = |value: i64| value.clamp(0, max) as u32;
    Some(clamp(start)..=clamp(end))
}

fn level_row(puzzle: &Puzzle) -> LevelRow {
    LevelRow {
        puzzle_id: puzzle.id,
        position: puzzle.position,
        par_score: puzzle.par_score,
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding everything in `catalog`
    ///
    /// Later puzzles replace earlier ones at the same (category, position).
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let store = Self::new();
        {
            let mut tables = store.write_tables();
            tables.users.extend(catalog.users.iter().cloned());
            tables.categories.extend(catalog.categories.iter().cloned());
            for puzzle in &catalog.puzzles {
                tables
                    .puzzles
                    .entry(puzzle.category)
                    .or_default()
                    .insert(puzzle.position, puzzle.clone());
            }
            tables.next_progress_id = catalog
                .progress
                .iter()
                .map(|record| record.id.0)
                .max()
                .unwrap_or(0);
            tables.progress.extend(catalog.progress.iter().cloned());
        }
        for entry in &catalog.high_scores {
            store
                .high_scores
                .insert((entry.user.clone(), entry.category), entry.high_score);
        }
        store
    }

    /// Copy the mutable tables (progress and high scores) back into `catalog`
    ///
    /// # Errors
    ///
    /// Returns an error if a lock is poisoned.
    pub fn write_into(&self, catalog: &mut Catalog) -> StoreResult<()> {
        catalog.progress.clone_from(&self.read()?.progress);

        let mut high_scores: Vec<HighScoreEntry> = self
            .high_scores
            .iter()
            .map(|row| {
                let (user, category) = row.key();
                HighScoreEntry {
                    user: user.clone(),
                    category: *category,
                    high_score: *row.value(),
                }
            })
            .collect();
        high_scores.sort_by(|a, b| (&a.user, a.category).cmp(&(&b.user, b.category)));
        catalog.high_scores = high_scores;
        Ok(())
    }

    /// Register a user
    pub fn add_user(&self, user: UserId) {
        self.write_tables().users.insert(user);
    }

    pub fn add_category(&self, category: Category) {
        self.write_tables().categories.push(category);
    }

    /// Insert a puzzle, replacing any at the same (category, position)
    pub fn add_puzzle(&self, puzzle: Puzzle) {
        self.write_tables()
            .puzzles
            .entry(puzzle.category)
            .or_default()
            .insert(puzzle.position, puzzle);
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(poisoned)
    }
}

impl PuzzleRepository for MemoryStore {
    fn puzzle_at(&self, category: CategoryId, position: u32) -> StoreResult<Option<Puzzle>> {
        Ok(self
            .read()?
            .puzzles
            .get(&category)
            .and_then(|levels| levels.get(&position))
            .cloned())
    }

    fn puzzle_count(&self, category: CategoryId) -> StoreResult<usize> {
        Ok(self
            .read()?
            .puzzles
            .get(&category)
            .map_or(0, BTreeMap::len))
    }

    fn positions(&self, category: CategoryId) -> StoreResult<Vec<u32>> {
        Ok(self
            .read()?
            .puzzles
            .get(&category)
            .map(|levels| levels.keys().copied().collect())
            .unwrap_or_default())
    }

    fn levels(&self, category: CategoryId, query: LevelQuery) -> StoreResult<Vec<LevelRow>> {
        let tables = self.read()?;
        let Some(levels) = tables.puzzles.get(&category) else {
            return Ok(Vec::new());
        };

        let rows = match query {
            LevelQuery::Range { start, end } => span(start, end)
                .map(|range| levels.range(range).map(|(_, p)| level_row(p)).collect())
                .unwrap_or_default(),
            LevelQuery::After { after, limit } => span(after.saturating_add(1), i64::MAX)
                .map(|range| {
                    levels
                        .range(range)
                        .take(limit)
                        .map(|(_, p)| level_row(p))
                        .collect()
                })
                .unwrap_or_default(),
            LevelQuery::Before { before, limit } => span(i64::MIN, before.saturating_sub(1))
                .map(|range| {
                    levels
                        .range(range)
                        .rev()
                        .take(limit)
                        .map(|(_, p)| level_row(p))
                        .collect()
                })
                .unwrap_or_default(),
        };
        Ok(rows)
    }

    fn has_level_before(&self, category: CategoryId, position: i64) -> StoreResult<bool> {
        let tables = self.read()?;
        Ok(match (tables.puzzles.get(&category), span(i64::MIN, position.saturating_sub(1))) {
            (Some(levels), Some(range)) => levels.range(range).next().is_some(),
            _ => false,
        })
    }

    fn has_level_after(&self, category: CategoryId, position: i64) -> StoreResult<bool> {
        let tables = self.read()?;
        Ok(match (tables.puzzles.get(&category), span(position.saturating_add(1), i64::MAX)) {
            (Some(levels), Some(range)) => levels.range(range).next().is_some(),
            _ => false,
        })
    }
}

impl CategoryRepository for MemoryStore {
    fn category_by_slug(
        &self,
        slug: &str,
        scope: CategoryScope<'_>,
    ) -> StoreResult<Option<Category>> {
        Ok(self
            .read()?
            .categories
            .iter()
            .filter(|category| category.slug.eq_ignore_ascii_case(slug))
            .find(|category| match scope {
                CategoryScope::Any => true,
                CategoryScope::System => category.is_system(),
                CategoryScope::VisibleTo(user) => category.is_visible_to(user),
            })
            .cloned())
    }

    fn active_categories(&self, user: Option<&UserId>) -> StoreResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .read()?
            .categories
            .iter()
            .filter(|category| category.is_active)
            .filter(|category| match user {
                Some(user) => category.is_visible_to(user),
                None => category.is_system(),
            })
            .cloned()
            .collect();
        categories.sort_by(|a, b| (a.order, &a.name).cmp(&(b.order, &b.name)));
        Ok(categories)
    }
}

impl ProgressRepository for MemoryStore {
    fn find_progress(
        &self,
        user: &UserId,
        puzzle: Option<PuzzleId>,
        mode: GameMode,
        day: NaiveDate,
    ) -> StoreResult<Option<ProgressRecord>> {
        Ok(self
            .read()?
            .progress
            .iter()
            .find(|record| {
                &record.user == user
                    && record.puzzle == puzzle
                    && record.mode == mode
                    && (mode.is_permanent() || record.day == day)
            })
            .cloned())
    }

    fn insert_progress(&self, progress: NewProgress) -> StoreResult<ProgressRecord> {
        let mut tables = self.tables.write().map_err(poisoned)?;

        if progress.mode.is_permanent()
            && let Some(existing) = tables.progress.iter().find(|record| {
                record.user == progress.user
                    && record.puzzle == progress.puzzle
                    && record.mode == progress.mode
            })
        {
            return Err(StoreError::Duplicate(existing.id));
        }

        tables.next_progress_id += 1;
        let record = ProgressRecord {
            id: ProgressId(tables.next_progress_id),
            user: progress.user,
            category: progress.category,
            puzzle: progress.puzzle,
            mode: progress.mode,
            score: progress.score,
            attempts_data: progress.attempts_data,
            day: progress.day,
        };
        tables.progress.push(record.clone());
        Ok(record)
    }

    fn highest_completed_position(
        &self,
        user: &UserId,
        category: CategoryId,
    ) -> StoreResult<Option<u32>> {
        let tables = self.read()?;
        let completed: FxHashSet<PuzzleId> = tables
            .progress
            .iter()
            .filter(|record| {
                &record.user == user
                    && record.mode == GameMode::Levels
                    && record.category == category
            })
            .filter_map(|record| record.puzzle)
            .collect();

        Ok(tables.puzzles.get(&category).and_then(|levels| {
            levels
                .values()
                .rev()
                .find(|puzzle| completed.contains(&puzzle.id))
                .map(|puzzle| puzzle.position)
        }))
    }

    fn level_progress(
        &self,
        user: &UserId,
        puzzles: &[PuzzleId],
    ) -> StoreResult<FxHashMap<PuzzleId, LevelProgress>> {
        let wanted: FxHashSet<PuzzleId> = puzzles.iter().copied().collect();
        Ok(self
            .read()?
            .progress
            .iter()
            .filter(|record| &record.user == user && record.mode == GameMode::Levels)
            .filter_map(|record| {
                let puzzle = record.puzzle.filter(|id| wanted.contains(id))?;
                Some((
                    puzzle,
                    LevelProgress {
                        score: record.score,
                        attempts_data: record.attempts_data.clone(),
                    },
                ))
            })
            .collect())
    }

    fn categories_played_on(
        &self,
        user: &UserId,
        mode: GameMode,
        day: NaiveDate,
    ) -> StoreResult<Vec<CategoryId>> {
        let mut categories: Vec<CategoryId> = self
            .read()?
            .progress
            .iter()
            .filter(|record| &record.user == user && record.mode == mode && record.day == day)
            .map(|record| record.category)
            .collect();
        categories.sort_unstable();
        categories.dedup();
        Ok(categories)
    }
}

impl HighScoreRepository for MemoryStore {
    fn high_score(&self, user: &UserId, category: CategoryId) -> StoreResult<Option<i64>> {
        Ok(self
            .high_scores
            .get(&(user.clone(), category))
            .map(|row| *row.value()))
    }

    fn high_scores(&self, user: &UserId) -> StoreResult<FxHashMap<CategoryId, i64>> {
        Ok(self
            .high_scores
            .iter()
            .filter(|row| &row.key().0 == user)
            .map(|row| (row.key().1, *row.value()))
            .collect())
    }

    fn update_high_score(
        &self,
        user: &UserId,
        category: CategoryId,
        update: &mut dyn FnMut(Option<i64>) -> i64,
    ) -> StoreResult<i64> {
        let next = match self.high_scores.entry((user.clone(), category)) {
            Entry::Occupied(mut row) => {
                let next = update(Some(*row.get()));
                row.insert(next);
                next
            }
            Entry::Vacant(row) => {
                let next = update(None);
                row.insert(next);
                next
            }
        };
        Ok(next)
    }
}

impl UserDirectory for MemoryStore {
    fn user_exists(&self, user: &UserId) -> StoreResult<bool> {
        Ok(self.read()?.users.contains(user))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::MemoryStore;
    use crate::core::{Category, CategoryId, Puzzle, PuzzleId, UserId};
    use chrono::NaiveDate;

    pub(crate) const PLAYER: &str = "player";

    pub(crate) fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    pub(crate) fn category(id: u64, slug: &str, creator: Option<&str>) -> Category {
        Category {
            id: CategoryId(id),
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            description: String::new(),
            emoji: String::new(),
            order: id as u32,
            is_active: true,
            creator: creator.map(UserId::new),
        }
    }

    pub(crate) fn add_level(store: &MemoryStore, category: CategoryId, position: u32) {
        store.add_puzzle(Puzzle {
            id: PuzzleId(category.0 * 10_000 + u64::from(position)),
            category,
            position,
            solution: format!("Level {position} hidden sentence"),
            clue: format!("Clue {position}"),
            par_score: 5,
        });
    }

    /// A system category "animals" with levels `1..=count` and one registered player
    pub(crate) fn store_with_levels(count: u32) -> (MemoryStore, CategoryId) {
        let store = MemoryStore::new();
        store.add_user(UserId::new(PLAYER));
        let animals = category(1, "animals", None);
        let id = animals.id;
        store.add_category(animals);
        for position in 1..=count {
            add_level(&store, id, position);
        }
        (store, id)
    }
}
