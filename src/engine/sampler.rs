//! Endless mode sampling
//!
//! Draws a random batch of puzzles from a category, skipping positions the
//! client has already seen.

use super::EngineError;
use crate::core::{CategoryId, PuzzleCard};
use crate::store::PuzzleRepository;
use rand::Rng;
use rand::seq::IndexedRandom;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Puzzles per endless batch
pub const DEFAULT_ENDLESS_LIMIT: usize = 5;

/// A random batch for endless mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndlessBatch {
    pub puzzles: Vec<PuzzleCard>,
    pub count: usize,
    /// Eligible puzzles before the batch was drawn
    pub total_available: usize,
    /// Exclusions as received
    pub filtered_positions: Vec<i64>,
}

/// Draw up to `limit` distinct puzzles whose positions are not in `excluded`
///
/// Every eligible subset of the batch size is equally likely. Exclusions that
/// match no puzzle are ignored.
///
/// # Errors
///
/// Returns [`EngineError::NoPuzzlesAvailable`] when every puzzle is excluded
/// (or the category is empty), or a storage error.
pub fn sample_puzzles<S, R>(
    store: &S,
    category: CategoryId,
    excluded: &[i64],
    limit: usize,
    rng: &mut R,
) -> Result<EndlessBatch, EngineError>
where
    S: PuzzleRepository + ?Sized,
    R: Rng + ?Sized,
{
    let skip: FxHashSet<i64> = excluded.iter().copied().collect();
    let eligible: Vec<u32> = store
        .positions(category)?
        .into_iter()
        .filter(|position| !skip.contains(&i64::from(*position)))
        .collect();

    if eligible.is_empty() {
        return Err(EngineError::NoPuzzlesAvailable);
    }

    let mut puzzles = Vec::with_capacity(limit.min(eligible.len()));
    for &position in eligible.choose_multiple(rng, limit) {
        if let Some(puzzle) = store.puzzle_at(category, position)? {
            puzzles.push(PuzzleCard::from(&puzzle));
        }
    }

    Ok(EndlessBatch {
        count: puzzles.len(),
        puzzles,
        total_available: eligible.len(),
        filtered_positions: excluded.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::testing::store_with_levels;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn positions(batch: &EndlessBatch) -> Vec<u32> {
        let mut positions: Vec<u32> = batch.puzzles.iter().map(|card| card.position).collect();
        positions.sort_unstable();
        positions
    }

    #[test]
    fn draws_distinct_puzzles_up_to_limit() {
        let (store, category) = store_with_levels(30);
        let mut rng = StdRng::seed_from_u64(7);
        let batch = sample_puzzles(&store, category, &[], 5, &mut rng).unwrap();

        assert_eq!(batch.count, 5);
        assert_eq!(batch.total_available, 30);
        let mut unique = positions(&batch);
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn small_pool_returns_everything() {
        let (store, category) = store_with_levels(3);
        let mut rng = StdRng::seed_from_u64(1);
        let batch = sample_puzzles(&store, category, &[], 5, &mut rng).unwrap();

        assert_eq!(batch.count, 3);
        assert_eq!(positions(&batch), vec![1, 2, 3]);
    }

    #[test]
    fn exclusions_are_skipped() {
        let (store, category) = store_with_levels(10);
        let excluded = [1, 2, 3, 4, 5, 6, 7];
        let mut rng = StdRng::seed_from_u64(99);
        let batch = sample_puzzles(&store, category, &excluded, 5, &mut rng).unwrap();

        assert_eq!(positions(&batch), vec![8, 9, 10]);
        assert_eq!(batch.total_available, 3);
        assert_eq!(batch.filtered_positions, excluded.to_vec());
    }

    #[test]
    fn unknown_exclusions_are_ignored() {
        let (store, category) = store_with_levels(4);
        let mut rng = StdRng::seed_from_u64(3);
        let batch = sample_puzzles(&store, category, &[-2, 0, 99], 5, &mut rng).unwrap();

        assert_eq!(batch.total_available, 4);
        assert_eq!(batch.count, 4);
    }

    #[test]
    fn all_excluded_is_an_error() {
        let (store, category) = store_with_levels(3);
        let mut rng = StdRng::seed_from_u64(5);
        let result = sample_puzzles(&store, category, &[1, 2, 3], 5, &mut rng);

        assert_eq!(result, Err(EngineError::NoPuzzlesAvailable));
    }

    #[test]
    fn cards_carry_acronym_not_solution() {
        let (store, category) = store_with_levels(1);
        let mut rng = StdRng::seed_from_u64(11);
        let batch = sample_puzzles(&store, category, &[], 5, &mut rng).unwrap();

        assert_eq!(batch.puzzles[0].acronym, "L1HS");
    }

    #[test]
    fn every_eligible_puzzle_gets_drawn() {
        let (store, category) = store_with_levels(8);
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen = FxHashSet::default();
        for _ in 0..200 {
            let batch = sample_puzzles(&store, category, &[4], 2, &mut rng).unwrap();
            seen.extend(positions(&batch));
        }

        let mut seen: Vec<u32> = seen.into_iter().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 5, 6, 7, 8]);
    }
}
