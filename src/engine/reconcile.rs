//! Endless high-score reconciliation

use crate::core::{CategoryId, UserId};
use crate::store::{HighScoreRepository, StoreResult};

/// Keep the larger of the stored high score and `score`
///
/// The read-compare-write happens under the repository's row lock, so two
/// concurrent submissions for the same (user, category) can never leave the
/// smaller one stored. Returns the high score after the update.
///
/// # Errors
///
/// Returns a storage error if the update fails.
pub fn reconcile_high_score<S>(
    store: &S,
    user: &UserId,
    category: CategoryId,
    score: i64,
) -> StoreResult<i64>
where
    S: HighScoreRepository + ?Sized,
{
    store.update_high_score(user, category, &mut |current| {
        current.map_or(score, |current| current.max(score))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::memory::testing::{PLAYER, store_with_levels};

    #[test]
    fn first_submission_is_stored() {
        let (store, category) = store_with_levels(1);
        let user = UserId::new(PLAYER);

        assert_eq!(reconcile_high_score(&store, &user, category, 4).unwrap(), 4);
        assert_eq!(store.high_score(&user, category).unwrap(), Some(4));
    }

    #[test]
    fn lower_score_keeps_existing() {
        let (store, category) = store_with_levels(1);
        let user = UserId::new(PLAYER);

        reconcile_high_score(&store, &user, category, 10).unwrap();
        assert_eq!(reconcile_high_score(&store, &user, category, 7).unwrap(), 10);
        assert_eq!(reconcile_high_score(&store, &user, category, 15).unwrap(), 15);
    }

    #[test]
    fn zero_is_a_valid_first_score() {
        let (store, category) = store_with_levels(1);
        let user = UserId::new(PLAYER);

        assert_eq!(reconcile_high_score(&store, &user, category, 0).unwrap(), 0);
        assert_eq!(store.high_score(&user, category).unwrap(), Some(0));
    }

    #[test]
    fn scores_are_per_user_and_category() {
        let store = MemoryStore::new();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        reconcile_high_score(&store, &alice, CategoryId(1), 9).unwrap();
        reconcile_high_score(&store, &bob, CategoryId(1), 3).unwrap();
        reconcile_high_score(&store, &alice, CategoryId(2), 1).unwrap();

        assert_eq!(store.high_score(&alice, CategoryId(1)).unwrap(), Some(9));
        assert_eq!(store.high_score(&bob, CategoryId(1)).unwrap(), Some(3));
        assert_eq!(store.high_score(&alice, CategoryId(2)).unwrap(), Some(1));
    }

    #[test]
    fn concurrent_submissions_keep_maximum() {
        let store = MemoryStore::new();
        let user = UserId::new(PLAYER);
        let category = CategoryId(1);

        std::thread::scope(|scope| {
            for score in 0..32 {
                let store = &store;
                let user = &user;
                scope.spawn(move || {
                    reconcile_high_score(store, user, category, score).unwrap();
                });
            }
        });

        assert_eq!(store.high_score(&user, category).unwrap(), Some(31));
    }
}
