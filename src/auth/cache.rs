//! Time-bounded cache for verification key material

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

struct Cached<T> {
    value: Arc<T>,
    fetched_at: Instant,
}

/// Holds one fetched value until its TTL runs out
///
/// Readers share the cached value through an `Arc`; a stale or empty cache
/// is refilled by the fetch closure passed to [`KeyCache::get_or_refresh`].
/// A failed fetch leaves the previous entry untouched.
pub struct KeyCache<T> {
    ttl: Duration,
    slot: RwLock<Option<Cached<T>>>,
}

impl<T> KeyCache<T> {
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    #[inline]
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether a cached value exists and is younger than the TTL
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.fresh_value().is_some()
    }

    /// The cached value, fetching it first if missing or expired
    ///
    /// # Errors
    ///
    /// Returns the fetch error when a refresh was needed and failed.
    pub fn get_or_refresh<E>(&self, fetch: impl FnOnce() -> Result<T, E>) -> Result<Arc<T>, E> {
        if let Some(value) = self.fresh_value() {
            return Ok(value);
        }
        self.refresh(fetch)
    }

    /// Fetch unconditionally and replace the cached value
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the old entry is kept in that case.
    pub fn refresh<E>(&self, fetch: impl FnOnce() -> Result<T, E>) -> Result<Arc<T>, E> {
        let value = Arc::new(fetch()?);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Cached {
            value: Arc::clone(&value),
            fetched_at: Instant::now(),
        });
        tracing::debug!(ttl_secs = self.ttl.as_secs(), "key material refreshed");
        Ok(value)
    }

    /// Drop the cached value so the next read fetches again
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn fresh_value(&self) -> Option<Arc<T>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| Arc::clone(&cached.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fetches_once_while_fresh() {
        let cache = KeyCache::new(Duration::from_secs(3600));
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Ok::<_, String>(vec![1, 2, 3])
        };

        assert!(!cache.is_fresh());
        assert_eq!(*cache.get_or_refresh(fetch).unwrap(), vec![1, 2, 3]);
        assert_eq!(*cache.get_or_refresh(fetch).unwrap(), vec![1, 2, 3]);
        assert_eq!(fetches.get(), 1);
        assert!(cache.is_fresh());
    }

    #[test]
    fn zero_ttl_always_refetches() {
        let cache = KeyCache::new(Duration::ZERO);
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Ok::<_, String>(fetches.get())
        };

        assert_eq!(*cache.get_or_refresh(fetch).unwrap(), 1);
        assert_eq!(*cache.get_or_refresh(fetch).unwrap(), 2);
        assert!(!cache.is_fresh());
    }

    #[test]
    fn invalidate_forces_refetch() {
        let cache = KeyCache::new(Duration::from_secs(3600));
        cache.get_or_refresh(|| Ok::<_, String>("old")).unwrap();
        cache.invalidate();

        assert!(!cache.is_fresh());
        assert_eq!(*cache.get_or_refresh(|| Ok::<_, String>("new")).unwrap(), "new");
    }

    #[test]
    fn failed_refresh_keeps_previous_value() {
        let cache = KeyCache::new(Duration::from_secs(3600));
        cache.get_or_refresh(|| Ok::<_, String>(7)).unwrap();

        let err = cache.refresh(|| Err::<i32, _>("offline".to_string()));
        assert_eq!(err.unwrap_err(), "offline");
        assert_eq!(*cache.get_or_refresh(|| Ok::<_, String>(8)).unwrap(), 7);
    }
}
