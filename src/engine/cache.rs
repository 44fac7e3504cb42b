use crate::lock::{acquire, LockError, LockManager};
use crate::review::EntityReference;
use crate::store::{AggregateCache, ReviewStore, StoreError};

/// Sole writer of a reviewable's cached counters.
///
/// Invoked on review creation and destruction for caching-capable
/// reviewables. Increments and decrements for the same reviewable are
/// serialized through the per-reviewable lock so concurrent review
/// lifecycle events cannot lose updates. `ratings_total` carries the exact
/// floating-point rating, so the cached average cannot drift from the
/// recomputed one on fractional scales.
pub struct CacheMaintainer<'a, S: ReviewStore, M: LockManager> {
    store: &'a S,
    locks: &'a M,
}

impl<'a, S: ReviewStore, M: LockManager> CacheMaintainer<'a, S, M> {
    pub fn new(store: &'a S, locks: &'a M) -> Self {
        CacheMaintainer { store, locks }
    }

    fn lock_key(reviewable: &EntityReference) -> String {
        format!("cache/{}", reviewable.key())
    }

    /// Create hook: count the new review and add its rating contribution.
    /// No-op for reviewables without cache fields.
    pub fn on_create(
        &self,
        reviewable: &EntityReference,
        rating: Option<f64>,
    ) -> Result<(), StoreError> {
        self.adjust(reviewable, 1, rating.unwrap_or(0.0))
    }

    /// Destroy hook: symmetric decrement, using the rating the review held
    /// at deletion time.
    pub fn on_destroy(
        &self,
        reviewable: &EntityReference,
        rating: Option<f64>,
    ) -> Result<(), StoreError> {
        self.adjust(reviewable, -1, -rating.unwrap_or(0.0))
    }

    fn adjust(
        &self,
        reviewable: &EntityReference,
        count_delta: i64,
        total_delta: f64,
    ) -> Result<(), StoreError> {
        let _guard = acquire(self.locks, &Self::lock_key(reviewable)).map_err(lock_to_store)?;

        let Some(mut cache) = self.store.cache_fields(reviewable)? else {
            return Ok(());
        };
        cache.ratings_count = if count_delta < 0 {
            cache.ratings_count.saturating_sub(count_delta.unsigned_abs())
        } else {
            cache.ratings_count + count_delta as u64
        };
        cache.ratings_total += total_delta;
        self.store.save_cache(reviewable, &cache)
    }

    /// Recompute both counters from a live scan of the reviewable's reviews.
    /// Returns the fresh counters, or `None` for non-caching reviewables.
    pub fn reconcile(
        &self,
        reviewable: &EntityReference,
    ) -> Result<Option<AggregateCache>, StoreError> {
        let _guard = acquire(self.locks, &Self::lock_key(reviewable)).map_err(lock_to_store)?;

        if self.store.cache_fields(reviewable)?.is_none() {
            return Ok(None);
        }
        let cache = AggregateCache {
            ratings_count: self.store.count_for(reviewable)?,
            ratings_total: self.store.sum_ratings_for(reviewable)?,
        };
        self.store.save_cache(reviewable, &cache)?;
        Ok(Some(cache))
    }
}

fn lock_to_store(err: LockError) -> StoreError {
    StoreError::Storage(err.to_string())
}
