use std::sync::Arc;

use super::cache::CacheMaintainer;
use super::config::ReviewableConfig;
use super::error::ReviewError;
use super::request::{ReviewOutcome, ReviewRequest, UnreviewOutcome};
use crate::lock::{acquire, InMemoryLockManager, LockManager};
use crate::review::{filter_extra_fields, EntityReference, Review};
use crate::reviewer::{resolve_reviewer, ReviewerIdentity, ReviewerInput};
use crate::store::ReviewStore;

/// The rating aggregation engine for one reviewable type.
///
/// Owns the type's configuration, a handle to the review store, and the
/// lock manager that serializes per-identity upserts and cache updates.
pub struct ReviewEngine<S: ReviewStore, M: LockManager = InMemoryLockManager> {
    config: ReviewableConfig,
    store: Arc<S>,
    locks: M,
}

impl<S: ReviewStore> ReviewEngine<S> {
    /// Create an engine with the default in-memory lock manager.
    pub fn new(config: ReviewableConfig, store: S) -> Self {
        Self::with_lock_manager(config, Arc::new(store), InMemoryLockManager::new())
    }

    /// Create an engine sharing an existing store handle.
    pub fn with_store(config: ReviewableConfig, store: Arc<S>) -> Self {
        Self::with_lock_manager(config, store, InMemoryLockManager::new())
    }
}

impl<S: ReviewStore, M: LockManager> ReviewEngine<S, M> {
    /// Create an engine with a custom lock manager (e.g. a distributed one).
    pub fn with_lock_manager(config: ReviewableConfig, store: Arc<S>, locks: M) -> Self {
        ReviewEngine {
            config,
            store,
            locks,
        }
    }

    pub fn config(&self) -> &ReviewableConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve a reviewer input under this type's policy.
    pub(super) fn resolve(
        &self,
        input: Option<&ReviewerInput>,
    ) -> Result<ReviewerIdentity, ReviewError> {
        Ok(resolve_reviewer(
            input,
            self.config.accept_ip(),
            self.config.reviewer_types(),
        )?)
    }

    fn upsert_key(reviewable: &EntityReference, reviewer: &ReviewerIdentity) -> String {
        format!("{}/{}", reviewable.key(), reviewer.key())
    }

    /// Record a review for `(reviewable, reviewer)` - create on first call,
    /// update in place on every later call from the same identity.
    ///
    /// Fails on an unresolvable/disallowed reviewer, a rating off the
    /// scale, or a review that would end up with neither rating nor body.
    /// A cache bookkeeping failure after a successful create is reported in
    /// [`ReviewOutcome::cache_error`], not as an `Err`.
    pub fn review(
        &self,
        reviewable: &EntityReference,
        request: ReviewRequest,
    ) -> Result<ReviewOutcome, ReviewError> {
        let reviewer = self.resolve(request.reviewer.as_ref())?;

        // Serialize find-or-create per (reviewable, identity): the store
        // has no uniqueness constraint to lean on.
        let _guard = acquire(&self.locks, &Self::upsert_key(reviewable, &reviewer))?;

        let existing = self.store.find_by_identity(reviewable, &reviewer)?;
        let created = existing.is_none();

        let mut review = existing
            .unwrap_or_else(|| Review::build(reviewable.clone(), reviewer));

        if let Some(rating) = request.rating {
            review.rating = Some(rating);
        }
        if let Some(body) = request.body {
            review.body = Some(body);
        }
        review
            .extra
            .extend(filter_extra_fields(request.extra, self.config.extra_fields()));

        if let Some(rating) = review.rating {
            if !self.config.scale().contains(rating) {
                return Err(ReviewError::RatingOffScale { rating });
            }
        }
        if review.rating.is_none() && review.body.is_none() {
            return Err(ReviewError::MissingContent);
        }

        let review = if created {
            self.store.insert(review)?
        } else {
            self.store.update(&review)?;
            review
        };

        // Cache counters only move on actual creation; updates touch
        // neither the count nor the total.
        let cache_error = if created {
            CacheMaintainer::new(self.store.as_ref(), &self.locks)
                .on_create(reviewable, review.rating)
                .err()
        } else {
            None
        };

        Ok(ReviewOutcome {
            review,
            created,
            cache_error,
        })
    }

    /// Remove this reviewer's review from the reviewable.
    ///
    /// Fails with [`ReviewError::NotReviewed`] when no matching review
    /// exists or it was concurrently deleted. The cache decrement uses the
    /// rating read before the delete.
    pub fn unreview(
        &self,
        reviewable: &EntityReference,
        reviewer: impl Into<ReviewerInput>,
    ) -> Result<UnreviewOutcome, ReviewError> {
        let input = reviewer.into();
        let reviewer = self.resolve(Some(&input))?;

        let _guard = acquire(&self.locks, &Self::upsert_key(reviewable, &reviewer))?;

        let not_reviewed = || ReviewError::NotReviewed {
            reviewable: reviewable.key(),
            reviewer: reviewer.key(),
        };

        let review = self
            .store
            .find_by_identity(reviewable, &reviewer)?
            .ok_or_else(not_reviewed)?;

        if !self.store.delete(&review.id)? {
            return Err(not_reviewed());
        }

        let cache_error = CacheMaintainer::new(self.store.as_ref(), &self.locks)
            .on_destroy(reviewable, review.rating)
            .err();

        Ok(UnreviewOutcome {
            review,
            cache_error,
        })
    }

    /// Destroy a reviewable: cascade-delete its reviews and drop its cache
    /// counters. Returns how many reviews were removed.
    pub fn destroy_reviewable(&self, reviewable: &EntityReference) -> Result<u64, ReviewError> {
        let removed = self.store.delete_for_reviewable(reviewable)?;
        self.store.delete_cache(reviewable)?;
        Ok(removed)
    }

    /// Recompute the cache counters from a live scan. `None` when the
    /// reviewable is not caching-capable.
    pub fn reconcile(
        &self,
        reviewable: &EntityReference,
    ) -> Result<Option<crate::store::AggregateCache>, ReviewError> {
        Ok(CacheMaintainer::new(self.store.as_ref(), &self.locks).reconcile(reviewable)?)
    }
}
