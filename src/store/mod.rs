//! Review storage - the persistence collaborator boundary.
//!
//! The engine is storage-agnostic: it talks to a [`ReviewStore`] that can
//! find, insert, update, and delete review records and answer aggregate
//! queries. Each write is atomic at the single-record level; nothing here
//! assumes cross-record transactions. Cross-record consistency (one review
//! per identity, cache counters) is the engine's job.
//!
//! ## Example
//!
//! ```
//! use reviewable_rust::{EntityReference, InMemoryReviewStore, Review, ReviewStore, ReviewerIdentity};
//!
//! let store = InMemoryReviewStore::new();
//! let post = EntityReference::new("Post", "1");
//! let reviewer = ReviewerIdentity::Ip("127.0.0.1".to_string());
//!
//! let mut review = Review::build(post.clone(), reviewer.clone());
//! review.rating = Some(4.0);
//! let saved = store.insert(review).unwrap();
//!
//! assert!(store.find_by_identity(&post, &reviewer).unwrap().is_some());
//! assert_eq!(store.count_for(&post).unwrap(), 1);
//! assert!(store.delete(&saved.id).unwrap());
//! ```

mod error;
mod in_memory;

use serde::{Deserialize, Serialize};

use crate::review::{EntityReference, Review};
use crate::reviewer::ReviewerIdentity;

pub use error::StoreError;
pub use in_memory::InMemoryReviewStore;

/// Cached aggregate counters for one reviewable instance.
///
/// Present only for caching-capable reviewables. When not stale,
/// `ratings_count` is the number of reviews on the reviewable and
/// `ratings_total` the exact sum of their non-null ratings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateCache {
    pub ratings_count: u64,
    pub ratings_total: f64,
}

/// Abstract storage for review records and per-reviewable cache counters.
///
/// [`find_where`](ReviewStore::find_where) is the one required read; the
/// other lookups and live aggregates default to predicate scans over it.
/// A backend with a real query engine overrides those with native queries.
pub trait ReviewStore: Send + Sync {
    /// Reviews matching an arbitrary predicate.
    fn find_where(&self, predicate: &dyn Fn(&Review) -> bool) -> Result<Vec<Review>, StoreError>;

    /// The review for `(reviewable, reviewer)`, if any. At most one exists.
    fn find_by_identity(
        &self,
        reviewable: &EntityReference,
        reviewer: &ReviewerIdentity,
    ) -> Result<Option<Review>, StoreError> {
        let mut matched =
            self.find_where(&|r| r.reviewable == *reviewable && r.reviewer == *reviewer)?;
        Ok(matched.pop())
    }

    /// All reviews on a reviewable.
    fn find_for_reviewable(
        &self,
        reviewable: &EntityReference,
    ) -> Result<Vec<Review>, StoreError> {
        self.find_where(&|r| r.reviewable == *reviewable)
    }

    /// All reviews written by an identity, across reviewables.
    fn find_by_reviewer(&self, reviewer: &ReviewerIdentity) -> Result<Vec<Review>, StoreError> {
        self.find_where(&|r| r.reviewer == *reviewer)
    }

    /// Persist a new review, assigning its id. Fails if the id is taken.
    fn insert(&self, review: Review) -> Result<Review, StoreError>;

    /// Overwrite an existing review record.
    fn update(&self, review: &Review) -> Result<(), StoreError>;

    /// Delete a review by id. Returns whether it existed.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Delete every review on a reviewable (cascade). Returns the count.
    fn delete_for_reviewable(&self, reviewable: &EntityReference) -> Result<u64, StoreError>;

    /// Live count of reviews on a reviewable.
    fn count_for(&self, reviewable: &EntityReference) -> Result<u64, StoreError> {
        Ok(self.find_for_reviewable(reviewable)?.len() as u64)
    }

    /// Live sum of non-null ratings on a reviewable.
    fn sum_ratings_for(&self, reviewable: &EntityReference) -> Result<f64, StoreError> {
        Ok(self
            .find_for_reviewable(reviewable)?
            .iter()
            .filter_map(|r| r.rating)
            .sum())
    }

    /// Live average of non-null ratings on a reviewable, `None` when no
    /// review carries a rating.
    fn average_rating_for(
        &self,
        reviewable: &EntityReference,
    ) -> Result<Option<f64>, StoreError> {
        let ratings: Vec<f64> = self
            .find_for_reviewable(reviewable)?
            .iter()
            .filter_map(|r| r.rating)
            .collect();
        if ratings.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ratings.iter().sum::<f64>() / ratings.len() as f64))
        }
    }

    /// The cache counters for a reviewable, `None` if it is not
    /// caching-capable (no counters were ever initialized for it).
    fn cache_fields(&self, reviewable: &EntityReference)
        -> Result<Option<AggregateCache>, StoreError>;

    /// Declare a reviewable caching-capable, zeroing its counters. Called
    /// when the reviewable instance is created.
    fn init_cache(&self, reviewable: &EntityReference) -> Result<(), StoreError>;

    /// Bookkeeping write of the cache counters. Bypasses any validation the
    /// reviewable itself would run.
    fn save_cache(
        &self,
        reviewable: &EntityReference,
        cache: &AggregateCache,
    ) -> Result<(), StoreError>;

    /// Drop the cache counters for a reviewable. Returns whether they existed.
    fn delete_cache(&self, reviewable: &EntityReference) -> Result<bool, StoreError>;
}
