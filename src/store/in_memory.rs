//! InMemoryReviewStore - HashMap-backed review storage for testing and
//! development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::{AggregateCache, EntityReference, Review, ReviewStore, StoreError};

/// In-memory review store backed by JSON-encoded rows.
///
/// Review rows are keyed by id; cache counters by the reviewable's key.
/// Clone-friendly via `Arc`: all clones share the same storage.
#[derive(Clone)]
pub struct InMemoryReviewStore {
    reviews: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    caches: Arc<RwLock<HashMap<String, AggregateCache>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for InMemoryReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryReviewStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        InMemoryReviewStore {
            reviews: Arc::new(RwLock::new(HashMap::new())),
            caches: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn decode(bytes: &[u8]) -> Result<Review, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn encode(review: &Review) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(review).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn scan<F>(&self, predicate: F) -> Result<Vec<Review>, StoreError>
    where
        F: Fn(&Review) -> bool,
    {
        let reviews = self
            .reviews
            .read()
            .map_err(|_| StoreError::Storage("review map poisoned".into()))?;

        let mut matched = Vec::new();
        for bytes in reviews.values() {
            let review = Self::decode(bytes)?;
            if predicate(&review) {
                matched.push(review);
            }
        }
        // Deterministic order for callers that list reviews.
        matched.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matched)
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn find_where(&self, predicate: &dyn Fn(&Review) -> bool) -> Result<Vec<Review>, StoreError> {
        self.scan(predicate)
    }

    fn insert(&self, review: Review) -> Result<Review, StoreError> {
        let mut review = review;
        if review.id.is_empty() {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            review.id = format!("review-{}", n);
        }

        let bytes = Self::encode(&review)?;
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| StoreError::Storage("review map poisoned".into()))?;

        if reviews.contains_key(&review.id) {
            return Err(StoreError::Conflict {
                key: review.id.clone(),
            });
        }
        reviews.insert(review.id.clone(), bytes);
        Ok(review)
    }

    fn update(&self, review: &Review) -> Result<(), StoreError> {
        let bytes = Self::encode(review)?;
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| StoreError::Storage("review map poisoned".into()))?;

        if !reviews.contains_key(&review.id) {
            return Err(StoreError::NotFound {
                key: review.id.clone(),
            });
        }
        reviews.insert(review.id.clone(), bytes);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| StoreError::Storage("review map poisoned".into()))?;
        Ok(reviews.remove(id).is_some())
    }

    fn delete_for_reviewable(&self, reviewable: &EntityReference) -> Result<u64, StoreError> {
        let doomed: Vec<String> = self
            .scan(|r| r.reviewable == *reviewable)?
            .into_iter()
            .map(|r| r.id)
            .collect();

        let mut reviews = self
            .reviews
            .write()
            .map_err(|_| StoreError::Storage("review map poisoned".into()))?;
        let mut removed = 0;
        for id in doomed {
            if reviews.remove(&id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn cache_fields(
        &self,
        reviewable: &EntityReference,
    ) -> Result<Option<AggregateCache>, StoreError> {
        let caches = self
            .caches
            .read()
            .map_err(|_| StoreError::Storage("cache map poisoned".into()))?;
        Ok(caches.get(&reviewable.key()).copied())
    }

    fn init_cache(&self, reviewable: &EntityReference) -> Result<(), StoreError> {
        let mut caches = self
            .caches
            .write()
            .map_err(|_| StoreError::Storage("cache map poisoned".into()))?;
        caches.insert(reviewable.key(), AggregateCache::default());
        Ok(())
    }

    fn save_cache(
        &self,
        reviewable: &EntityReference,
        cache: &AggregateCache,
    ) -> Result<(), StoreError> {
        let mut caches = self
            .caches
            .write()
            .map_err(|_| StoreError::Storage("cache map poisoned".into()))?;
        let key = reviewable.key();
        if !caches.contains_key(&key) {
            return Err(StoreError::NotFound { key });
        }
        caches.insert(key, *cache);
        Ok(())
    }

    fn delete_cache(&self, reviewable: &EntityReference) -> Result<bool, StoreError> {
        let mut caches = self
            .caches
            .write()
            .map_err(|_| StoreError::Storage("cache map poisoned".into()))?;
        Ok(caches.remove(&reviewable.key()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviewer::ReviewerIdentity;

    fn post(id: &str) -> EntityReference {
        EntityReference::new("Post", id)
    }

    fn ip(addr: &str) -> ReviewerIdentity {
        ReviewerIdentity::Ip(addr.to_string())
    }

    fn rated(reviewable: &EntityReference, reviewer: ReviewerIdentity, rating: f64) -> Review {
        let mut review = Review::build(reviewable.clone(), reviewer);
        review.rating = Some(rating);
        review
    }

    #[test]
    fn insert_assigns_monotonic_ids() {
        let store = InMemoryReviewStore::new();
        let a = store.insert(rated(&post("1"), ip("10.0.0.1"), 3.0)).unwrap();
        let b = store.insert(rated(&post("1"), ip("10.0.0.2"), 4.0)).unwrap();
        assert_eq!(a.id, "review-1");
        assert_eq!(b.id, "review-2");
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let store = InMemoryReviewStore::new();
        let saved = store.insert(rated(&post("1"), ip("10.0.0.1"), 3.0)).unwrap();
        let err = store.insert(saved.clone()).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn find_by_identity_matches_one() {
        let store = InMemoryReviewStore::new();
        store.insert(rated(&post("1"), ip("10.0.0.1"), 3.0)).unwrap();
        store.insert(rated(&post("1"), ip("10.0.0.2"), 4.0)).unwrap();
        store.insert(rated(&post("2"), ip("10.0.0.1"), 5.0)).unwrap();

        let found = store.find_by_identity(&post("1"), &ip("10.0.0.1")).unwrap();
        assert_eq!(found.unwrap().rating, Some(3.0));
        assert!(store
            .find_by_identity(&post("3"), &ip("10.0.0.1"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn find_where_backs_the_derived_lookups() {
        let store = InMemoryReviewStore::new();
        store.insert(rated(&post("1"), ip("10.0.0.1"), 2.0)).unwrap();
        store.insert(rated(&post("1"), ip("10.0.0.2"), 5.0)).unwrap();
        store.insert(rated(&post("2"), ip("10.0.0.2"), 5.0)).unwrap();

        let high = store.find_where(&|r| r.rating == Some(5.0)).unwrap();
        assert_eq!(high.len(), 2);

        assert_eq!(store.find_for_reviewable(&post("1")).unwrap().len(), 2);
        assert_eq!(store.find_by_reviewer(&ip("10.0.0.2")).unwrap().len(), 2);
    }

    #[test]
    fn update_rewrites_record_in_place() {
        let store = InMemoryReviewStore::new();
        let mut saved = store.insert(rated(&post("1"), ip("10.0.0.1"), 3.0)).unwrap();
        saved.rating = Some(5.0);
        store.update(&saved).unwrap();

        let found = store.find_by_identity(&post("1"), &ip("10.0.0.1")).unwrap();
        assert_eq!(found.unwrap().rating, Some(5.0));
        assert_eq!(store.count_for(&post("1")).unwrap(), 1);
    }

    #[test]
    fn update_missing_record_fails() {
        let store = InMemoryReviewStore::new();
        let mut review = rated(&post("1"), ip("10.0.0.1"), 3.0);
        review.id = "review-404".to_string();
        let err = store.update(&review).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn aggregates_skip_unrated_reviews() {
        let store = InMemoryReviewStore::new();
        store.insert(rated(&post("1"), ip("10.0.0.1"), 2.0)).unwrap();
        store.insert(rated(&post("1"), ip("10.0.0.2"), 4.0)).unwrap();
        let mut body_only = Review::build(post("1"), ip("10.0.0.3"));
        body_only.body = Some("no stars".to_string());
        store.insert(body_only).unwrap();

        assert_eq!(store.count_for(&post("1")).unwrap(), 3);
        assert_eq!(store.sum_ratings_for(&post("1")).unwrap(), 6.0);
        assert_eq!(store.average_rating_for(&post("1")).unwrap(), Some(3.0));
    }

    #[test]
    fn average_of_unrated_reviewable_is_none() {
        let store = InMemoryReviewStore::new();
        assert_eq!(store.average_rating_for(&post("9")).unwrap(), None);
    }

    #[test]
    fn cascade_delete_removes_all_reviews() {
        let store = InMemoryReviewStore::new();
        store.insert(rated(&post("1"), ip("10.0.0.1"), 2.0)).unwrap();
        store.insert(rated(&post("1"), ip("10.0.0.2"), 4.0)).unwrap();
        store.insert(rated(&post("2"), ip("10.0.0.1"), 5.0)).unwrap();

        assert_eq!(store.delete_for_reviewable(&post("1")).unwrap(), 2);
        assert_eq!(store.count_for(&post("1")).unwrap(), 0);
        assert_eq!(store.count_for(&post("2")).unwrap(), 1);
    }

    #[test]
    fn cache_fields_absent_until_initialized() {
        let store = InMemoryReviewStore::new();
        assert!(store.cache_fields(&post("1")).unwrap().is_none());

        store.init_cache(&post("1")).unwrap();
        let cache = store.cache_fields(&post("1")).unwrap().unwrap();
        assert_eq!(cache.ratings_count, 0);
        assert_eq!(cache.ratings_total, 0.0);
    }

    #[test]
    fn save_cache_requires_initialization() {
        let store = InMemoryReviewStore::new();
        let cache = AggregateCache {
            ratings_count: 1,
            ratings_total: 4.0,
        };
        let err = store.save_cache(&post("1"), &cache).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        store.init_cache(&post("1")).unwrap();
        store.save_cache(&post("1"), &cache).unwrap();
        assert_eq!(store.cache_fields(&post("1")).unwrap(), Some(cache));
    }
}
