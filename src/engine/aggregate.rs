//! Aggregate reads: counts and averages, cached or live.

use super::engine::ReviewEngine;
use super::error::ReviewError;
use crate::lock::LockManager;
use crate::review::{EntityReference, Review};
use crate::reviewer::{ReviewerIdentity, ReviewerInput};
use crate::store::ReviewStore;

impl<S: ReviewStore, M: LockManager> ReviewEngine<S, M> {
    /// Total number of reviews on a reviewable.
    ///
    /// Served from the cached counter when the reviewable is
    /// caching-capable and `recalculate` is false; otherwise a live count.
    pub fn total_reviews(
        &self,
        reviewable: &EntityReference,
        recalculate: bool,
    ) -> Result<u64, ReviewError> {
        if !recalculate {
            if let Some(cache) = self.store().cache_fields(reviewable)? {
                return Ok(cache.ratings_count);
            }
        }
        Ok(self.store().count_for(reviewable)?)
    }

    /// Average rating on a reviewable, rounded to the configured precision.
    ///
    /// Cached path divides the running total by the running count; live
    /// path averages non-null ratings. Both round through the same helper,
    /// and a reviewable with no ratings averages to 0.
    ///
    /// The cached count moves on every create, rated or not, so the two
    /// paths agree only while every review carries a rating: a body-only
    /// review drags the cached average down but leaves the live one alone.
    /// [`reconcile`](ReviewEngine::reconcile) does not close that gap; it
    /// restores the same count-all counters from a live scan.
    pub fn average_rating(
        &self,
        reviewable: &EntityReference,
        recalculate: bool,
    ) -> Result<f64, ReviewError> {
        let scale = self.config().scale();
        if !recalculate {
            if let Some(cache) = self.store().cache_fields(reviewable)? {
                if cache.ratings_count == 0 {
                    return Ok(0.0);
                }
                return Ok(
                    scale.round_average(cache.ratings_total / cache.ratings_count as f64)
                );
            }
        }
        let average = self.store().average_rating_for(reviewable)?.unwrap_or(0.0);
        Ok(scale.round_average(average))
    }

    /// Average rating restricted to one reviewer's reviews. By the upsert
    /// invariant at most one review matches, so this reads as "this
    /// reviewer's rating, or 0 when they have none". Always live.
    pub fn average_rating_by(
        &self,
        reviewable: &EntityReference,
        reviewer: impl Into<ReviewerInput>,
    ) -> Result<f64, ReviewError> {
        let input = reviewer.into();
        let identity = self.resolve(Some(&input))?;
        let rating = self
            .store()
            .find_by_identity(reviewable, &identity)?
            .and_then(|r| r.rating)
            .unwrap_or(0.0);
        Ok(self.config().scale().round_average(rating))
    }

    /// Whether anyone has reviewed this reviewable.
    pub fn reviewed(&self, reviewable: &EntityReference) -> Result<bool, ReviewError> {
        Ok(self.total_reviews(reviewable, false)? > 0)
    }

    /// Whether this reviewer has reviewed the reviewable.
    pub fn reviewed_by(
        &self,
        reviewable: &EntityReference,
        reviewer: impl Into<ReviewerInput>,
    ) -> Result<bool, ReviewError> {
        Ok(self.review_by(reviewable, reviewer)?.is_some())
    }

    /// This reviewer's review of the reviewable, if any.
    pub fn review_by(
        &self,
        reviewable: &EntityReference,
        reviewer: impl Into<ReviewerInput>,
    ) -> Result<Option<Review>, ReviewError> {
        let input = reviewer.into();
        let identity = self.resolve(Some(&input))?;
        Ok(self.store().find_by_identity(reviewable, &identity)?)
    }

    /// All reviews on a reviewable.
    pub fn reviews(&self, reviewable: &EntityReference) -> Result<Vec<Review>, ReviewError> {
        Ok(self.store().find_for_reviewable(reviewable)?)
    }

    /// The identities that reviewed a reviewable. Unique by the upsert
    /// invariant.
    pub fn reviewers(
        &self,
        reviewable: &EntityReference,
    ) -> Result<Vec<ReviewerIdentity>, ReviewError> {
        Ok(self
            .store()
            .find_for_reviewable(reviewable)?
            .into_iter()
            .map(|review| review.reviewer)
            .collect())
    }

    /// Everything a reviewer has reviewed: fetch their reviews, then map to
    /// the referenced reviewables. An explicit two-step query in place of a
    /// has-many-through association.
    pub fn reviewables_of(
        &self,
        reviewer: impl Into<ReviewerInput>,
    ) -> Result<Vec<EntityReference>, ReviewError> {
        let input = reviewer.into();
        let identity = self.resolve(Some(&input))?;
        let reviews = self.store().find_by_reviewer(&identity)?;

        let mut reviewables: Vec<EntityReference> = Vec::with_capacity(reviews.len());
        for review in reviews {
            if !reviewables.contains(&review.reviewable) {
                reviewables.push(review.reviewable);
            }
        }
        Ok(reviewables)
    }

    /// Whether cached counters exist for this reviewable.
    pub fn caching_capable(&self, reviewable: &EntityReference) -> Result<bool, ReviewError> {
        Ok(self.store().cache_fields(reviewable)?.is_some())
    }
}
