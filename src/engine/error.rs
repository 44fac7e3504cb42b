use std::fmt;

use crate::lock::LockError;
use crate::reviewer::ReviewerError;
use crate::store::StoreError;

/// Error type for engine operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewError {
    /// The reviewer identity could not be resolved or is not allowed.
    Reviewer(ReviewerError),
    /// The submitted rating is not a member of the configured scale.
    RatingOffScale { rating: f64 },
    /// Neither a rating nor a body would be present on the review.
    MissingContent,
    /// No review by this identity exists to un-review, or it vanished
    /// between lookup and delete.
    NotReviewed { reviewable: String, reviewer: String },
    /// The persistence collaborator failed.
    Store(StoreError),
    /// Per-key serialization failed.
    Lock(LockError),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::Reviewer(err) => write!(f, "{}", err),
            ReviewError::RatingOffScale { rating } => {
                write!(f, "rating {} must be a valid value in the specified scale", rating)
            }
            ReviewError::MissingContent => {
                write!(f, "a review requires at least one of rating or body")
            }
            ReviewError::NotReviewed {
                reviewable,
                reviewer,
            } => write!(f, "could not un-review {} by {}", reviewable, reviewer),
            ReviewError::Store(err) => write!(f, "{}", err),
            ReviewError::Lock(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ReviewError {}

impl From<ReviewerError> for ReviewError {
    fn from(err: ReviewerError) -> Self {
        ReviewError::Reviewer(err)
    }
}

impl From<StoreError> for ReviewError {
    fn from(err: StoreError) -> Self {
        ReviewError::Store(err)
    }
}

impl From<LockError> for ReviewError {
    fn from(err: LockError) -> Self {
        ReviewError::Lock(err)
    }
}
