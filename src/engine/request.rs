use std::collections::BTreeMap;

use serde_json::Value;

use crate::review::Review;
use crate::reviewer::ReviewerInput;
use crate::store::StoreError;

/// Identifiers and field values for one `review` call.
#[derive(Debug, Clone, Default)]
pub struct ReviewRequest {
    pub(crate) reviewer: Option<ReviewerInput>,
    pub(crate) rating: Option<f64>,
    pub(crate) body: Option<String>,
    pub(crate) extra: BTreeMap<String, Value>,
}

impl ReviewRequest {
    /// An empty request with no reviewer. Resolution will reject it unless
    /// a reviewer is attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// A request identified by the given reviewer (entity reference or raw
    /// IP string).
    pub fn by(reviewer: impl Into<ReviewerInput>) -> Self {
        ReviewRequest {
            reviewer: Some(reviewer.into()),
            ..Self::default()
        }
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach an extra attribute. Reserved association fields and keys
    /// outside the configured allow-list are silently dropped by the engine.
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// What `review` did: the persisted record, whether it was newly created,
/// and any cache bookkeeping failure.
///
/// A cache failure does not undo the review itself; the write is
/// best-effort bookkeeping outside the review's consistency boundary, so
/// it is reported here instead of as an `Err`.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub review: Review,
    pub created: bool,
    pub cache_error: Option<StoreError>,
}

/// What `unreview` did: the deleted record and any cache bookkeeping
/// failure, reported the same way as on create.
#[derive(Debug, Clone)]
pub struct UnreviewOutcome {
    pub review: Review,
    pub cache_error: Option<StoreError>,
}
