//! The review record - one reviewer's feedback on one reviewable.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reviewer::ReviewerIdentity;

/// Field names the upsert never accepts from callers. Linkage between a
/// review and its reviewable/reviewer is owned by the engine.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "reviewable_id",
    "reviewable_type",
    "reviewer_id",
    "reviewer_type",
    "ip",
    "created_at",
];

/// Field names with dedicated typed slots on [`Review`].
pub const CONTENT_FIELDS: &[&str] = &["rating", "body"];

/// A `{type, id}` pair referencing a domain entity (a reviewable or an
/// account-like reviewer). Resolution to a concrete record is the host
/// application's job; only the pair matters here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityReference {
    kind: String,
    id: String,
}

impl EntityReference {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        EntityReference {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// The entity type name, e.g. "Post" or "User".
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stable key for lookups and per-reviewable locking.
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }
}

/// One reviewer's feedback on one reviewable.
///
/// At most one review exists per `(reviewable, reviewer)` pair; the upsert
/// in [`crate::ReviewEngine::review`] enforces this rather than the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Store-assigned identifier, empty until first persisted.
    pub id: String,
    pub reviewable: EntityReference,
    pub reviewer: ReviewerIdentity,
    /// Optional rating; must belong to the reviewable type's scale.
    pub rating: Option<f64>,
    /// Optional free-text body.
    pub body: Option<String>,
    /// Caller-supplied extra attributes, filtered against the configured
    /// allow-list before they get here.
    #[serde(default)]
    pub extra: BTreeMap<String, Value>,
    pub created_at: SystemTime,
}

impl Review {
    /// Build an unsaved review for the given reviewable and identity.
    pub fn build(reviewable: EntityReference, reviewer: ReviewerIdentity) -> Self {
        Review {
            id: String::new(),
            reviewable,
            reviewer,
            rating: None,
            body: None,
            extra: BTreeMap::new(),
            created_at: SystemTime::now(),
        }
    }

    /// When this reviewer first reviewed the reviewable.
    pub fn reviewed_at(&self) -> SystemTime {
        self.created_at
    }

    /// Whether the review carries both a rating and a non-empty body.
    ///
    /// Convenience predicate for hosts that render partial reviews
    /// differently; the upsert itself only requires one of the two.
    pub fn complete(&self) -> bool {
        self.rating.is_some() && self.body.as_deref().map_or(false, |b| !b.is_empty())
    }
}

/// Keep only extra attributes that are neither reserved nor typed content
/// fields, intersected with the allow-list resolved at configuration time.
pub(crate) fn filter_extra_fields(
    extra: BTreeMap<String, Value>,
    allowed: &[String],
) -> BTreeMap<String, Value> {
    extra
        .into_iter()
        .filter(|(key, _)| {
            !RESERVED_FIELDS.contains(&key.as_str())
                && !CONTENT_FIELDS.contains(&key.as_str())
                && allowed.iter().any(|a| a == key)
        })
        .collect()
}
