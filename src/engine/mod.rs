//! The rating aggregation engine.
//!
//! [`ReviewEngine`] ties the pieces together: identity resolution, the
//! one-review-per-identity upsert, scale validation, cache counter
//! maintenance, and aggregate reads.
//!
//! ## Example
//!
//! ```
//! use reviewable_rust::{
//!     EntityReference, InMemoryReviewStore, ReviewEngine, ReviewRequest,
//!     ReviewableConfig, ScaleSpec,
//! };
//!
//! let config = ReviewableConfig::builder()
//!     .scale(ScaleSpec::range(1.0, 5.0).with_step(0.5))
//!     .precision(2)
//!     .accept_ip(true)
//!     .build()
//!     .unwrap();
//! let engine = ReviewEngine::new(config, InMemoryReviewStore::new());
//!
//! let post = EntityReference::new("Post", "1");
//! engine.review(&post, ReviewRequest::by("128.0.0.0").rating(1.0)).unwrap();
//! engine.review(&post, ReviewRequest::by("128.0.0.1").rating(2.5)).unwrap();
//!
//! assert_eq!(engine.total_reviews(&post, false).unwrap(), 2);
//! assert_eq!(engine.average_rating(&post, false).unwrap(), 1.75);
//! ```

mod aggregate;
mod cache;
mod config;
mod engine;
mod error;
mod request;

pub use cache::CacheMaintainer;
pub use config::{ReviewableConfig, ReviewableConfigBuilder};
pub use engine::ReviewEngine;
pub use error::ReviewError;
pub use request::{ReviewOutcome, ReviewRequest, UnreviewOutcome};
