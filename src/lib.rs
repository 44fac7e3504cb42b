mod engine;
mod lock;
mod review;
mod reviewer;
mod scale;
mod store;

pub use engine::{
    CacheMaintainer, ReviewEngine, ReviewError, ReviewOutcome, ReviewRequest, ReviewableConfig,
    ReviewableConfigBuilder, UnreviewOutcome,
};
pub use lock::{acquire, InMemoryLock, InMemoryLockManager, Lock, LockError, LockGuard, LockManager};
pub use review::{EntityReference, Review, CONTENT_FIELDS, RESERVED_FIELDS};
pub use reviewer::{resolve_reviewer, ReviewerError, ReviewerIdentity, ReviewerInput};
pub use scale::{ConfigError, ReviewScale, ScaleSpec};
pub use store::{AggregateCache, InMemoryReviewStore, ReviewStore, StoreError};
