use std::fmt;

/// Error type for review store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Storage-level failure (lock poisoned, backend unavailable, ...).
    Storage(String),
    /// Serialization/deserialization failure.
    Serde(String),
    /// A record that was expected to exist did not.
    NotFound { key: String },
    /// An insert collided with an existing record.
    Conflict { key: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Storage(msg) => write!(f, "review storage error: {}", msg),
            StoreError::Serde(msg) => write!(f, "review serialization error: {}", msg),
            StoreError::NotFound { key } => write!(f, "review record not found: {}", key),
            StoreError::Conflict { key } => write!(f, "review record already exists: {}", key),
        }
    }
}

impl std::error::Error for StoreError {}
