use std::fmt;

/// Error type for reviewer identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewerError {
    /// No reviewer entity or IP was supplied at all.
    Missing,
    /// The candidate was neither a valid entity reference nor an IP string.
    WrongType(String),
    /// The candidate was an IP but the reviewable type does not accept IPs.
    IpDisabled,
}

impl fmt::Display for ReviewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewerError::Missing => {
                write!(f, "argument can't be nil: no reviewer entity or IP provided")
            }
            ReviewerError::WrongType(candidate) => {
                write!(f, "reviewer is of wrong type: {}", candidate)
            }
            ReviewerError::IpDisabled => write!(f, "reviewing based on IP is disabled"),
        }
    }
}

impl std::error::Error for ReviewerError {}
