//! Reviewer identity resolution.
//!
//! A reviewer is identified either by a reference to a persisted entity
//! (a user, an account, ...) or by a bare IP address. Resolution normalizes
//! whatever the caller supplied into exactly one of the two and enforces
//! whether IP-based reviewing is permitted for the reviewable type.

mod error;

use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::review::EntityReference;

pub use error::ReviewerError;

/// What a caller may pass to designate the reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewerInput {
    /// A reference to a persisted account-like entity.
    Entity(EntityReference),
    /// A raw string, classified as an IP address during resolution.
    Raw(String),
}

impl From<EntityReference> for ReviewerInput {
    fn from(reference: EntityReference) -> Self {
        ReviewerInput::Entity(reference)
    }
}

impl From<&str> for ReviewerInput {
    fn from(raw: &str) -> Self {
        ReviewerInput::Raw(raw.to_string())
    }
}

impl From<String> for ReviewerInput {
    fn from(raw: String) -> Self {
        ReviewerInput::Raw(raw)
    }
}

/// A resolved reviewer identity: exactly one of account or IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewerIdentity {
    Account(EntityReference),
    Ip(String),
}

impl ReviewerIdentity {
    /// Stable key for lookups and per-identity locking.
    pub fn key(&self) -> String {
        match self {
            ReviewerIdentity::Account(reference) => format!("account/{}", reference.key()),
            ReviewerIdentity::Ip(ip) => format!("ip/{}", ip),
        }
    }

    pub fn is_ip(&self) -> bool {
        matches!(self, ReviewerIdentity::Ip(_))
    }
}

/// Resolve a reviewer input into an identity.
///
/// Pure function of the input and the reviewable type's policy: no lookups,
/// no side effects. An empty `reviewer_types` list permits any entity type.
pub fn resolve_reviewer(
    input: Option<&ReviewerInput>,
    accept_ip: bool,
    reviewer_types: &[String],
) -> Result<ReviewerIdentity, ReviewerError> {
    let input = input.ok_or(ReviewerError::Missing)?;

    match input {
        ReviewerInput::Entity(reference) => {
            if reference.kind().is_empty() || reference.id().is_empty() {
                return Err(ReviewerError::WrongType(format!("{:?}", reference)));
            }
            if !reviewer_types.is_empty() && !reviewer_types.iter().any(|t| t == reference.kind())
            {
                return Err(ReviewerError::WrongType(reference.kind().to_string()));
            }
            Ok(ReviewerIdentity::Account(reference.clone()))
        }
        ReviewerInput::Raw(raw) => {
            let candidate = raw.trim();
            if IpAddr::from_str(candidate).is_ok() {
                if !accept_ip {
                    return Err(ReviewerError::IpDisabled);
                }
                Ok(ReviewerIdentity::Ip(candidate.to_string()))
            } else {
                Err(ReviewerError::WrongType(format!("{:?}", raw)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> ReviewerInput {
        ReviewerInput::Entity(EntityReference::new("User", id))
    }

    #[test]
    fn resolves_entity_reference() {
        let identity = resolve_reviewer(Some(&user("42")), false, &[]).unwrap();
        assert_eq!(
            identity,
            ReviewerIdentity::Account(EntityReference::new("User", "42"))
        );
        assert!(!identity.is_ip());
    }

    #[test]
    fn resolves_ip_string_when_accepted() {
        let input = ReviewerInput::from(" 128.0.0.1 ");
        let identity = resolve_reviewer(Some(&input), true, &[]).unwrap();
        assert_eq!(identity, ReviewerIdentity::Ip("128.0.0.1".to_string()));
    }

    #[test]
    fn rejects_ip_when_disabled() {
        let input = ReviewerInput::from("128.0.0.1");
        let err = resolve_reviewer(Some(&input), false, &[]).unwrap_err();
        assert_eq!(err, ReviewerError::IpDisabled);
    }

    #[test]
    fn rejects_missing_reviewer() {
        let err = resolve_reviewer(None, true, &[]).unwrap_err();
        assert_eq!(err, ReviewerError::Missing);
    }

    #[test]
    fn rejects_non_ip_raw_string() {
        let input = ReviewerInput::from("not-an-ip");
        let err = resolve_reviewer(Some(&input), true, &[]).unwrap_err();
        assert!(matches!(err, ReviewerError::WrongType(_)));
    }

    #[test]
    fn rejects_entity_of_unlisted_type() {
        let allowed = vec!["Account".to_string()];
        let err = resolve_reviewer(Some(&user("1")), false, &allowed).unwrap_err();
        assert!(matches!(err, ReviewerError::WrongType(_)));
    }

    #[test]
    fn allows_entity_of_listed_type() {
        let allowed = vec!["Account".to_string(), "User".to_string()];
        assert!(resolve_reviewer(Some(&user("1")), false, &allowed).is_ok());
    }

    #[test]
    fn ipv6_counts_as_ip() {
        let input = ReviewerInput::from("::1");
        let identity = resolve_reviewer(Some(&input), true, &[]).unwrap();
        assert!(identity.is_ip());
    }

    #[test]
    fn identity_keys_are_distinct() {
        let account = ReviewerIdentity::Account(EntityReference::new("User", "1"));
        let ip = ReviewerIdentity::Ip("10.0.0.1".to_string());
        assert_eq!(account.key(), "account/User:1");
        assert_eq!(ip.key(), "ip/10.0.0.1");
    }
}
