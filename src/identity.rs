//! Identity extraction.
//!
//! The upstream authorizer verifies the bearer credential and attaches the
//! resulting claim set to the request. This module trusts that claim set and
//! pulls exactly one thing out of it: the subject (`sub`), which is unique and
//! immutable per account.
//!
//! The subject is the partition key for the caller's record. It is the only
//! access-control guarantee the store has, so it is never taken from the path,
//! query string or body.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ContentError;
use crate::request::Request;

/// Verified identity claims attached by the upstream authorizer.
///
/// Only `sub` is interpreted; every other claim is kept verbatim in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Claims {
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self { subject: Some(subject.into()), other: Map::new() }
    }
}

/// A verified subject identifier, used as the storage partition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    #[cfg(test)]
    pub(crate) fn verified(sub: &str) -> Self {
        Self(sub.to_owned())
    }

    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the caller's subject identifier.
///
/// # Errors
///
/// [`ContentError::Unauthorized`] when the request carries no claim set, or
/// the claim set has no non-empty `sub`. No I/O happens here.
pub fn extract_user_id(req: &Request) -> Result<UserId, ContentError> {
    let claims = req
        .claims()
        .ok_or_else(|| ContentError::Unauthorized("no claims in request context".into()))?;

    match claims.subject.as_deref() {
        Some(sub) if !sub.is_empty() => Ok(UserId(sub.to_owned())),
        _ => Err(ContentError::Unauthorized("no subject claim".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn extracts_subject() {
        let req = Request::new(Method::Get, "/content").with_claims(Claims::for_subject("abc-123"));
        assert_eq!(extract_user_id(&req).unwrap().as_str(), "abc-123");
    }

    #[test]
    fn missing_claims_is_unauthorized() {
        let req = Request::new(Method::Get, "/content");
        let err = extract_user_id(&req).unwrap_err();
        assert!(matches!(err, ContentError::Unauthorized(_)));
    }

    #[test]
    fn missing_or_empty_subject_is_unauthorized() {
        let no_sub = Request::new(Method::Get, "/content").with_claims(Claims::default());
        assert!(matches!(extract_user_id(&no_sub), Err(ContentError::Unauthorized(_))));

        let empty = Request::new(Method::Get, "/content").with_claims(Claims::for_subject(""));
        assert!(matches!(extract_user_id(&empty), Err(ContentError::Unauthorized(_))));
    }

    #[test]
    fn decodes_authorizer_claim_json() {
        let claims: Claims = serde_json::from_str(
            r#"{"sub":"abc-123","email":"a@example.com","cognito:username":"google_1"}"#,
        )
        .unwrap();
        assert_eq!(claims.subject.as_deref(), Some("abc-123"));
        assert_eq!(claims.other["email"], "a@example.com");
    }
}
