//! Normalized request record handed to the core.

use crate::identity::Claims;
use crate::method::Method;

/// An incoming request after the transport edge has parsed it and the
/// upstream authorizer has attached its verified claim set.
///
/// The core never looks at raw sockets or header encodings; everything it
/// needs is here.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    body: Vec<u8>,
    claims: Option<Claims>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Vec::new(),
            claims: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Attaches the claim set produced by the upstream authorizer.
    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = Some(claims);
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn claims(&self) -> Option<&Claims> { self.claims.as_ref() }
}
