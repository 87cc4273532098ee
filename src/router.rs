//! Route table.
//!
//! The API is mounted under whatever base path the gateway stage uses
//! (`/prod`, `/v1`, or nothing), so routes match on the path *suffix* rather
//! than the full path. `GET` reads and `POST` writes; any other method or path
//! misses and becomes a 404.

use crate::method::Method;

/// An operation the content API knows how to perform.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Route {
    /// `GET …/content`
    ReadContent,
    /// `POST …/content`
    WriteContent,
}

const CONTENT_SUFFIX: &str = "/content";

impl Route {
    /// Looks up the route for a method + path pair.
    ///
    /// ```rust
    /// use cram_store::{Method, Route};
    ///
    /// assert_eq!(Route::resolve(&Method::Get, "/prod/content"), Some(Route::ReadContent));
    /// assert_eq!(Route::resolve(&Method::Post, "/content"), Some(Route::WriteContent));
    /// assert_eq!(Route::resolve(&Method::Get, "/other"), None);
    /// ```
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        if !path.ends_with(CONTENT_SUFFIX) {
            return None;
        }
        match method {
            Method::Get  => Some(Self::ReadContent),
            Method::Post => Some(Self::WriteContent),
            _            => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadContent  => "read_content",
            Self::WriteContent => "write_content",
        }
    }
}
