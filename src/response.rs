//! Outgoing response record and the single place headers are assembled.
//!
//! Every response the service produces, success or failure, goes through
//! [`Response::success`], [`Response::error`] or [`Response::preflight`]. They
//! all stamp the same header set: `application/json` plus a fixed CORS policy
//! that exposes the API to exactly one browser origin.
//!
//! ```rust
//! use cram_store::{Response, Status};
//! use serde_json::json;
//!
//! let ok = Response::success(Status::Ok, &json!({"userId": "abc-123"}));
//! assert_eq!(ok.header("access-control-allow-origin"), Some("https://cram-ai.com"));
//!
//! let err = Response::error(Status::BadRequest, "Content is required in request body");
//! assert_eq!(err.body(), br#"{"error":"Content is required in request body"}"#);
//! ```

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::status::Status;

// ── CORS policy ───────────────────────────────────────────────────────────────

/// The only browser origin allowed to call the API.
pub const ALLOWED_ORIGIN: &str = "https://cram-ai.com";
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
/// Preflight cache lifetime, in seconds.
pub const MAX_AGE_SECS: u32 = 3600;

const JSON: &str = "application/json";

fn standard_headers() -> Vec<(String, String)> {
    vec![
        ("content-type".to_owned(), JSON.to_owned()),
        ("access-control-allow-origin".to_owned(), ALLOWED_ORIGIN.to_owned()),
        ("access-control-allow-methods".to_owned(), ALLOWED_METHODS.to_owned()),
        ("access-control-allow-headers".to_owned(), ALLOWED_HEADERS.to_owned()),
        ("access-control-max-age".to_owned(), MAX_AGE_SECS.to_string()),
    ]
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing response: status, the standard header set, and a JSON body.
#[derive(Debug, Clone)]
pub struct Response {
    body: Vec<u8>,
    headers: Vec<(String, String)>,
    status: Status,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl Response {
    /// Serializes `body` as the JSON payload.
    ///
    /// A body that fails to serialize turns into a `500` error response, so
    /// this never panics and never returns a half-built response.
    pub fn success<T: Serialize + ?Sized>(status: Status, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => Self::with_body(status, bytes),
            Err(e) => {
                error!("response serialization failed: {e}");
                Self::error(Status::InternalServerError, "Failed to serialize response")
            }
        }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: Status, message: &str) -> Self {
        let bytes = serde_json::to_vec(&ErrorBody { error: message })
            .unwrap_or_else(|_| br#"{"error":"Internal Server Error"}"#.to_vec());
        Self::with_body(status, bytes)
    }

    /// `204 No Content` answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self::with_body(Status::NoContent, Vec::new())
    }

    fn with_body(status: Status, body: Vec<u8>) -> Self {
        Self { body, headers: standard_headers(), status }
    }

    pub fn status(&self) -> Status { self.status }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body back into a JSON value.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    /// Converts into the `http` response type hyper writes to the wire.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status.into();
        for (name, value) in self.headers {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
                (Ok(name), Ok(value)) => {
                    res.headers_mut().append(name, value);
                }
                _ => error!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}
