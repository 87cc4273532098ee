//! HTTP status codes the content store can answer with.
//!
//! The set is closed on purpose: every status a client can observe is listed
//! here, and each one maps to exactly one branch of the error taxonomy.
//!
//! ```rust
//! use cram_store::{Response, Status};
//!
//! let res = Response::error(Status::NotFound, "Endpoint not found");
//! assert_eq!(res.status(), Status::NotFound);
//! assert_eq!(u16::from(res.status()), 404);
//! ```

/// A status code produced by the core or the transport adapter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200
    NoContent,           // 204  (CORS preflight)

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    Unauthorized,        // 401
    NotFound,            // 404

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
}

impl Status {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Ok                  => 200,
            Self::NoContent           => 204,
            Self::BadRequest          => 400,
            Self::Unauthorized        => 401,
            Self::NotFound            => 404,
            Self::InternalServerError => 500,
        }
    }

    pub fn is_server_error(self) -> bool {
        self.as_u16() >= 500
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.as_u16()
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> http::StatusCode {
        match s {
            Status::Ok                  => http::StatusCode::OK,
            Status::NoContent           => http::StatusCode::NO_CONTENT,
            Status::BadRequest          => http::StatusCode::BAD_REQUEST,
            Status::Unauthorized        => http::StatusCode::UNAUTHORIZED,
            Status::NotFound            => http::StatusCode::NOT_FOUND,
            Status::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
