//! Health checks answered at the transport edge.
//!
//! | Check | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Checks come from the orchestrator, not from users, so they are matched on
//! the exact path before the request reaches the authenticated core.

use serde_json::json;

use crate::response::Response;
use crate::status::Status;

pub const LIVENESS_PATH: &str = "/healthz";
pub const READINESS_PATH: &str = "/readyz";

/// Always `200 {"status":"ok"}`. If the process can answer, it is alive.
pub fn liveness() -> Response {
    Response::success(Status::Ok, &json!({"status": "ok"}))
}

/// `200 {"status":"ready"}`.
///
/// The storage client connects lazily per call, so there is nothing to warm
/// up; a store outage shows up as 500s on the content routes instead.
pub fn readiness() -> Response {
    Response::success(Status::Ok, &json!({"status": "ready"}))
}

/// Returns the health response for `GET` on a health path.
pub(crate) fn check(method: &http::Method, path: &str) -> Option<Response> {
    if method != http::Method::GET {
        return None;
    }
    match path {
        LIVENESS_PATH => Some(liveness()),
        READINESS_PATH => Some(readiness()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_health_paths_only() {
        let live = check(&http::Method::GET, "/healthz").unwrap();
        assert_eq!(live.json().unwrap(), json!({"status": "ok"}));
        let ready = check(&http::Method::GET, "/readyz").unwrap();
        assert_eq!(ready.json().unwrap(), json!({"status": "ready"}));

        assert!(check(&http::Method::GET, "/prod/healthz").is_none());
        assert!(check(&http::Method::POST, "/healthz").is_none());
        assert!(check(&http::Method::GET, "/content").is_none());
    }
}
