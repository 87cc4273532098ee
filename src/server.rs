//! HTTP transport adapter and graceful shutdown.
//!
//! The service runs behind a gateway that terminates TLS and verifies the
//! caller's bearer token. The gateway forwards the verified claim set as a
//! JSON object in the [`CLAIMS_HEADER`] header; this adapter decodes it,
//! normalizes the rest of the request and hands it to [`ContentHandler`].
//! The gateway must overwrite any client-supplied copy of that header; the
//! listener must not be reachable except through it.
//!
//! Answered here, without touching the core:
//! - health checks (`GET /healthz`, `GET /readyz`)
//! - CORS preflight (`OPTIONS` on any path → `204`)
//!
//! Every other request, whatever its method, goes to the core.
//!
//! # Graceful shutdown and Kubernetes
//!
//! When Kubernetes terminates a pod it sends **SIGTERM** and waits
//! `terminationGracePeriodSeconds` (default 30 s) before sending SIGKILL.
//!
//! The server reacts by:
//! 1. Immediately stopping `listener.accept()`, so no new connections are made.
//! 2. Letting every in-flight connection task run to completion.
//! 3. Returning from [`Server::serve`], which lets `main` exit cleanly.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};

use crate::error::Error;
use crate::handler::ContentHandler;
use crate::health;
use crate::identity::Claims;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Header carrying the verified claim set, as JSON, from the upstream authorizer.
pub const CLAIMS_HEADER: &str = "x-authorizer-claims";

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Starts accepting connections and dispatching them to `handler`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, handler: ContentHandler) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let handler = Arc::new(handler);

        info!(addr = %self.addr, "cram-store listening");

        // Every spawned connection task, so shutdown can wait for them.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a SIGTERM stops accepting even if
                // more connections are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => match res {
                    Ok((stream, remote_addr)) => {
                        tasks.spawn(serve_connection(stream, remote_addr, Arc::clone(&handler)));
                    }
                    Err(e) => error!("accept error: {e}"),
                },

                // Reap finished connection tasks so the set stays bounded.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("cram-store stopped");
        Ok(())
    }
}

/// Runs HTTP/1 or HTTP/2 on one accepted socket until the peer hangs up.
async fn serve_connection(stream: TcpStream, remote_addr: SocketAddr, handler: Arc<ContentHandler>) {
    let svc = service_fn(move |req| dispatch(Arc::clone(&handler), req, remote_addr));
    let conn = ConnBuilder::new(TokioExecutor::new());
    if let Err(e) = conn.serve_connection(TokioIo::new(stream), svc).await {
        error!(peer = %remote_addr, "connection error: {e}");
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Turns one hyper request into one response. Never fails: every error
/// becomes a JSON error response with the standard headers.
async fn dispatch(
    handler: Arc<ContentHandler>,
    req: hyper::Request<Incoming>,
    remote_addr: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_owned();

    let response = match edge_response(&parts.method, &path) {
        Some(res) => res,
        None => match body.collect().await {
            Ok(collected) => handler.handle(&normalize(&parts, collected.to_bytes())).await,
            Err(e) => {
                warn!(peer = %remote_addr, "failed to read request body: {e}");
                Response::error(Status::InternalServerError, "Failed to read request body")
            }
        },
    };

    info!(
        peer = %remote_addr,
        method = %parts.method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    Ok(response.into_http())
}

/// Responses produced at the edge: health checks and CORS preflight.
fn edge_response(method: &http::Method, path: &str) -> Option<Response> {
    if let Some(res) = health::check(method, path) {
        return Some(res);
    }
    (method == http::Method::OPTIONS).then(Response::preflight)
}

/// Builds the core's request record: method, path without the query, body
/// and the forwarded claims.
fn normalize(parts: &http::request::Parts, body: Bytes) -> Request {
    let req = Request::new(Method::from(&parts.method), parts.uri.path()).with_body(body.to_vec());
    match claims_from_headers(&parts.headers) {
        Some(claims) => req.with_claims(claims),
        None => req,
    }
}

/// Decodes the forwarded claim set. A header that is not valid JSON claims is
/// treated as absent, which the core answers with 401.
fn claims_from_headers(headers: &http::HeaderMap) -> Option<Claims> {
    let raw = headers.get(CLAIMS_HEADER)?;
    let decoded = raw
        .to_str()
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str::<Claims>(s).map_err(|e| e.to_string()));
    match decoded {
        Ok(claims) => Some(claims),
        Err(e) => {
            warn!("ignoring undecodable {CLAIMS_HEADER} header: {e}");
            None
        }
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** (sent by `kubectl` and the
/// Kubernetes control plane) and **SIGINT** (Ctrl-C, for local dev).
/// On Windows only Ctrl-C is available.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ContentGateway, MemoryStore};

    fn parts(method: &str, uri: &str, headers: &[(&str, &str)]) -> http::request::Parts {
        let mut builder = http::Request::builder().method(method).uri(uri);
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn preflight_and_health_checks_answer_at_the_edge() {
        let pre = edge_response(&http::Method::OPTIONS, "/prod/content").unwrap();
        assert_eq!(pre.status(), Status::NoContent);
        assert_eq!(pre.header("access-control-allow-methods"), Some("GET, POST, PUT, DELETE, OPTIONS"));

        assert!(edge_response(&http::Method::GET, "/healthz").is_some());
        assert!(edge_response(&http::Method::GET, "/content").is_none());
    }

    #[test]
    fn normalize_attaches_forwarded_claims() {
        let p = parts(
            "POST",
            "/prod/content?x=1",
            &[(CLAIMS_HEADER, r#"{"sub":"abc-123","email":"a@b.c"}"#), ("content-type", "application/json")],
        );
        let req = normalize(&p, Bytes::from_static(br#"{"content":"hi"}"#));
        assert_eq!(req.method(), &Method::Post);
        assert_eq!(req.path(), "/prod/content");
        assert_eq!(req.body(), br#"{"content":"hi"}"#);
        assert_eq!(req.claims().and_then(|c| c.subject.as_deref()), Some("abc-123"));
    }

    #[test]
    fn undecodable_claims_are_dropped() {
        let p = parts("GET", "/content", &[(CLAIMS_HEADER, "not-json")]);
        let req = normalize(&p, Bytes::new());
        assert!(req.claims().is_none());

        let p = parts("GET", "/content", &[]);
        assert!(normalize(&p, Bytes::new()).claims().is_none());
    }

    #[tokio::test]
    async fn trace_reaches_the_handler() {
        let store = Arc::new(MemoryStore::new());
        let handler = ContentHandler::new(ContentGateway::new(store.clone()));

        let anon = parts("TRACE", "/prod/content", &[]);
        assert!(edge_response(&anon.method, anon.uri.path()).is_none());
        let req = normalize(&anon, Bytes::new());
        assert_eq!(req.method(), &Method::Other("TRACE".into()));
        let res = handler.handle(&req).await;
        assert_eq!(res.status(), Status::Unauthorized);
        assert_eq!(res.header("access-control-allow-origin"), Some("https://cram-ai.com"));

        let authed = parts("TRACE", "/prod/content", &[(CLAIMS_HEADER, r#"{"sub":"abc-123"}"#)]);
        let res = handler.handle(&normalize(&authed, Bytes::new())).await;
        assert_eq!(res.status(), Status::NotFound);
        assert_eq!(res.json().unwrap(), serde_json::json!({"error": "Endpoint not found"}));

        assert_eq!(store.calls(), 0);
    }
}
