//! Content request handler.
//!
//! One request moves through a fixed sequence:
//!
//! ```text
//! Request ─► extract_user_id ─► Route::resolve ─► read | write ─► Response
//!               │ 401               │ 404            │ 400 / 500
//!               └───────────────────┴────────────────┴──► Response::error
//! ```
//!
//! Identity is checked before routing, so an unauthenticated caller gets 401
//! even on paths that do not exist. Each request issues at most one storage
//! call. Every failure, including storage errors and unparseable bodies, is
//! turned into a JSON error response here and never reaches the transport.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::ContentError;
use crate::identity::{UserId, extract_user_id};
use crate::request::Request;
use crate::response::Response;
use crate::router::Route;
use crate::status::Status;
use crate::storage::ContentGateway;

const READ_FAILED: &str = "Failed to read content";
const WRITE_FAILED: &str = "Failed to write content";
const NO_CONTENT: &str = "No content found for user";
const SAVED: &str = "Content saved successfully";
const CONTENT_REQUIRED: &str = "Content is required in request body";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadBody<'a> {
    user_id: &'a str,
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteBody<'a> {
    message: &'static str,
    user_id: &'a str,
}

/// Routes authenticated requests to the storage gateway.
///
/// Stateless between requests; clone it freely or share it behind an `Arc`.
#[derive(Clone)]
pub struct ContentHandler {
    gateway: ContentGateway,
}

impl ContentHandler {
    pub fn new(gateway: ContentGateway) -> Self {
        Self { gateway }
    }

    /// Handles one request. Always produces a response.
    pub async fn handle(&self, req: &Request) -> Response {
        match self.dispatch(req).await {
            Ok(res) => res,
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    error!(method = %req.method(), path = req.path(), "request failed: {e}");
                } else {
                    warn!(method = %req.method(), path = req.path(), status = status.as_u16(), "request rejected: {e}");
                }
                e.into_response()
            }
        }
    }

    async fn dispatch(&self, req: &Request) -> Result<Response, ContentError> {
        let user_id = extract_user_id(req)?;
        let route = Route::resolve(req.method(), req.path()).ok_or(ContentError::NotFound)?;
        debug!(user_id = %user_id, route = route.as_str(), "dispatching");

        match route {
            Route::ReadContent => self.read_content(&user_id).await,
            Route::WriteContent => self.write_content(&user_id, req.body()).await,
        }
    }

    async fn read_content(&self, user_id: &UserId) -> Result<Response, ContentError> {
        let record = self.gateway
            .read_user_content(user_id)
            .await
            .map_err(|source| ContentError::Storage { context: READ_FAILED, source })?;

        let body = match &record {
            Some(r) => ReadBody { user_id: user_id.as_str(), content: r.content.as_deref(), message: None },
            None => ReadBody { user_id: user_id.as_str(), content: None, message: Some(NO_CONTENT) },
        };
        Ok(Response::success(Status::Ok, &body))
    }

    async fn write_content(&self, user_id: &UserId, body: &[u8]) -> Result<Response, ContentError> {
        let content = content_field(body)?;

        self.gateway
            .write_user_content(user_id, &content)
            .await
            .map_err(|source| ContentError::Storage { context: WRITE_FAILED, source })?;

        Ok(Response::success(Status::Ok, &WriteBody { message: SAVED, user_id: user_id.as_str() }))
    }
}

/// Pulls the string `content` field out of a JSON object body.
///
/// A body that is not a JSON object is an internal error (500); an object
/// whose `content` is missing or not a string is a bad request (400).
fn content_field(body: &[u8]) -> Result<String, ContentError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ContentError::Internal(format!("{WRITE_FAILED}: {e}")))?;

    let Value::Object(mut fields) = value else {
        return Err(ContentError::Internal(format!("{WRITE_FAILED}: request body is not a JSON object")));
    };

    match fields.remove("content") {
        Some(Value::String(content)) => Ok(content),
        _ => Err(ContentError::BadRequest(CONTENT_REQUIRED.into())),
    }
}
