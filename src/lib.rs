//! # cram-store
//!
//! A per-user content store over HTTP. An authenticated caller reads and
//! overwrites one opaque text blob scoped to their identity.
//!
//! ## The contract
//!
//! The gateway in front of the service terminates TLS, verifies the bearer
//! token and forwards the verified claim set. This crate does not verify
//! tokens. It trusts the forwarded `sub` claim and uses it, and only it, as
//! the storage partition key, so a caller can never reach another user's
//! record.
//!
//! | Request | Response |
//! |---|---|
//! | `GET …/content` | `200 {"userId", "content": string \| null, "message"?}` |
//! | `POST …/content` `{"content": string}` | `200 {"message", "userId"}` |
//! | missing identity, any path | `401 {"error": "Unauthorized: …"}` |
//! | anything else | `404 {"error": "Endpoint not found"}` |
//!
//! Writes are last-writer-wins overwrites of the caller's single record.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use cram_store::{Claims, ContentGateway, ContentHandler, MemoryStore, Method, Request, Status};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let handler = ContentHandler::new(ContentGateway::new(Arc::new(MemoryStore::new())));
//!
//! let write = Request::new(Method::Post, "/prod/content")
//!     .with_claims(Claims::for_subject("abc-123"))
//!     .with_body(r#"{"content":"hello"}"#);
//! assert_eq!(handler.handle(&write).await.status(), Status::Ok);
//!
//! let read = Request::new(Method::Get, "/prod/content")
//!     .with_claims(Claims::for_subject("abc-123"));
//! let body = handler.handle(&read).await.json().unwrap();
//! assert_eq!(body["content"], "hello");
//! # }
//! ```

mod config;
mod error;
mod handler;
mod identity;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod health;
pub mod storage;

pub use config::{Backend, Config};
pub use error::{ContentError, Error, StorageError};
pub use handler::ContentHandler;
pub use identity::{Claims, UserId, extract_user_id};
pub use method::Method;
pub use request::Request;
pub use response::Response;
pub use router::Route;
pub use server::{CLAIMS_HEADER, Server};
pub use status::Status;
pub use storage::{ContentGateway, DynamoStore, MemoryStore, PartitionStore, UserContentRecord};
