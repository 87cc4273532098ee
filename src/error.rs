//! Error types.
//!
//! Two layers:
//!
//! - [`ContentError`] is the request-level taxonomy. Every variant renders to
//!   a JSON `{"error": …}` body through the response builder; none of them
//!   ever escapes to the transport.
//! - [`Error`] covers process infrastructure: reading configuration, binding
//!   the listener, building the storage client.
//!
//! [`StorageError`] is what a backing store reports; the handler wraps it into
//! [`ContentError::Storage`] with the operation it was performing.

use crate::response::Response;
use crate::status::Status;

/// Process-level failures returned by [`Config::from_env`](crate::Config::from_env)
/// and [`Server::serve`](crate::Server::serve).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing environment variable `{0}`")]
    MissingEnv(&'static str),

    #[error("invalid value `{value}` for `{name}`")]
    InvalidEnv { name: &'static str, value: String },
}

/// The backing store could not complete a get or put.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Transport or availability failure, or the store rejected the call.
    #[error("{operation} failed: {message}")]
    Backend { operation: &'static str, message: String },

    /// An item came back in a shape that is not a content record.
    #[error("malformed item in partition `{partition_key}`: {message}")]
    Decode { partition_key: String, message: String },

    #[error("could not encode item: {0}")]
    Encode(String),
}

/// Request-level failure taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Missing claim set or subject. Checked before routing.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Required input field missing or of the wrong type.
    #[error("{0}")]
    BadRequest(String),

    #[error("Endpoint not found")]
    NotFound,

    /// The backing store failed; `context` names the operation.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StorageError,
    },

    /// Anything else, including request bodies that do not parse.
    #[error("{0}")]
    Internal(String),
}

impl ContentError {
    pub fn status(&self) -> Status {
        match self {
            Self::Unauthorized(_) => Status::Unauthorized,
            Self::BadRequest(_) => Status::BadRequest,
            Self::NotFound => Status::NotFound,
            Self::Storage { .. } | Self::Internal(_) => Status::InternalServerError,
        }
    }

    pub fn into_response(self) -> Response {
        Response::error(self.status(), &self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(ContentError::Unauthorized("x".into()).status().as_u16(), 401);
        assert_eq!(ContentError::BadRequest("x".into()).status().as_u16(), 400);
        assert_eq!(ContentError::NotFound.status().as_u16(), 404);
        assert_eq!(ContentError::Internal("x".into()).status().as_u16(), 500);
        let storage = ContentError::Storage {
            context: "Failed to read content",
            source: StorageError::Backend { operation: "Query", message: "timeout".into() },
        };
        assert_eq!(storage.status().as_u16(), 500);
    }

    #[test]
    fn storage_errors_carry_operation_context() {
        let err = ContentError::Storage {
            context: "Failed to write content",
            source: StorageError::Backend { operation: "PutItem", message: "throttled".into() },
        };
        assert_eq!(err.to_string(), "Failed to write content: PutItem failed: throttled");
    }

    #[test]
    fn unauthorized_message_is_prefixed() {
        let err = ContentError::Unauthorized("no subject claim".into());
        assert_eq!(err.to_string(), "Unauthorized: no subject claim");
    }
}
