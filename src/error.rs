//! Error types for the lookup service
//!
//! Three layers: `LookupError` is what callers see, `ResolveError` and
//! `CacheError` describe collaborator failures and never reach a response body.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

// == Lookup Error Enum ==
/// Terminal outcome of a failed lookup.
///
/// The `Display` text is the message returned to HTTP clients.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// No share link was supplied
    #[error("Missing URL")]
    MissingInput,

    /// The resolver failed, timed out or produced unusable output
    #[error("Invalid MEGA link")]
    ResolverError,

    /// The file is larger than the allowed ceiling
    #[error("File exceeds 5GB")]
    SizeExceeded,
}

// == IntoResponse Implementation ==
impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        // Failures are reported in-body; the HTTP status stays 200.
        (StatusCode::OK, Json(ApiResponse::error(self.to_string()))).into_response()
    }
}

// == Resolve Error Enum ==
/// Failure of the external metadata resolver.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The resolver process could not be started
    #[error("failed to spawn resolver: {0}")]
    Spawn(#[from] std::io::Error),

    /// The resolver exited unsuccessfully
    #[error("resolver exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },

    /// The link was refused before reaching the resolver
    #[error("invalid link: {0}")]
    InvalidLink(String),

    /// The resolver output could not be parsed
    #[error("malformed resolver output: {0}")]
    MalformedOutput(String),

    /// The resolver did not answer in time
    #[error("resolver timed out after {0:?}")]
    Timeout(Duration),
}

// == Cache Error Enum ==
/// Failure of a cache backend operation.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key rejected by the backend
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Backend unavailable or returned an error
    #[error("Cache backend error: {0}")]
    Backend(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

// == Result Type Aliases ==
/// Outcome of a share-link lookup.
pub type LookupResult = std::result::Result<crate::resolver::FileMetadata, LookupError>;

/// Convenience Result type for cache backends.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
