//! Response DTOs for the lookup API
//!
//! Every body carries a `status` field of either `success` or `error`.

use serde::Serialize;

use crate::resolver::FileMetadata;

/// Response body for `GET /api`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    /// `{"status":"success","name":...,"size":...}`
    Success { name: String, size: u64 },
    /// `{"status":"error","error":...}`
    Error { error: String },
}

impl ApiResponse {
    /// Creates a success body from resolved metadata
    pub fn success(metadata: FileMetadata) -> Self {
        Self::Success {
            name: metadata.name,
            size: metadata.size,
        }
    }

    /// Creates an error body
    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serialize() {
        let resp = ApiResponse::success(FileMetadata::new("movie.mkv", 3_000_000_000));
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(
            json,
            r#"{"status":"success","name":"movie.mkv","size":3000000000}"#
        );
    }

    #[test]
    fn test_error_serialize() {
        let resp = ApiResponse::error("Missing URL");
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"status":"error","error":"Missing URL"}"#);
    }
}
