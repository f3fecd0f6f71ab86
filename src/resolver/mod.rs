//! Resolver Module
//!
//! Turns a share link into file metadata by asking an external collaborator.

mod megacmd;

use async_trait::async_trait;

use crate::error::ResolveError;

pub use megacmd::{parse_info_output, MegaCmdResolver};

// == File Metadata ==
/// Name and size of a remotely stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// File name, empty when the source did not report one
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl FileMetadata {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

// == Metadata Resolver ==
/// Capability to look up file metadata for a share link.
///
/// Implementations may shell out to a CLI or call a client library; the
/// lookup service does not care which.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Resolves `link` into its file name and size.
    async fn resolve_metadata(&self, link: &str) -> Result<FileMetadata, ResolveError>;
}
