//! MEGAcmd Resolver
//!
//! Runs `mega-get --info <link>` and reads the `name:` and `size:` fields
//! from its output.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{FileMetadata, MetadataResolver};
use crate::error::ResolveError;

/// Resolver backed by the MEGAcmd `mega-get` binary.
#[derive(Debug, Clone)]
pub struct MegaCmdResolver {
    program: PathBuf,
}

impl MegaCmdResolver {
    /// Creates a resolver invoking `program` (usually `mega-get`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl MetadataResolver for MegaCmdResolver {
    async fn resolve_metadata(&self, link: &str) -> Result<FileMetadata, ResolveError> {
        // A leading dash would be read by mega-get as an option
        if link.starts_with('-') {
            return Err(ResolveError::InvalidLink(link.to_string()));
        }

        debug!(program = %self.program.display(), "Invoking mega-get");

        // kill_on_drop so a caller-side timeout does not leak the child
        let output = Command::new(&self.program)
            .arg("--info")
            .arg(link)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ResolveError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_info_output(&String::from_utf8_lossy(&output.stdout))
    }
}

// == Output Parsing ==
/// Extracts name and size from `mega-get --info` output.
///
/// A line containing `name:` yields the trimmed text after the marker; a line
/// containing `size:` yields the first whitespace-separated token after it,
/// which must be an integer byte count. The name is optional, the size is not.
pub fn parse_info_output(output: &str) -> Result<FileMetadata, ResolveError> {
    let mut name = None;
    let mut size = None;

    for line in output.lines() {
        if let Some((_, rest)) = line.split_once("name:") {
            name.get_or_insert_with(|| rest.trim().to_string());
        } else if let Some((_, rest)) = line.split_once("size:") {
            let field = rest.split_whitespace().next().unwrap_or_default();
            let parsed = field.parse::<u64>().map_err(|_| {
                ResolveError::MalformedOutput(format!("unparseable size field {:?}", field))
            })?;
            size = Some(parsed);
        }
    }

    let size = size.ok_or_else(|| ResolveError::MalformedOutput("missing size field".into()))?;

    Ok(FileMetadata {
        name: name.unwrap_or_default(),
        size,
    })
}
