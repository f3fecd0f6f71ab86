//! Cache Record Module
//!
//! Encoding of resolved metadata as a single cache string: `<name>|<size>`.

use crate::resolver::FileMetadata;

/// Separator between name and size in an encoded record.
pub const RECORD_DELIMITER: char = '|';

// == Cache Record ==
/// The cached form of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// File name, empty for size-only records
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl CacheRecord {
    // == Encode ==
    /// Serializes the record as `<name>|<size>`.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.name, RECORD_DELIMITER, self.size)
    }

    // == Decode ==
    /// Parses an encoded record.
    ///
    /// Splits on the last delimiter so the size survives even if a name
    /// slipped through containing `|`. A bare integer is read as a size-only
    /// record. Returns `None` when no valid size can be recovered.
    pub fn decode(raw: &str) -> Option<Self> {
        let (name, size) = match raw.rsplit_once(RECORD_DELIMITER) {
            Some((name, size)) => (name, size),
            None => ("", raw),
        };

        let size = size.trim().parse::<u64>().ok()?;
        Some(Self {
            name: name.to_string(),
            size,
        })
    }
}

impl From<FileMetadata> for CacheRecord {
    fn from(metadata: FileMetadata) -> Self {
        Self {
            name: metadata.name,
            size: metadata.size,
        }
    }
}

impl From<CacheRecord> for FileMetadata {
    fn from(record: CacheRecord) -> Self {
        FileMetadata {
            name: record.name,
            size: record.size,
        }
    }
}
