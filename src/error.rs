//! Error types for PACK archive handling.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Ways an archive can fail to decode.
///
/// Every variant is detected while opening the archive; nothing here is
/// raised once extraction has started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The first four bytes are not `PACK`.
    #[error("not a PACK archive")]
    BadMagic,

    /// Fewer than 12 bytes were available for the header.
    #[error("truncated header")]
    TruncatedHeader,

    /// The directory size is not a whole number of 64-byte records.
    #[error("misaligned directory: {size} bytes is not a multiple of 64")]
    MisalignedDirectory { size: i32 },

    /// The header points the directory at a negative offset or gives it a negative size.
    #[error("negative directory bounds: offset {offset}, size {size}")]
    NegativeDirectory { offset: i32, size: i32 },

    /// The archive ends before the directory does.
    #[error("truncated directory: {offset} + {size} exceeds archive length {archive_len}")]
    TruncatedDirectory {
        offset: i32,
        size: i32,
        archive_len: usize,
    },

    /// A directory record points outside the archive buffer.
    #[error("entry out of bounds: {name:?} at {offset} + {size} exceeds archive length {archive_len}")]
    EntryOutOfBounds {
        name: String,
        offset: i32,
        size: i32,
        archive_len: usize,
    },
}

/// Errors returned by archive operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the archive or writing an extracted entry failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive is malformed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// No entry with the requested name exists.
    #[error("entry not found: {0}")]
    NotFound(String),

    /// The entry name does not reduce to a relative file path under the output root.
    #[error("entry name does not form a relative file path: {0:?}")]
    InvalidEntryPath(String),

    /// Two entry names map to the same output file.
    #[error("entry {name:?} would overwrite {} written by an earlier entry", path.display())]
    OutputCollision { name: String, path: PathBuf },

    /// Bulk extraction was stopped through its cancellation flag.
    #[error("extraction cancelled")]
    Cancelled,

    /// Bulk extraction finished but some entries could not be written.
    #[error("extraction failed for {failed} of {total} entries: {first}")]
    PartialExtraction {
        failed: usize,
        total: usize,
        first: String,
    },
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error came from a malformed archive.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
