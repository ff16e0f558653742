//! PACK archive parsing and extraction.
//!
//! This module reads idTech 2 `.pak` archives and writes their entries back
//! out as a directory tree.
//!
//! ## Architecture
//!
//! - [`structures`]: the on-disk header and directory record
//! - [`parser`]: decoding and validating those structures from a buffer
//! - [`index`]: name lookup over a parsed archive
//! - [`extractor`]: writing entries to disk or to a stream
//!
//! ## PACK Format Overview
//!
//! A PACK file consists of:
//! 1. A 12-byte header: `PACK`, then the directory offset and size as
//!    little-endian `i32`
//! 2. Entry contents, stored raw and back to back
//! 3. A directory table of 64-byte records: a 56-byte NUL-terminated name,
//!    then the content offset and size as little-endian `i32`
//!
//! The whole archive is loaded into memory; entries are views into that
//! buffer rather than copies.
//!
//! ## Limitations
//!
//! - No compression (the format has none)
//! - Read-only: no packing or repacking

pub mod extractor;
pub mod index;
pub mod parser;
pub mod structures;

#[cfg(test)]
pub(crate) mod test_support;

pub use extractor::{ExtractSummary, PakExtractor, write_all, write_all_cancellable, write_entry};
pub use index::ArchiveIndex;
pub use parser::{PakParser, parse_directory, parse_header};
pub use structures::{ArchiveHeader, DirectoryEntry, DirectoryRecord};
