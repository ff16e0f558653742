//! Low-level PACK archive parser.
//!
//! This module decodes the binary structures of an archive held entirely in
//! memory.
//!
//! ## Parsing Strategy
//!
//! PACK archives are read from the front:
//! 1. Decode the 12-byte header at offset 0
//! 2. Check that the directory table it describes lies inside the buffer
//! 3. Decode each 64-byte record, checking its content range as we go
//!
//! Every structural problem is reported here, before any entry is handed to
//! the index or the extractor.

use crate::error::{FormatError, Result};

use super::structures::{ArchiveHeader, DirectoryEntry, DirectoryRecord};

/// Low-level PACK parser over a borrowed archive buffer.
///
/// Typically used through [`open_archive`](crate::open_archive) or
/// [`ArchiveIndex::from_bytes`](super::ArchiveIndex::from_bytes) rather than
/// directly.
///
/// ## Example
///
/// ```ignore
/// let parser = PakParser::new(&bytes);
/// let header = parser.header()?;
/// for entry in parser.directory(&header)? {
///     println!("{} ({} bytes)", entry.name(), entry.content_size());
/// }
/// ```
pub struct PakParser<'a> {
    data: &'a [u8],
}

impl<'a> PakParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Decode the archive header.
    ///
    /// # Errors
    ///
    /// Returns a format error for a short buffer, a magic other than `PACK`,
    /// negative directory bounds or a misaligned directory size.
    pub fn header(&self) -> Result<ArchiveHeader> {
        let header = ArchiveHeader::from_bytes(self.data)?;
        tracing::debug!(
            "Header: magic={} directory_offset={} directory_size={} entries={}",
            String::from_utf8_lossy(&header.magic),
            header.directory_offset,
            header.directory_size,
            header.entry_count()
        );
        Ok(header)
    }

    /// Decode the directory table described by `header`.
    ///
    /// Entries come back in table order, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::TruncatedDirectory`] when the buffer ends before
    /// the table does, and [`FormatError::EntryOutOfBounds`] for a record
    /// whose content does not lie inside the buffer.
    pub fn directory(&self, header: &ArchiveHeader) -> Result<Vec<DirectoryEntry>> {
        let archive_len = self.data.len();
        if header.directory_offset < 0 || header.directory_size < 0 {
            return Err(FormatError::NegativeDirectory {
                offset: header.directory_offset,
                size: header.directory_size,
            }
            .into());
        }
        if header.directory_size as usize % DirectoryRecord::SIZE != 0 {
            return Err(FormatError::MisalignedDirectory {
                size: header.directory_size,
            }
            .into());
        }

        let table_end = header.directory_offset as i64 + header.directory_size as i64;
        if table_end > archive_len as i64 {
            return Err(FormatError::TruncatedDirectory {
                offset: header.directory_offset,
                size: header.directory_size,
                archive_len,
            }
            .into());
        }

        let table = header.directory_range();
        let mut entries = Vec::with_capacity(header.entry_count());
        for i in 0..header.entry_count() {
            let start = table.start + i * DirectoryRecord::SIZE;
            let record = DirectoryRecord::from_bytes(&self.data[start..start + DirectoryRecord::SIZE])?;

            let (name, scanned) = decode_name(self.data, start);
            if scanned > DirectoryRecord::NAME_SIZE {
                tracing::warn!(
                    "Name of record {} runs {} bytes past its {}-byte field: {:?}",
                    i,
                    scanned - DirectoryRecord::NAME_SIZE,
                    DirectoryRecord::NAME_SIZE,
                    name
                );
            }

            let end = record.content_offset as i64 + record.content_size as i64;
            if record.content_offset < 0 || record.content_size < 0 || end > archive_len as i64 {
                return Err(FormatError::EntryOutOfBounds {
                    name,
                    offset: record.content_offset,
                    size: record.content_size,
                    archive_len,
                }
                .into());
            }

            tracing::debug!(
                "Entry {}: {} offset={} size={}",
                i,
                name,
                record.content_offset,
                record.content_size
            );

            entries.push(DirectoryEntry {
                name,
                content_offset: record.content_offset,
                content_size: record.content_size,
            });
        }

        Ok(entries)
    }

    /// Decode the header and then the directory.
    ///
    /// A bad header stops parsing before the directory is touched.
    pub fn parse(&self) -> Result<(ArchiveHeader, Vec<DirectoryEntry>)> {
        let header = self.header()?;
        let entries = self.directory(&header)?;
        Ok((header, entries))
    }
}

/// Decode and validate the 12-byte header of `data`.
pub fn parse_header(data: &[u8]) -> Result<ArchiveHeader> {
    PakParser::new(data).header()
}

/// Decode the directory table of `data` as described by `header`.
pub fn parse_directory(data: &[u8], header: &ArchiveHeader) -> Result<Vec<DirectoryEntry>> {
    PakParser::new(data).directory(header)
}

/// Decode the name starting at `start`.
///
/// The scan for the NUL terminator runs over the rest of the buffer, not just
/// the 56-byte name field, so a field without a terminator picks up bytes from
/// the fields after it. Non-ASCII bytes are dropped. Returns the name and the
/// number of bytes scanned before the terminator.
fn decode_name(data: &[u8], start: usize) -> (String, usize) {
    let tail = &data[start..];
    let len = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    let name = tail[..len]
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect();
    (name, len)
}
