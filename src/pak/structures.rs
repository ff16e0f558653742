use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use std::ops::Range;

use crate::error::{FormatError, Result};

/// Archive header - 12 bytes at offset 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub magic: [u8; 4],
    pub directory_offset: i32,
    pub directory_size: i32,
}

impl ArchiveHeader {
    pub const SIGNATURE: &'static [u8; 4] = b"PACK";
    pub const SIZE: usize = 12;

    /// Decode and validate the header at the start of `data`.
    ///
    /// Rejects short input, a wrong magic, negative directory bounds and a
    /// directory size that is not a whole number of records. The header alone
    /// is checked here; whether the directory fits in the archive is the
    /// directory parser's concern.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(FormatError::TruncatedHeader.into());
        }

        if &data[0..4] != Self::SIGNATURE {
            return Err(FormatError::BadMagic.into());
        }

        let mut cursor = Cursor::new(&data[4..Self::SIZE]);
        let directory_offset = cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| FormatError::TruncatedHeader)?;
        let directory_size = cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| FormatError::TruncatedHeader)?;

        if directory_offset < 0 || directory_size < 0 {
            return Err(FormatError::NegativeDirectory {
                offset: directory_offset,
                size: directory_size,
            }
            .into());
        }

        if directory_size as usize % DirectoryRecord::SIZE != 0 {
            return Err(FormatError::MisalignedDirectory {
                size: directory_size,
            }
            .into());
        }

        Ok(Self {
            magic: *Self::SIGNATURE,
            directory_offset,
            directory_size,
        })
    }

    /// Number of 64-byte records in the directory table.
    ///
    /// Negative sizes count as empty.
    pub fn entry_count(&self) -> usize {
        self.directory_size.max(0) as usize / DirectoryRecord::SIZE
    }

    /// Byte range of the directory table within the archive.
    ///
    /// Negative fields are clamped to zero; the directory parser rejects them
    /// before using this range.
    pub fn directory_range(&self) -> Range<usize> {
        let start = self.directory_offset.max(0) as usize;
        start..start.saturating_add(self.directory_size.max(0) as usize)
    }
}

/// Directory record - 64 bytes, repeated `entry_count` times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryRecord {
    pub name_field: [u8; 56],
    pub content_offset: i32,
    pub content_size: i32,
}

impl DirectoryRecord {
    pub const SIZE: usize = 64;
    pub const NAME_SIZE: usize = 56;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let truncated = || FormatError::TruncatedDirectory {
            offset: 0,
            size: Self::SIZE as i32,
            archive_len: data.len(),
        };
        if data.len() < Self::SIZE {
            return Err(truncated().into());
        }

        let mut name_field = [0u8; Self::NAME_SIZE];
        name_field.copy_from_slice(&data[..Self::NAME_SIZE]);

        let mut cursor = Cursor::new(&data[Self::NAME_SIZE..Self::SIZE]);
        let content_offset = cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| truncated())?;
        let content_size = cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| truncated())?;

        Ok(Self {
            name_field,
            content_offset,
            content_size,
        })
    }
}

/// Parsed directory entry
///
/// Only the directory parser builds these, after checking that the content
/// range lies inside the archive buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub(crate) name: String,
    pub(crate) content_offset: i32,
    pub(crate) content_size: i32,
}

impl DirectoryEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_offset(&self) -> i32 {
        self.content_offset
    }

    pub fn content_size(&self) -> i32 {
        self.content_size
    }

    /// Byte range of the content within the archive buffer.
    pub fn content_range(&self) -> Range<usize> {
        let start = self.content_offset as usize;
        start..start + self.content_size as usize
    }
}
