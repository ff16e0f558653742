//! Synthetic archives for unit tests.

use byteorder::{LittleEndian, WriteBytesExt};

use super::structures::{ArchiveHeader, DirectoryRecord};

/// Encode a header with the `PACK` magic.
pub(crate) fn header(directory_offset: i32, directory_size: i32) -> Vec<u8> {
    let mut out = Vec::with_capacity(ArchiveHeader::SIZE);
    out.extend_from_slice(ArchiveHeader::SIGNATURE);
    out.write_i32::<LittleEndian>(directory_offset).unwrap();
    out.write_i32::<LittleEndian>(directory_size).unwrap();
    out
}

/// Encode one directory record. `name` is copied into the 56-byte field as-is
/// (truncated if longer) and the remainder is zero-filled.
pub(crate) fn record(name: &[u8], content_offset: i32, content_size: i32) -> Vec<u8> {
    let mut out = vec![0u8; DirectoryRecord::NAME_SIZE];
    let n = name.len().min(DirectoryRecord::NAME_SIZE);
    out[..n].copy_from_slice(&name[..n]);
    out.write_i32::<LittleEndian>(content_offset).unwrap();
    out.write_i32::<LittleEndian>(content_size).unwrap();
    out
}

/// Builds well-formed archives: header, then contents back to back, then the
/// directory at the end.
#[derive(Default)]
pub(crate) struct PakBuilder {
    files: Vec<(Vec<u8>, Vec<u8>)>,
}

impl PakBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn file(mut self, name: &str, data: &[u8]) -> Self {
        self.files.push((name.as_bytes().to_vec(), data.to_vec()));
        self
    }

    /// Add an entry whose 56-byte name field is given verbatim.
    pub(crate) fn raw_name(mut self, name_field: &[u8], data: &[u8]) -> Self {
        self.files.push((name_field.to_vec(), data.to_vec()));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut contents = Vec::new();
        let mut directory = Vec::new();
        for (name, data) in &self.files {
            let offset = ArchiveHeader::SIZE + contents.len();
            directory.extend(record(name, offset as i32, data.len() as i32));
            contents.extend_from_slice(data);
        }

        let directory_offset = ArchiveHeader::SIZE + contents.len();
        let mut out = header(directory_offset as i32, directory.len() as i32);
        out.extend(contents);
        out.extend(directory);
        out
    }
}

/// The single-entry archive used throughout the examples: one record for
/// `maps/base.bsp` right after the header, pointing at bytes `0x01..=0x0A`.
pub(crate) fn base_bsp_archive() -> Vec<u8> {
    let mut out = header(12, 64);
    out.extend(record(b"maps/base.bsp", 76, 10));
    out.extend(1u8..=10);
    out
}
