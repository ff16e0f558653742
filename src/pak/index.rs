use indexmap::IndexMap;

use crate::error::{Error, FormatError, Result};

use super::parser::PakParser;
use super::structures::{ArchiveHeader, DirectoryEntry};

/// An opened archive: the full byte buffer plus a name-keyed directory.
///
/// Names keep the position of their first appearance in the directory table;
/// when a name repeats, the later record's content replaces the earlier one.
/// The buffer is never mutated after parsing, so shared references can be
/// used from several threads at once.
#[derive(Debug, Clone)]
pub struct ArchiveIndex {
    data: Vec<u8>,
    header: ArchiveHeader,
    entries: IndexMap<String, DirectoryEntry>,
    superseded: usize,
    source: String,
}

impl ArchiveIndex {
    /// Parse `data` and index its directory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let (header, entries) = PakParser::new(&data).parse()?;
        Ok(Self::build(data, header, entries))
    }

    /// Index entries produced by [`parse_directory`](super::parse_directory)
    /// for `data`.
    ///
    /// Lookups re-check each content range against `data`, so entries parsed
    /// from a different buffer fail with a format error instead of panicking.
    pub fn build(data: Vec<u8>, header: ArchiveHeader, entries: Vec<DirectoryEntry>) -> Self {
        let mut map = IndexMap::with_capacity(entries.len());
        let mut superseded = 0;

        for entry in entries {
            let name = entry.name.clone();
            if let Some(previous) = map.insert(name, entry) {
                superseded += 1;
                tracing::warn!(
                    "Duplicate entry {:?}: record at offset {} supersedes offset {}",
                    previous.name,
                    map[&previous.name].content_offset,
                    previous.content_offset
                );
            }
        }

        Self {
            data,
            header,
            entries: map,
            superseded,
            source: String::new(),
        }
    }

    pub(crate) fn with_source(mut self, source: String) -> Self {
        self.source = source;
        self
    }

    /// Entry names in directory order, one per distinct name.
    pub fn list_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Content bytes of the entry called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no entry has that name.
    pub fn lookup(&self, name: &str) -> Result<&[u8]> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        self.content(entry)
    }

    /// Directory entry called `name`, if present.
    pub fn get(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The entries that won their name, in directory order.
    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> + '_ {
        self.entries.values()
    }

    pub(crate) fn content(&self, entry: &DirectoryEntry) -> Result<&[u8]> {
        self.data.get(entry.content_range()).ok_or_else(|| {
            FormatError::EntryOutOfBounds {
                name: entry.name.clone(),
                offset: entry.content_offset,
                size: entry.content_size,
                archive_len: self.data.len(),
            }
            .into()
        })
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Number of distinct entry names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of directory records hidden by a later record with the same name.
    pub fn superseded(&self) -> usize {
        self.superseded
    }

    /// Size of the whole archive buffer in bytes.
    pub fn archive_len(&self) -> usize {
        self.data.len()
    }

    /// Where the archive was loaded from; empty for bare buffers.
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pak::test_support::{PakBuilder, base_bsp_archive};
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_returns_exact_content_range() {
        let data = base_bsp_archive();
        let index = ArchiveIndex::from_bytes(data.clone()).unwrap();

        assert_eq!(index.list_names(), vec!["maps/base.bsp"]);
        assert_eq!(index.lookup("maps/base.bsp").unwrap(), &data[76..86]);
        assert_eq!(
            index.lookup("maps/base.bsp").unwrap(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
        );
    }

    #[test]
    fn every_entry_maps_to_its_own_bytes() {
        let data = PakBuilder::new()
            .file("pics/a.pcx", b"first")
            .file("pics/b.pcx", b"")
            .file("sound/c.wav", b"third one")
            .build();
        let index = ArchiveIndex::from_bytes(data.clone()).unwrap();

        for entry in index.entries() {
            assert_eq!(
                index.lookup(entry.name()).unwrap(),
                &data[entry.content_range()]
            );
        }
        assert_eq!(index.lookup("pics/b.pcx").unwrap(), b"");
        assert_eq!(index.lookup("sound/c.wav").unwrap(), b"third one");
    }

    #[test]
    fn later_duplicate_wins_and_keeps_first_position() {
        let data = PakBuilder::new()
            .file("a.txt", b"old")
            .file("b.txt", b"bee")
            .file("a.txt", b"new")
            .build();
        let index = ArchiveIndex::from_bytes(data).unwrap();

        assert_eq!(index.list_names(), vec!["a.txt", "b.txt"]);
        assert_eq!(index.lookup("a.txt").unwrap(), b"new");
        assert_eq!(index.len(), 2);
        assert_eq!(index.superseded(), 1);
        assert_eq!(index.header().entry_count(), 3);
    }

    #[test]
    fn missing_name_is_not_found() {
        let index = ArchiveIndex::from_bytes(base_bsp_archive()).unwrap();
        match index.lookup("maps/q2dm1.bsp") {
            Err(Error::NotFound(name)) => assert_eq!(name, "maps/q2dm1.bsp"),
            other => panic!("expected not found, got {other:?}"),
        }
        assert!(index.get("maps/q2dm1.bsp").is_none());
        assert!(!index.contains("maps/q2dm1.bsp"));
        assert!(index.contains("maps/base.bsp"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let index = ArchiveIndex::from_bytes(base_bsp_archive()).unwrap();
        assert!(index.lookup("MAPS/BASE.BSP").is_err());
    }

    #[test]
    fn metadata_accessors() {
        let data = base_bsp_archive();
        let len = data.len();
        let index = ArchiveIndex::from_bytes(data)
            .unwrap()
            .with_source("pak0.pak".into());

        assert_eq!(index.archive_len(), len);
        assert_eq!(index.source(), "pak0.pak");
        assert!(!index.is_empty());
        assert_eq!(index.superseded(), 0);
    }

    #[test]
    fn build_from_separately_parsed_parts() {
        use crate::pak::{parse_directory, parse_header};

        let data = PakBuilder::new()
            .file("a.txt", b"one")
            .file("a.txt", b"two")
            .build();
        let header = parse_header(&data).unwrap();
        let entries = parse_directory(&data, &header).unwrap();
        let index = ArchiveIndex::build(data, header, entries);

        assert_eq!(index.list_names(), vec!["a.txt"]);
        assert_eq!(index.lookup("a.txt").unwrap(), b"two");
    }

    #[test]
    fn build_with_foreign_entries_does_not_panic() {
        use crate::pak::{parse_directory, parse_header};

        let big = PakBuilder::new().file("big.bin", &[9u8; 256]).build();
        let header = parse_header(&big).unwrap();
        let entries = parse_directory(&big, &header).unwrap();
        let index = ArchiveIndex::build(vec![0u8; 16], header, entries);

        assert!(index.lookup("big.bin").unwrap_err().is_format());
    }

    #[test]
    fn format_errors_surface_from_from_bytes() {
        assert!(ArchiveIndex::from_bytes(vec![0u8; 32]).unwrap_err().is_format());
    }
}
