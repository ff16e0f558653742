//! # unpak
//!
//! A Rust reader and extractor for idTech 2 PACK (`.pak`) archives.
//!
//! This library opens a PACK archive into an in-memory [`ArchiveIndex`],
//! lists its entries in directory order, and writes entries back out as a
//! directory tree that mirrors the paths stored in the archive.
//!
//! ## Features
//!
//! - Strict header and directory validation with structured errors
//! - Name lookup where a later duplicate record replaces an earlier one
//! - Extraction of a single entry, a selection, or everything, with
//!   per-entry results for bulk runs
//! - Optional cancellation between entries during bulk extraction
//!
//! ## Example
//!
//! ```no_run
//! fn main() -> unpak::Result<()> {
//!     let index = unpak::open_archive("baseq2/pak0.pak")?;
//!
//!     for name in unpak::list_entries(&index) {
//!         println!("{name}");
//!     }
//!
//!     unpak::extract_one(&index, "out", "maps/base1.bsp")?;
//!
//!     let summary = unpak::extract_all(&index, "out")?;
//!     for (name, err) in summary.failures() {
//!         eprintln!("{name}: {err}");
//!     }
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

pub mod cli;
pub mod error;
pub mod io;
pub mod pak;

pub use cli::Cli;
pub use error::{Error, FormatError, Result};
pub use io::{ByteSource, LocalFile, MemorySource};
pub use pak::{
    ArchiveHeader, ArchiveIndex, DirectoryEntry, ExtractSummary, PakExtractor, PakParser,
};

/// Load and parse the archive at `path`.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be read, [`Error::Format`] if it is not a
/// well-formed PACK archive.
pub fn open_archive(path: impl AsRef<Path>) -> Result<ArchiveIndex> {
    open_source(&LocalFile::new(path))
}

/// Load and parse an archive from any [`ByteSource`].
pub fn open_source<S: ByteSource + ?Sized>(source: &S) -> Result<ArchiveIndex> {
    let data = source.load()?;
    let index = ArchiveIndex::from_bytes(data)?.with_source(source.describe());
    tracing::debug!(
        "Opened {}: {} entries ({} superseded)",
        index.source(),
        index.len(),
        index.superseded()
    );
    Ok(index)
}

/// Entry names in directory order.
pub fn list_entries(index: &ArchiveIndex) -> Vec<&str> {
    index.list_names()
}

/// Write the entry `name` under `output_root`, returning the file written.
pub fn extract_one(
    index: &ArchiveIndex,
    output_root: impl AsRef<Path>,
    name: &str,
) -> Result<PathBuf> {
    pak::write_entry(index, output_root, name)
}

/// Write every entry under `output_root`.
///
/// Fails outright only if `output_root` cannot be created; individual entry
/// failures are reported in the returned [`ExtractSummary`].
pub fn extract_all(index: &ArchiveIndex, output_root: impl AsRef<Path>) -> Result<ExtractSummary> {
    pak::write_all(index, output_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pak::test_support::{PakBuilder, base_bsp_archive};
    use pretty_assertions::assert_eq;

    #[test]
    fn open_list_extract_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let pak = dir.path().join("pak0.pak");
        std::fs::write(&pak, base_bsp_archive()).unwrap();
        let out = dir.path().join("out");

        let index = open_archive(&pak).unwrap();
        assert_eq!(list_entries(&index), vec!["maps/base.bsp"]);
        assert_eq!(index.source(), pak.display().to_string());

        let written = extract_one(&index, &out, "maps/base.bsp").unwrap();
        assert_eq!(written, out.join("maps").join("base.bsp"));
        assert_eq!(
            std::fs::read(written).unwrap(),
            index.lookup("maps/base.bsp").unwrap()
        );
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open_archive(dir.path().join("nope.pak")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn open_zero_filled_file_is_format_error() {
        let source = MemorySource::new("zeros", vec![0u8; 128]);
        assert!(matches!(
            open_source(&source),
            Err(Error::Format(FormatError::BadMagic))
        ));
    }

    #[test]
    fn extract_all_matches_every_entry() {
        let out = tempfile::tempdir().unwrap();
        let source = MemorySource::new(
            "memory",
            PakBuilder::new()
                .file("env/unit1_bk.pcx", b"back")
                .file("env/unit1_ft.pcx", b"front")
                .file("default.cfg", b"bind w +forward\n")
                .build(),
        );
        let index = open_source(&source).unwrap();
        assert_eq!(index.source(), "memory");

        let paths = extract_all(&index, out.path()).unwrap().into_result().unwrap();
        assert_eq!(paths.len(), 3);
        for name in list_entries(&index) {
            assert_eq!(
                std::fs::read(out.path().join(name)).unwrap(),
                index.lookup(name).unwrap()
            );
        }
    }
}
