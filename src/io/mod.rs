mod local;
mod memory;

pub use local::LocalFile;
pub use memory::MemorySource;

use std::path::Path;

use crate::error::Result;

/// A source of archive bytes.
///
/// PACK archives are read whole: the directory and every entry are views into
/// one buffer, so a source only has to hand over its complete contents.
pub trait ByteSource {
    /// Load the entire contents of the source.
    fn load(&self) -> Result<Vec<u8>>;

    /// Human-readable description of where the bytes come from.
    fn describe(&self) -> String;
}

/// Read a whole file into memory.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    LocalFile::new(path).load()
}
