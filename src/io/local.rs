use std::path::{Path, PathBuf};

use super::ByteSource;
use crate::error::{Error, Result};

/// Archive stored on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for LocalFile {
    fn load(&self) -> Result<Vec<u8>> {
        let data = std::fs::read(&self.path).map_err(|e| Error::io(&self.path, e))?;
        tracing::debug!("Loaded {} bytes from {}", data.len(), self.path.display());
        Ok(data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
