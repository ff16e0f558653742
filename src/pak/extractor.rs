use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

use super::index::ArchiveIndex;

/// PACK entry extractor
pub struct PakExtractor<'a> {
    index: &'a ArchiveIndex,
}

impl<'a> PakExtractor<'a> {
    pub fn new(index: &'a ArchiveIndex) -> Self {
        Self { index }
    }

    /// List entry names in directory order
    pub fn list_files(&self) -> Vec<&'a str> {
        self.index.list_names()
    }

    /// Borrow an entry's bytes
    pub fn extract_to_memory(&self, name: &str) -> Result<&'a [u8]> {
        self.index.lookup(name)
    }

    /// Where `name` lands under `root`.
    ///
    /// Both `/` and `\` separate directories. Control characters are removed,
    /// leading separators and `.` components are ignored, and a `..` component
    /// or a name with nothing left is rejected.
    pub fn output_path(&self, root: &Path, name: &str) -> Result<PathBuf> {
        output_path(root, name)
    }

    /// Extract an entry to disk under `root`, overwriting any existing file
    pub fn extract_to_file(&self, name: &str, root: &Path) -> Result<PathBuf> {
        let data = self.extract_to_memory(name)?;
        let output_path = self.output_path(root, name)?;

        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                tracing::debug!("Creating directory {}", parent.display());
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }

        fs::write(&output_path, data).map_err(|e| Error::io(&output_path, e))?;
        tracing::debug!("Wrote {} ({} bytes)", output_path.display(), data.len());

        Ok(output_path)
    }

    /// Copy an entry's bytes to `writer`
    pub fn extract_to_writer<W: Write + ?Sized>(&self, name: &str, writer: &mut W) -> Result<()> {
        let data = self.extract_to_memory(name)?;
        writer
            .write_all(data)
            .map_err(|e| Error::io(format!("<{name}>"), e))
    }

    /// Extract every entry under `root`
    pub fn extract_all(&self, root: &Path) -> Result<ExtractSummary> {
        self.extract_all_cancellable(root, &AtomicBool::new(false))
    }

    /// Extract every entry under `root`, checking `cancel` before each one.
    ///
    /// A failing entry does not stop the others; its error is recorded in the
    /// summary. Only failing to create `root` itself aborts the whole run.
    /// An entry whose output path was already written by an earlier entry is
    /// recorded as [`Error::OutputCollision`] and the earlier file is kept.
    pub fn extract_all_cancellable(&self, root: &Path, cancel: &AtomicBool) -> Result<ExtractSummary> {
        fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;

        let names = self.list_files();
        let mut written: HashSet<PathBuf> = HashSet::with_capacity(names.len());
        let mut summary = ExtractSummary {
            results: Vec::with_capacity(names.len()),
            cancelled: false,
        };

        for name in names {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(
                    "Extraction cancelled after {} of {} entries",
                    summary.results.len(),
                    self.index.len()
                );
                summary.cancelled = true;
                break;
            }

            let result = match self.output_path(root, name) {
                Ok(path) if written.contains(&path) => Err(Error::OutputCollision {
                    name: name.to_string(),
                    path,
                }),
                Ok(_) => self.extract_to_file(name, root),
                Err(e) => Err(e),
            };
            if let Ok(path) = &result {
                written.insert(path.clone());
            }
            if let Err(e) = &result {
                tracing::warn!("Failed to extract {}: {}", name, e);
            }
            summary.results.push((name.to_string(), result));
        }

        tracing::info!(
            "Extracted {} of {} entries to {}",
            summary.extracted().count(),
            self.index.len(),
            root.display()
        );

        Ok(summary)
    }
}

/// Write one entry under `output_root`.
pub fn write_entry(index: &ArchiveIndex, output_root: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
    PakExtractor::new(index).extract_to_file(name, output_root.as_ref())
}

/// Write every entry under `output_root`, collecting per-entry results.
pub fn write_all(index: &ArchiveIndex, output_root: impl AsRef<Path>) -> Result<ExtractSummary> {
    PakExtractor::new(index).extract_all(output_root.as_ref())
}

/// [`write_all`] with a cancellation flag checked between entries.
pub fn write_all_cancellable(
    index: &ArchiveIndex,
    output_root: impl AsRef<Path>,
    cancel: &AtomicBool,
) -> Result<ExtractSummary> {
    PakExtractor::new(index).extract_all_cancellable(output_root.as_ref(), cancel)
}

/// Outcome of a bulk extraction, one result per entry in directory order.
#[derive(Debug)]
pub struct ExtractSummary {
    pub results: Vec<(String, Result<PathBuf>)>,
    pub cancelled: bool,
}

impl ExtractSummary {
    /// Names and output paths of the entries that were written.
    pub fn extracted(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.results
            .iter()
            .filter_map(|(name, r)| r.as_ref().ok().map(|p| (name.as_str(), p.as_path())))
    }

    /// Names and errors of the entries that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> + '_ {
        self.results
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|e| (name.as_str(), e)))
    }

    /// Every entry was attempted and written.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.results.iter().all(|(_, r)| r.is_ok())
    }

    /// Collapse into an error if the run was cancelled or any entry failed.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        if self.cancelled {
            return Err(Error::Cancelled);
        }

        let total = self.results.len();
        let failed = self.failures().count();
        if let Some((name, e)) = self.failures().next() {
            return Err(Error::PartialExtraction {
                failed,
                total,
                first: format!("{name}: {e}"),
            });
        }

        Ok(self.results.into_iter().filter_map(|(_, r)| r.ok()).collect())
    }
}

fn output_path(root: &Path, name: &str) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    let mut pushed = false;

    for part in name.split(['/', '\\']) {
        let part: String = part.chars().filter(|c| !c.is_control()).collect();
        match Path::new(&part).components().next() {
            None | Some(Component::CurDir) => continue,
            Some(Component::Normal(_)) if Path::new(&part).components().count() == 1 => {
                path.push(&part);
                pushed = true;
            }
            _ => return Err(Error::InvalidEntryPath(name.to_string())),
        }
    }

    if !pushed {
        return Err(Error::InvalidEntryPath(name.to_string()));
    }
    Ok(path)
}
