use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::NormalizeError;

/// Filesystem listing of the direct children of one directory.
///
/// Symlinks are not followed, so a linked file is never listed.
pub struct DirectoryListing {
    root: PathBuf,
}

impl DirectoryListing {
    /// Create a listing rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Regular files directly under the root, ordered by file name.
    ///
    /// Fails with `InputNotFound` when the root is missing.
    pub fn files(&self) -> Result<Vec<PathBuf>, NormalizeError> {
        if !self.root.exists() {
            return Err(NormalizeError::InputNotFound {
                path: self.root.clone(),
            });
        }
        if !self.root.is_dir() {
            return Err(NormalizeError::Configuration(format!(
                "input '{}' is not a directory",
                self.root.display()
            )));
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

/// Create `dir` and any missing parents; succeeds when it already exists.
pub fn ensure_dir(dir: &Path) -> Result<(), NormalizeError> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// UTF-8 file name of `path`, if it has one.
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
