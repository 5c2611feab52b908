//! File access used by figure resolution
//!
//! The compiler only needs three things from the filesystem: an existence
//! check, a "find exactly one file matching this pattern under a root"
//! lookup, and a copy. They sit behind [`FileStore`] so conversions can run
//! against something other than the real disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::error::{Error, Result};

/// Filesystem operations needed by the figure pipeline
pub trait FileStore {
    /// Find the single file under `root` matching the glob `pattern`
    ///
    /// Fails with [`Error::NoMatch`] for zero matches and
    /// [`Error::AmbiguousMatch`] for more than one.
    fn unique_file_under(&self, root: &Path, pattern: &str) -> Result<PathBuf>;

    /// Check whether a file or directory exists
    fn path_exists(&self, path: &Path) -> bool;

    /// Copy `src` to `dst`, creating the destination directory if needed
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()>;
}

/// [`FileStore`] backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl DiskStore {
    /// List files (not directories) under `root` matching `pattern`, sorted
    pub fn find_files(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            pattern
        );

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            // Skip hidden folders such as `.trash/` and `.obsidian/`
            require_literal_leading_dot: true,
        };

        let paths = glob::glob_with(&full_pattern, options).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        Ok(collect_files(paths))
    }
}

/// Keep the files among glob results, sorted; unreadable entries are skipped
fn collect_files<I, E>(entries: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = std::result::Result<PathBuf, E>>,
    E: fmt::Display,
{
    let mut candidates: Vec<PathBuf> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    candidates.sort();
    candidates
}

impl FileStore for DiskStore {
    fn unique_file_under(&self, root: &Path, pattern: &str) -> Result<PathBuf> {
        let mut candidates = self.find_files(root, pattern)?;

        match candidates.len() {
            0 => Err(Error::NoMatch {
                pattern: pattern.to_string(),
                root: root.to_path_buf(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(Error::AmbiguousMatch {
                pattern: pattern.to_string(),
                candidates,
            }),
        }
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()> {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
        Ok(())
    }
}
