//! Startup scan
//!
//! Files dropped while the process was down produce no native events. The
//! scan lists the top level of the watch directory once so they can be fed
//! through the same debounce path as live events.

use crate::WatchError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List regular files directly inside `dir` (non-recursive, links not followed)
pub fn existing_files(dir: &Path) -> Result<Vec<PathBuf>, WatchError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| WatchError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_top_level_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("b.pdf"), b"b").unwrap();
        fs::write(root.join("a.png"), b"a").unwrap();
        fs::create_dir(root.join("archive")).unwrap();
        fs::write(root.join("archive/old.pdf"), b"old").unwrap();

        let files = existing_files(root).unwrap();
        assert_eq!(files, vec![root.join("a.png"), root.join("b.pdf")]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = existing_files(&temp_dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, WatchError::Scan { .. }));
    }
}
