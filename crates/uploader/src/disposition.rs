//! Post-upload disposition of the source file

use crate::{Result, UploadError};
use paperlink_core::Disposition;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// What happened to the source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposed {
    Deleted,
    MovedTo(PathBuf),
}

/// Apply `disposition` to `source`; only called after a successful upload
pub async fn dispose(disposition: &Disposition, source: &Path) -> Result<Disposed> {
    let fail = |source_err: io::Error| UploadError::Disposition {
        path: source.to_path_buf(),
        action: disposition.action(),
        source: source_err,
    };

    match disposition {
        Disposition::Delete => {
            tokio::fs::remove_file(source).await.map_err(fail)?;
            info!(file = %source.display(), "file deleted after upload");
            Ok(Disposed::Deleted)
        }
        Disposition::Backup(dir) => {
            let name = source.file_name().ok_or_else(|| {
                fail(io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))
            })?;
            let dst = dir.join(name);
            move_file(source, &dst).await.map_err(fail)?;
            info!(src = %source.display(), dst = %dst.display(), "file moved to backup");
            Ok(Disposed::MovedTo(dst))
        }
    }
}

/// Rename `src` to `dst`, falling back to copy + delete (e.g. across devices)
pub async fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match tokio::fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(err) => {
            debug!(src = %src.display(), error = %err, "rename failed, copying instead");
            copy_then_remove(src, dst).await
        }
    }
}

/// Copy `src` to `dst` durably, then remove `src`
pub async fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    copy_file(src, dst).await?;
    tokio::fs::remove_file(src).await
}

/// Copy `src` to `dst` and fsync the destination
pub async fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut input = tokio::fs::File::open(src).await?;
    let mut output = tokio::fs::File::create(dst).await?;
    let copied = tokio::io::copy(&mut input, &mut output).await?;
    output.flush().await?;
    output.sync_all().await?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn payload() -> Vec<u8> {
        (0..256 * 1024).map(|i| (i * 31 % 251) as u8).collect()
    }

    #[tokio::test]
    async fn test_delete_removes_source() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("scan.pdf");
        fs::write(&src, b"pdf").unwrap();

        let disposed = dispose(&Disposition::Delete, &src).await.unwrap();
        assert_eq!(disposed, Disposed::Deleted);
        assert!(!src.exists());
    }

    #[tokio::test]
    async fn test_backup_keeps_basename() {
        let temp_dir = TempDir::new().unwrap();
        let backup = temp_dir.path().join("backup");
        fs::create_dir(&backup).unwrap();
        let src = temp_dir.path().join("scan.pdf");
        fs::write(&src, payload()).unwrap();

        let disposed = dispose(&Disposition::Backup(backup.clone()), &src)
            .await
            .unwrap();

        let dst = backup.join("scan.pdf");
        assert_eq!(disposed, Disposed::MovedTo(dst.clone()));
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), payload());
    }

    #[tokio::test]
    async fn test_copy_fallback_is_byte_identical() {
        let src_dir = TempDir::new().unwrap();
        let dst_dir = TempDir::new().unwrap();
        let src = src_dir.path().join("large.tiff");
        let dst = dst_dir.path().join("large.tiff");
        fs::write(&src, payload()).unwrap();

        copy_then_remove(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), payload());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_move_across_filesystems_copies_and_removes() {
        use std::os::unix::fs::MetadataExt;

        let Ok(shm_dir) = TempDir::new_in("/dev/shm") else {
            eprintln!("skipping: /dev/shm not available");
            return;
        };
        let disk_dir = TempDir::new().unwrap();
        let shm_dev = fs::metadata(shm_dir.path()).unwrap().dev();
        let disk_dev = fs::metadata(disk_dir.path()).unwrap().dev();
        if shm_dev == disk_dev {
            eprintln!("skipping: /dev/shm shares a filesystem with the temp dir");
            return;
        }

        let src = shm_dir.path().join("large.tiff");
        let dst = disk_dir.path().join("large.tiff");
        fs::write(&src, payload()).unwrap();

        // rename(2) fails with EXDEV here, so this goes through the copy path
        move_file(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), payload());
    }

    #[tokio::test]
    async fn test_failed_copy_keeps_source() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("scan.pdf");
        fs::write(&src, b"pdf").unwrap();
        let dst = temp_dir.path().join("missing-dir/scan.pdf");

        assert!(move_file(&src, &dst).await.is_err());
        assert!(src.exists());
    }

    #[tokio::test]
    async fn test_delete_failure_is_post_upload_error() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("vanished.pdf");

        let err = dispose(&Disposition::Delete, &src).await.unwrap_err();
        assert!(err.is_post_upload());
    }
}
