// Local filesystem adapter - File system operations on the host

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }

    /// Regular files found walking `dir_path` down to `max_depth`
    fn walk_files(dir_path: &Path, max_depth: usize) -> Result<Vec<PathBuf>, DomainError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir_path).min_depth(1).max_depth(max_depth) {
            let entry = entry.map_err(|e| {
                DomainError::FsFail(format!("Failed to list {}: {}", dir_path.display(), e))
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError> {
        Ok(dir_path.is_dir())
    }

    async fn list_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>, DomainError> {
        Self::walk_files(dir_path, 1)
    }

    async fn list_files_with_subdirectories(&self, dir_path: &Path) -> Result<Vec<PathBuf>, DomainError> {
        Self::walk_files(dir_path, 2)
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir_path).map_err(|e| {
            DomainError::FsFail(format!("Failed to create directory {}: {}", dir_path.display(), e))
        })
    }

    async fn create_temp_file(&self, dir_path: &Path, prefix: &str, suffix: &str) -> Result<PathBuf, DomainError> {
        let temp_file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp file: {}", e)))?;

        // The caller owns the file from here on and deletes or renames it
        let (_, temp_path) = temp_file
            .keep()
            .map_err(|e| DomainError::FsFail(format!("Failed to keep temp file: {}", e)))?;
        Ok(temp_path)
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        fs::copy(from, to).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to copy file from {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        })?;
        Ok(())
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        fs::rename(from, to).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to move file from {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        })
    }

    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
        match fs::remove_file(file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to delete file {}: {}",
                file_path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_depths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mkv"), b"").unwrap();
        fs::write(dir.path().join("a.mkv"), b"").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a").join("a.srt"), b"").unwrap();
        fs::create_dir_all(dir.path().join("a").join("deep")).unwrap();
        fs::write(dir.path().join("a").join("deep").join("x.srt"), b"").unwrap();

        let fs_port = FsLocalAdapter::new();
        let top = fs_port.list_files(dir.path()).await.unwrap();
        assert_eq!(top, vec![dir.path().join("a.mkv"), dir.path().join("b.mkv")]);

        let nested = fs_port.list_files_with_subdirectories(dir.path()).await.unwrap();
        assert_eq!(nested.len(), 3);
        assert!(nested.contains(&dir.path().join("a").join("a.srt")));
    }

    #[tokio::test]
    async fn test_temp_file_then_move() {
        let dir = tempfile::tempdir().unwrap();
        let fs_port = FsLocalAdapter::new();
        let temp = fs_port.create_temp_file(dir.path(), ".trackmux-", ".mkv").await.unwrap();
        assert!(temp.exists());

        let target = dir.path().join("A.mkv");
        fs_port.move_file(&temp, &target).await.unwrap();
        assert!(target.exists());
        assert!(!temp.exists());

        fs_port.delete_file(&target).await.unwrap();
        fs_port.delete_file(&target).await.unwrap();
        assert!(!target.exists());
    }
}
