//! Local file storage for uploaded book images
//!
//! Files are first written to a staging directory under the uploads root and
//! only moved into place while the database transaction that references them
//! is still open. A failed create therefore leaves nothing behind.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::{DomainError, PendingUploads};
use crate::models::UploadedFile;

const STAGING_DIR: &str = ".staging";

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Write `file` into `dir` under a freshly generated name and return that name.
///
/// The name is a v4 UUID followed by the original extension, lowercased.
/// `dir` is created if it does not exist yet.
pub async fn save(file: &UploadedFile, dir: &Path) -> StorageResult<String> {
    let file_name = match file.extension() {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    };

    fs::create_dir_all(dir).await?;

    let path = dir.join(&file_name);
    let mut out = fs::File::create(&path).await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
    })?;

    out.write_all(&file.data).await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
    })?;

    out.sync_all().await?;

    tracing::debug!(
        path = %path.display(),
        size_bytes = file.size,
        "Upload written"
    );

    Ok(file_name)
}

/// Uploads directory for book images
#[derive(Clone, Debug)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Start a new set of staged files for one create
    pub fn batch(&self) -> StagedBatch {
        StagedBatch {
            store: self.clone(),
            names: Vec::new(),
        }
    }
}

/// Files staged for a single book create
#[derive(Debug)]
pub struct StagedBatch {
    store: UploadStore,
    names: Vec<String>,
}

impl StagedBatch {
    /// Save `file` into the staging directory, returning its final file name
    pub async fn stage(&mut self, file: &UploadedFile) -> StorageResult<String> {
        let name = save(file, &self.store.staging_dir()).await?;
        self.names.push(name.clone());
        Ok(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Remove whatever is still sitting in staging
    pub async fn discard(&self) {
        let staging = self.store.staging_dir();
        for name in &self.names {
            remove_if_present(&staging.join(name)).await;
        }
    }
}

#[async_trait]
impl PendingUploads for StagedBatch {
    async fn promote(&self) -> Result<(), DomainError> {
        let staging = self.store.staging_dir();
        fs::create_dir_all(&self.store.root)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        for (i, name) in self.names.iter().enumerate() {
            if let Err(e) = fs::rename(staging.join(name), self.store.root.join(name)).await {
                // Put back what was already moved so the batch stays whole
                for moved in &self.names[..i] {
                    if let Err(err) =
                        fs::rename(self.store.root.join(moved), staging.join(moved)).await
                    {
                        tracing::error!("Failed to unstage {}: {}", moved, err);
                        remove_if_present(&self.store.root.join(moved)).await;
                    }
                }
                return Err(DomainError::Storage(format!(
                    "Failed to move {} into uploads: {}",
                    name, e
                )));
            }
        }

        Ok(())
    }

    async fn revert(&self) {
        for name in &self.names {
            remove_if_present(&self.store.root.join(name)).await;
        }
    }
}

async fn remove_if_present(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn jpeg(name: &str) -> UploadedFile {
        UploadedFile::new(name, "image/jpeg", Bytes::from_static(b"\xFF\xD8\xFFfake"))
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_keeps_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("books");

        let name = save(&jpeg("Cover.JPG"), &dir).await.expect("save failed");

        assert!(name.ends_with(".jpg"), "unexpected name {}", name);
        assert!(Uuid::parse_str(name.trim_end_matches(".jpg")).is_ok());
        let written = std::fs::read(dir.join(&name)).unwrap();
        assert_eq!(written, b"\xFF\xD8\xFFfake");
    }

    #[tokio::test]
    async fn test_save_generates_distinct_names() {
        let tmp = tempfile::tempdir().unwrap();

        let a = save(&jpeg("same.jpg"), tmp.path()).await.unwrap();
        let b = save(&jpeg("same.jpg"), tmp.path()).await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_save_without_extension() {
        let tmp = tempfile::tempdir().unwrap();

        let name = save(&jpeg("poster"), tmp.path()).await.unwrap();

        assert!(!name.contains('.'));
    }

    #[tokio::test]
    async fn test_promote_moves_staged_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let mut batch = store.batch();

        let name = batch.stage(&jpeg("a.jpg")).await.unwrap();
        assert!(store.staging_dir().join(&name).exists());

        batch.promote().await.expect("promote failed");

        assert!(store.root().join(&name).exists());
        assert!(!store.staging_dir().join(&name).exists());
    }

    #[tokio::test]
    async fn test_discard_and_revert_leave_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());

        let mut staged_only = store.batch();
        let a = staged_only.stage(&jpeg("a.jpg")).await.unwrap();
        staged_only.discard().await;
        assert!(!store.staging_dir().join(&a).exists());

        let mut promoted = store.batch();
        let b = promoted.stage(&jpeg("b.png")).await.unwrap();
        promoted.promote().await.unwrap();
        promoted.revert().await;
        promoted.discard().await;
        assert!(!store.root().join(&b).exists());
        assert!(!store.staging_dir().join(&b).exists());
    }
}
