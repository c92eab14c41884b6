//! Filesystem-backed slot store

use crate::error::StorageError;
use crate::store::{validate_slot_name, BlobStore};
use async_trait::async_trait;
use fragdoc_codec::Token;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One file per slot under a root directory
///
/// Saves go through a sibling temp file and a rename, so readers observe
/// either the old token or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding slot files
    root: PathBuf,
    /// Optional directory receiving a downloadable copy of each save
    export_dir: Option<PathBuf>,
}

impl FileStore {
    /// Create store rooted at `root` (created lazily on first save)
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            export_dir: None,
        }
    }

    /// Also copy every saved token into `dir`, best-effort
    #[inline]
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a slot's file
    #[inline]
    #[must_use]
    pub fn slot_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    async fn write_primary(&self, name: &str, token: &Token) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::io_error(&self.root, e))?;

        let target = self.slot_path(name);
        let staging = self.root.join(format!(".{name}.tmp"));

        tokio::fs::write(&staging, token.as_str())
            .await
            .map_err(|e| StorageError::io_error(&staging, e))?;

        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(StorageError::io_error(&target, e));
        }
        Ok(())
    }

    async fn export(&self, name: &str, token: &Token) {
        let Some(dir) = &self.export_dir else {
            return;
        };
        let result = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(dir.join(name), token.as_str()).await
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(slot = name, dir = %dir.display(), error = %e, "export copy skipped");
        }
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn save(&self, name: &str, token: &Token) -> Result<(), StorageError> {
        validate_slot_name(name)?;
        self.write_primary(name, token).await?;
        tracing::debug!(slot = name, root = %self.root.display(), bytes = token.len(), "slot file written");
        self.export(name, token).await;
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<Token, StorageError> {
        validate_slot_name(name)?;
        let path = self.slot_path(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Token::from_raw(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(name)),
            Err(e) => Err(StorageError::io_error(path, e)),
        }
    }

    async fn exists(&self, name: &str) -> bool {
        if validate_slot_name(name).is_err() {
            return false;
        }
        tokio::fs::try_exists(self.slot_path(name))
            .await
            .unwrap_or(false)
    }

    async fn clear(&self, name: &str) -> Result<(), StorageError> {
        validate_slot_name(name)?;
        let path = self.slot_path(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io_error(path, e)),
        }
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("slots"));
        let token = Token::encode("Hello\n[x]");

        store.save("doc.b64", &token).await.unwrap();

        assert!(store.exists("doc.b64").await);
        assert_eq!(store.load("doc.b64").await.unwrap(), token);
        let on_disk = std::fs::read_to_string(store.slot_path("doc.b64")).unwrap();
        assert_eq!(on_disk, token.as_str());
    }

    #[tokio::test]
    async fn file_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(!store.exists("doc.b64").await);
        assert!(store.load("doc.b64").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn file_overwrite_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("doc.b64", &Token::encode("one")).await.unwrap();
        store.save("doc.b64", &Token::encode("two")).await.unwrap();

        assert_eq!(store.load("doc.b64").await.unwrap().decode(), "two");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["doc.b64".to_string()]);
    }

    #[tokio::test]
    async fn file_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("doc.b64", &Token::encode("x")).await.unwrap();
        store.clear("doc.b64").await.unwrap();
        store.clear("doc.b64").await.unwrap();
        assert!(!store.exists("doc.b64").await);
    }

    #[tokio::test]
    async fn export_copy_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("downloads");
        let store = FileStore::new(dir.path().join("slots")).with_export_dir(&export);
        let token = Token::encode("exported");

        store.save("doc.b64", &token).await.unwrap();

        let copy = std::fs::read_to_string(export.join("doc.b64")).unwrap();
        assert_eq!(copy, token.as_str());
    }

    #[tokio::test]
    async fn failed_export_does_not_fail_save() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the export directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();
        let store = FileStore::new(dir.path().join("slots")).with_export_dir(&blocker);

        store.save("doc.b64", &Token::encode("x")).await.unwrap();
        assert_eq!(store.load("doc.b64").await.unwrap().decode(), "x");
    }

    #[tokio::test]
    async fn failed_primary_write_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();
        let store = FileStore::new(&blocker);

        let err = store.save("doc.b64", &Token::encode("x")).await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert!(!store.exists("doc.b64").await);
    }
}
