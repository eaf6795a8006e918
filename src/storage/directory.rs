//! File-per-key store inside a directory

use super::{FlatFileStore, StoreKey};
use crate::config::StorageConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct DirectoryStore {
    dir: PathBuf,
    model_file: String,
    training_data_file: String,
    log_file: String,
}

impl DirectoryStore {
    /// Open the store, creating the directory if needed
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        let dir = config.resolved_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let store = Self {
            dir,
            model_file: config.model_file.clone(),
            training_data_file: config.training_data_file.clone(),
            log_file: config.log_file.clone(),
        };
        info!("Using storage directory {}", store.dir().display());
        Ok(store)
    }

    /// Open a store with default file names in `dir`
    pub async fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let config = StorageConfig {
            dir: dir.as_ref().to_string_lossy().into_owned(),
            ..Default::default()
        };
        Self::open(&config).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: StoreKey) -> PathBuf {
        let file = match key {
            StoreKey::Model => &self.model_file,
            StoreKey::TrainingData => &self.training_data_file,
            StoreKey::PredictionLog => &self.log_file,
        };
        self.dir.join(file)
    }
}

#[async_trait]
impl FlatFileStore for DirectoryStore {
    async fn exists(&self, key: StoreKey) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path(key)).await?)
    }

    async fn read(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: StoreKey, bytes: Vec<u8>) -> Result<()> {
        let path = self.path(key);
        tokio::fs::write(&path, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    async fn delete(&self, key: StoreKey) -> Result<()> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self, key: StoreKey) -> String {
        self.path(key).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("models").join("trend");

        let store = DirectoryStore::open_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::open_dir(dir.path()).await.unwrap();

        assert!(!store.exists(StoreKey::Model).await.unwrap());
        assert!(store.read(StoreKey::Model).await.unwrap().is_none());

        store.write(StoreKey::Model, b"{}".to_vec()).await.unwrap();
        assert!(store.exists(StoreKey::Model).await.unwrap());
        assert_eq!(store.read(StoreKey::Model).await.unwrap(), Some(b"{}".to_vec()));
        assert!(dir.path().join("model.json").exists());

        store.delete(StoreKey::Model).await.unwrap();
        assert!(!store.exists(StoreKey::Model).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::open_dir(dir.path()).await.unwrap();

        for key in StoreKey::ALL {
            store.delete(key).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_custom_file_names() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            model_file: "m.json".to_string(),
            training_data_file: "t.json".to_string(),
            log_file: "l.json".to_string(),
        };
        let store = DirectoryStore::open(&config).await.unwrap();

        store.write(StoreKey::PredictionLog, b"[]".to_vec()).await.unwrap();
        assert!(dir.path().join("l.json").exists());
        assert!(store.location(StoreKey::TrainingData).ends_with("t.json"));
    }
}
