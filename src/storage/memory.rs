//! In-process store

use super::{FlatFileStore, StoreKey};
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Keeps blobs in memory; contents are lost when dropped
#[derive(Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<StoreKey, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlatFileStore for MemoryStore {
    async fn exists(&self, key: StoreKey) -> Result<bool> {
        Ok(self.blobs.read().contains_key(&key))
    }

    async fn read(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().get(&key).cloned())
    }

    async fn write(&self, key: StoreKey, bytes: Vec<u8>) -> Result<()> {
        self.blobs.write().insert(key, bytes);
        Ok(())
    }

    async fn delete(&self, key: StoreKey) -> Result<()> {
        self.blobs.write().remove(&key);
        Ok(())
    }

    fn location(&self, key: StoreKey) -> String {
        format!("memory://{}", key)
    }
}
