//! Flat file persistence
//!
//! The service persists three JSON blobs: the fitted model, the training
//! data snapshot and the prediction log. Each is addressed by a [`StoreKey`].
//! Writes replace the whole blob; there is no locking or atomic rename.

mod directory;
mod memory;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// The blobs the service knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Model,
    TrainingData,
    PredictionLog,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::Model, StoreKey::TrainingData, StoreKey::PredictionLog];
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Model => write!(f, "model"),
            StoreKey::TrainingData => write!(f, "training-data"),
            StoreKey::PredictionLog => write!(f, "prediction-log"),
        }
    }
}

/// Keyed blob storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlatFileStore: Send + Sync {
    async fn exists(&self, key: StoreKey) -> Result<bool>;

    /// Read a blob, `None` if it does not exist
    async fn read(&self, key: StoreKey) -> Result<Option<Vec<u8>>>;

    /// Replace a blob
    async fn write(&self, key: StoreKey, bytes: Vec<u8>) -> Result<()>;

    /// Remove a blob; missing blobs are not an error
    async fn delete(&self, key: StoreKey) -> Result<()>;

    /// Human-readable location of a blob, for responses and logs
    fn location(&self, key: StoreKey) -> String;
}
