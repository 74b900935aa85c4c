//! Key-value stores backing the session flag

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// A simple string key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Get the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`, if present
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// JSON file store with atomic writes
#[derive(Debug)]
pub struct FileStore {
    /// Path to the store file
    path: PathBuf,
    /// Current contents (cached)
    values: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store, loading existing contents if the file is present
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::session(format!("Failed to read session file: {e}")))?;
            serde_json::from_str(&contents)
                .map_err(|e| Error::session(format!("Failed to parse session file: {e}")))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, values: &HashMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(values)
            .map_err(|e| Error::session(format!("Failed to serialize session: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::session(format!("Failed to create session directory: {e}"))
                })?;
            }
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::session(format!("Failed to write session file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::session(format!("Failed to rename session file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.to_string());
        self.save(&values).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().await;
        if values.remove(key).is_some() {
            self.save(&values).await?;
        }
        Ok(())
    }
}
