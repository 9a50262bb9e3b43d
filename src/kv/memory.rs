//! In-memory store
//!
//! Used for tests and embedded use. Keys are held in a `BTreeMap` so prefix
//! scans come back in key order, as they do from etcd.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValue, KvError, KvStore};

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw value, replacing whatever is there. Lets tests plant
    /// records the repository itself would never produce.
    pub async fn put_raw(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries.write().await.insert(key.into(), value.into());
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn get_prefix(&self, prefix: &str) -> Result<Vec<KeyValue>, KvError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KeyValue {
                key: key.clone().into_bytes(),
                value: value.clone(),
            })
            .collect())
    }

    async fn create(&self, key: &str, value: Vec<u8>) -> Result<bool, KvError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value);
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<u64, KvError> {
        let removed = self.entries.write().await.remove(key);
        Ok(u64::from(removed.is_some()))
    }
}
