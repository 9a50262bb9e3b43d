//! Key-value store backends
//!
//! The repository only needs four single-key or prefix operations from a
//! store. Every backend must make `create` atomic: the absence check and the
//! write happen as one operation inside the store.

pub mod memory;
#[cfg(feature = "etcd")]
pub mod etcd;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::SchemaError;

pub use memory::MemoryStore;
#[cfg(feature = "etcd")]
pub use etcd::EtcdStore;

/// Errors reported by a store backend
///
/// "Key absent" is never an error here; it is reported through the return
/// values of the operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// The store could not be reached.
    #[error("connection error: {0}")]
    Unavailable(String),

    /// The store answered with a failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<KvError> for SchemaError {
    fn from(err: KvError) -> Self {
        SchemaError::Unavailable(err.to_string())
    }
}

/// A stored key and its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// Client interface the repository requires of a key-value store
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read one key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Read every key starting with `prefix`, ordered by key.
    async fn get_prefix(&self, prefix: &str) -> Result<Vec<KeyValue>, KvError>;

    /// Write `value` only if `key` is currently absent. Returns `false`
    /// without writing when the key already exists.
    async fn create(&self, key: &str, value: Vec<u8>) -> Result<bool, KvError>;

    /// Remove a key, returning how many records were deleted.
    async fn delete(&self, key: &str) -> Result<u64, KvError>;
}
