//! Schema Repository
//!
//! Maps schema identifiers onto key-value store operations. Records are
//! immutable: a key can be created, read, listed and deleted, never updated.
//!
//! Every operation runs under a deadline. Dropping an operation's future
//! drops the in-flight store call with it, so a caller that gives up on a
//! request stops the work immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::config::StoreConfig;
use crate::error::{Result, SchemaError};
use crate::key::{KeyPrefix, SchemaIdentifier};
use crate::kv::KvStore;
use crate::schema::{SchemaEnvelope, SchemaRecord, StoredEnvelope};
use crate::version;

/// Repository of versioned configuration schemas
#[derive(Clone)]
pub struct SchemaRepository {
    store: Arc<dyn KvStore>,
    timeout: Duration,
}

impl SchemaRepository {
    /// Wrap a connected store, taking the call deadline from `config`.
    pub fn new(store: Arc<dyn KvStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            timeout: config.operation_timeout(),
        }
    }

    /// Connect to etcd and build a repository over it.
    #[cfg(feature = "etcd")]
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let store = crate::kv::EtcdStore::connect(config).await?;
        Ok(Self::new(Arc::new(store), config))
    }

    /// A copy of this repository with a different per-call deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Store a new schema under `key`.
    ///
    /// Fails with [`SchemaError::Conflict`] if the key already holds a
    /// record; the existing record is left untouched.
    #[instrument(name = "repository.save_schema", skip(self, schema))]
    pub async fn save_schema(&self, key: &str, schema: &str) -> Result<()> {
        SchemaIdentifier::parse(key)?;
        let envelope = StoredEnvelope::seal(schema)?;
        let value = envelope.to_bytes()?;

        let created = self
            .deadline("save_schema", self.store.create(key, value))
            .await??;
        if !created {
            warn!(key, "schema already exists");
            return Err(SchemaError::Conflict {
                key: key.to_string(),
            });
        }
        debug!(key, created_at = %envelope.creation_time, "schema saved");
        Ok(())
    }

    /// Read the schema at `key`. A missing record is `Ok(None)`.
    #[instrument(name = "repository.get_schema", skip(self))]
    pub async fn get_schema(&self, key: &str) -> Result<Option<SchemaEnvelope>> {
        SchemaIdentifier::parse(key)?;
        let value = self.deadline("get_schema", self.store.get(key)).await??;
        match value {
            Some(bytes) => StoredEnvelope::open(&bytes)
                .map(Some)
                .inspect_err(|e| warn!(key, error = %e, "corrupt schema record")),
            None => Ok(None),
        }
    }

    /// Remove the schema at `key`.
    ///
    /// Fails with [`SchemaError::NotFound`] only when the store confirms that
    /// nothing was deleted; transport failures surface as unavailability.
    #[instrument(name = "repository.delete_schema", skip(self))]
    pub async fn delete_schema(&self, key: &str) -> Result<()> {
        SchemaIdentifier::parse(key)?;
        let deleted = self.deadline("delete_schema", self.store.delete(key)).await??;
        if deleted == 0 {
            return Err(SchemaError::NotFound {
                key: key.to_string(),
            });
        }
        debug!(key, "schema deleted");
        Ok(())
    }

    /// List every schema under `prefix`, ascending by version precedence.
    ///
    /// A key under the prefix that does not decode, or a record that does
    /// not open, fails the whole listing.
    #[instrument(name = "repository.list_by_prefix", skip(self))]
    pub async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<SchemaRecord>> {
        let prefix = KeyPrefix::parse(prefix)?;
        let entries = self
            .deadline("list_by_prefix", self.store.get_prefix(&prefix.scan_prefix()))
            .await??;

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = String::from_utf8(entry.key).map_err(|e| {
                SchemaError::malformed(&String::from_utf8_lossy(e.as_bytes()), "key is not UTF-8")
            })?;
            let id = SchemaIdentifier::parse(&key)
                .inspect_err(|_| warn!(key = %key, "undecodable key under prefix"))?;
            if !prefix.matches(&id) {
                continue;
            }
            let envelope = StoredEnvelope::open(&entry.value)
                .inspect_err(|e| warn!(key = %key, error = %e, "corrupt schema record"))?;
            records.push(SchemaRecord {
                schema_details: id,
                schema_data: envelope,
            });
        }

        // Stable sort keeps the store's key order among equal versions.
        records.sort_by(|a, b| version::compare(a.version(), b.version()));
        debug!(count = records.len(), "schemas listed");
        Ok(records)
    }

    /// The highest version under `prefix`, or an empty string when there is
    /// none.
    #[instrument(name = "repository.latest_version", skip(self))]
    pub async fn latest_version(&self, prefix: &str) -> Result<String> {
        let records = self.list_by_prefix(prefix).await?;
        Ok(records
            .last()
            .map(|r| r.version().to_string())
            .unwrap_or_default())
    }

    async fn deadline<F: Future>(&self, operation: &'static str, call: F) -> Result<F::Output> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| SchemaError::Timeout {
                operation,
                after: self.timeout,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn repository() -> (MemoryStore, SchemaRepository) {
        let store = MemoryStore::new();
        let repo = SchemaRepository::new(Arc::new(store.clone()), &StoreConfig::default());
        (store, repo)
    }

    #[tokio::test]
    async fn test_save_rejects_malformed_key() {
        let (store, repo) = repository();
        let err = repo.save_schema("acme/billing", "type: object").await.unwrap_err();
        assert!(matches!(err, SchemaError::MalformedKey { .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_and_delete_reject_malformed_keys() {
        let (store, repo) = repository();
        store.put_raw("acme", "{}").await;

        for key in ["acme", "a//b", "acme/billing/invoice/1.0.0/extra"] {
            let err = repo.get_schema(key).await.unwrap_err();
            assert!(matches!(err, SchemaError::MalformedKey { .. }), "get {key:?}: {err:?}");
            let err = repo.delete_schema(key).await.unwrap_err();
            assert!(matches!(err, SchemaError::MalformedKey { .. }), "delete {key:?}: {err:?}");
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_schema_without_writing() {
        let (store, repo) = repository();
        let err = repo
            .save_schema("acme/billing/invoice/1.0.0", "type: [object")
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_stored_value_is_canonical_envelope() {
        let (store, repo) = repository();
        repo.save_schema("acme/billing/invoice/1.0.0", "type: object\n")
            .await
            .unwrap();
        let raw = store.get("acme/billing/invoice/1.0.0").await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["schema"], r#"{"type":"object"}"#);
        assert!(json["creationTime"].is_string());
    }

    #[tokio::test]
    async fn test_with_timeout_keeps_store() {
        let (_store, repo) = repository();
        repo.save_schema("a/b/c/1.0.0", "type: object").await.unwrap();
        let short = repo.with_timeout(Duration::from_millis(250));
        assert_eq!(short.timeout(), Duration::from_millis(250));
        assert!(short.get_schema("a/b/c/1.0.0").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_skips_sibling_namespaces() {
        let (_store, repo) = repository();
        repo.save_schema("acme/ns/invoice/1.0.0", "type: object").await.unwrap();
        repo.save_schema("acme/ns2/invoice/2.0.0", "type: object").await.unwrap();

        let records = repo.list_by_prefix("acme/ns").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key(), "acme/ns/invoice/1.0.0");
    }

    #[tokio::test]
    async fn test_list_full_key_prefix_is_exact() {
        let (_store, repo) = repository();
        repo.save_schema("acme/ns/invoice/1.0", "type: object").await.unwrap();
        repo.save_schema("acme/ns/invoice/1.0.1", "type: object").await.unwrap();

        let records = repo.list_by_prefix("acme/ns/invoice/1.0").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].version(), "1.0");
    }
}
