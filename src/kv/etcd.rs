//! etcd backend

use async_trait::async_trait;
use etcd_client::{Client, Compare, CompareOp, ConnectOptions, GetOptions, KvClient, Txn, TxnOp};
use tracing::info;

use super::{KeyValue, KvError, KvStore};
use crate::config::StoreConfig;

/// etcd-backed store
///
/// The underlying gRPC channel is shared; each call works on a cheap clone
/// of the KV client.
#[derive(Clone)]
pub struct EtcdStore {
    kv: KvClient,
}

impl EtcdStore {
    /// Connect using the endpoints and timeouts in `config`.
    pub async fn connect(config: &StoreConfig) -> Result<Self, KvError> {
        let options = ConnectOptions::new()
            .with_connect_timeout(config.dial_timeout())
            .with_timeout(config.operation_timeout());
        let client = Client::connect(config.endpoints.as_slice(), Some(options))
            .await
            .map_err(classify)?;
        info!(endpoints = ?config.endpoints, "connected to etcd");
        Ok(Self {
            kv: client.kv_client(),
        })
    }
}

fn classify(err: etcd_client::Error) -> KvError {
    match err {
        etcd_client::Error::TransportError(e) => KvError::Unavailable(e.to_string()),
        etcd_client::Error::IoError(e) => KvError::Unavailable(e.to_string()),
        etcd_client::Error::GRpcStatus(status) => KvError::Backend(status.to_string()),
        other => KvError::Backend(other.to_string()),
    }
}

#[async_trait]
impl KvStore for EtcdStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let mut kv = self.kv.clone();
        let response = kv.get(key, None).await.map_err(classify)?;
        Ok(response.kvs().first().map(|kv| kv.value().to_vec()))
    }

    async fn get_prefix(&self, prefix: &str) -> Result<Vec<KeyValue>, KvError> {
        let mut kv = self.kv.clone();
        let response = kv
            .get(prefix, Some(GetOptions::new().with_prefix()))
            .await
            .map_err(classify)?;
        Ok(response
            .kvs()
            .iter()
            .map(|kv| KeyValue {
                key: kv.key().to_vec(),
                value: kv.value().to_vec(),
            })
            .collect())
    }

    async fn create(&self, key: &str, value: Vec<u8>) -> Result<bool, KvError> {
        let mut kv = self.kv.clone();
        // create_revision is 0 only for a key that does not exist
        let txn = Txn::new()
            .when(vec![Compare::create_revision(key, CompareOp::Equal, 0)])
            .and_then(vec![TxnOp::put(key, value, None)]);
        let response = kv.txn(txn).await.map_err(classify)?;
        Ok(response.succeeded())
    }

    async fn delete(&self, key: &str) -> Result<u64, KvError> {
        let mut kv = self.kv.clone();
        let response = kv.delete(key, None).await.map_err(classify)?;
        Ok(u64::try_from(response.deleted()).unwrap_or(0))
    }
}
