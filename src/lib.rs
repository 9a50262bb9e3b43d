//! Config Schema Store
//!
//! A versioned, immutable store for configuration schemas, kept in a
//! hierarchical namespace on top of a distributed key-value store.
//!
//! ## Features
//!
//! - **Immutable Records**: a key is written once; saving over it is a conflict
//! - **Atomic Creation**: the existence check and the write are one store transaction
//! - **Semantic Versioning**: listings are ordered by semver precedence, not lexically
//! - **Transcoding**: schemas are authored in YAML and stored as canonical JSON
//! - **Checksum Validation**: SHA256 checksums catch corrupted records on read
//!
//! ## Layout
//!
//! ```text
//! {organization}/{namespace}/{schema_name}/{version}
//! acme/billing/invoice/1.2.0  ->  {"schema": "{...}", "creationTime": "...", "checksum": "..."}
//! acme/billing/invoice/1.10.0 ->  ...
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod key;
pub mod kv;
pub mod repository;
pub mod schema;
pub mod transcode;
pub mod version;

pub use checksum::Checksum;
pub use config::{AppConfig, StoreConfig};
pub use error::{Result, SchemaError};
pub use key::{KeyPrefix, SchemaIdentifier};
pub use kv::{KeyValue, KvError, KvStore, MemoryStore};
#[cfg(feature = "etcd")]
pub use kv::EtcdStore;
pub use repository::SchemaRepository;
pub use schema::{SchemaEnvelope, SchemaRecord};
pub use version::SchemaVersion;
