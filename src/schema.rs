//! Schema records and their persisted envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::error::{Result, SchemaError};
use crate::key::SchemaIdentifier;
use crate::transcode;

/// A schema as handed to callers: human-authored text plus its creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEnvelope {
    /// Schema document in YAML
    pub schema: String,
    /// When the record was first written
    pub creation_time: DateTime<Utc>,
}

/// The value written under a key in the store
///
/// `schema` holds the canonical JSON form. `checksum` is absent on records
/// written by other tools; when present it must match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredEnvelope {
    pub schema: String,
    pub creation_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<Checksum>,
}

impl StoredEnvelope {
    /// Transcode a human-authored schema and stamp it with the current time.
    pub fn seal(human: &str) -> Result<Self> {
        let schema = transcode::to_canonical(human)?;
        let checksum = Checksum::of_canonical(&schema);
        Ok(Self {
            schema,
            creation_time: Utc::now(),
            checksum: Some(checksum),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a stored value, verify it, and transcode the schema back to YAML.
    pub fn open(bytes: &[u8]) -> Result<SchemaEnvelope> {
        let stored: StoredEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| SchemaError::InvalidSchema(format!("corrupt envelope: {}", e)))?;
        if let Some(checksum) = &stored.checksum {
            if !checksum.verify(&stored.schema) {
                return Err(SchemaError::InvalidSchema(format!(
                    "checksum mismatch: expected {}, got {}",
                    checksum,
                    Checksum::of_canonical(&stored.schema)
                )));
            }
        }
        Ok(SchemaEnvelope {
            schema: transcode::to_human(&stored.schema)?,
            creation_time: stored.creation_time,
        })
    }
}

/// One listed schema: its identifier and envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRecord {
    pub schema_details: SchemaIdentifier,
    pub schema_data: SchemaEnvelope,
}

impl SchemaRecord {
    pub fn version(&self) -> &str {
        &self.schema_details.version
    }

    pub fn key(&self) -> String {
        self.schema_details.key()
    }
}
