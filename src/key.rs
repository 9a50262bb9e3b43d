//! Storage key codec
//!
//! A key is `{organization}/{namespace}/{schema_name}/{version}`. Prefixes are
//! any non-empty leading run of those segments, e.g. `acme/billing`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Separator between key segments
pub const SEPARATOR: char = '/';

/// Number of segments in a full key
pub const SEGMENTS: usize = 4;

/// Structured form of a storage key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaIdentifier {
    pub organization: String,
    pub namespace: String,
    pub schema_name: String,
    pub version: String,
}

impl SchemaIdentifier {
    pub fn new(
        organization: impl Into<String>,
        namespace: impl Into<String>,
        schema_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            namespace: namespace.into(),
            schema_name: schema_name.into(),
            version: version.into(),
        }
    }

    /// Parse a storage key into its four segments.
    pub fn parse(key: &str) -> Result<Self> {
        let segments = split_segments(key)?;
        match <[&str; SEGMENTS]>::try_from(segments) {
            Ok([organization, namespace, schema_name, version]) => {
                Ok(Self::new(organization, namespace, schema_name, version))
            }
            Err(segments) => Err(SchemaError::malformed(
                key,
                format!("expected {} segments, found {}", SEGMENTS, segments.len()),
            )),
        }
    }

    /// Render the storage key for this identifier.
    pub fn key(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.organization,
            self.namespace,
            self.schema_name,
            self.version,
            sep = SEPARATOR
        )
    }

    fn segments(&self) -> [&str; SEGMENTS] {
        [
            &self.organization,
            &self.namespace,
            &self.schema_name,
            &self.version,
        ]
    }
}

impl fmt::Display for SchemaIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for SchemaIdentifier {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A validated listing prefix of one to four leading key segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPrefix {
    segments: Vec<String>,
}

impl KeyPrefix {
    /// Parse a prefix such as `acme/billing`. A single trailing separator is
    /// tolerated.
    pub fn parse(prefix: &str) -> Result<Self> {
        let trimmed = prefix.strip_suffix(SEPARATOR).unwrap_or(prefix);
        let segments = split_segments(trimmed).map_err(|_| {
            SchemaError::malformed(prefix, "prefix segments must be non-empty")
        })?;
        if segments.len() > SEGMENTS {
            return Err(SchemaError::malformed(
                prefix,
                format!("prefix has more than {} segments", SEGMENTS),
            ));
        }
        Ok(Self {
            segments: segments.into_iter().map(String::from).collect(),
        })
    }

    /// Whether this prefix names one complete key.
    pub fn is_full_key(&self) -> bool {
        self.segments.len() == SEGMENTS
    }

    /// The raw string handed to the store's prefix scan.
    ///
    /// Partial prefixes end in the separator so `acme/ns` never picks up
    /// `acme/ns2/...`.
    pub fn scan_prefix(&self) -> String {
        let joined = self.segments.join(&SEPARATOR.to_string());
        if self.is_full_key() {
            joined
        } else {
            format!("{}{}", joined, SEPARATOR)
        }
    }

    /// Whether a decoded identifier lies under this prefix.
    pub fn matches(&self, id: &SchemaIdentifier) -> bool {
        self.segments
            .iter()
            .zip(id.segments())
            .all(|(want, have)| want == have)
    }
}

fn split_segments(raw: &str) -> Result<Vec<&str>> {
    if raw.is_empty() {
        return Err(SchemaError::malformed(raw, "empty key"));
    }
    let segments: Vec<&str> = raw.split(SEPARATOR).collect();
    if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
        return Err(SchemaError::malformed(
            raw,
            format!("segment {} is empty", pos + 1),
        ));
    }
    Ok(segments)
}
