//! Schema version ordering
//!
//! Versions are compared by semantic-version precedence, never lexically:
//! `1.10.0` sorts after `1.9.0`. Anything that does not parse as a version
//! sorts below every valid one.

use std::cmp::Ordering;

use semver::Version;

/// A parsed schema version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVersion {
    pub version: Version,
}

impl SchemaVersion {
    /// Parse a version string, accepting an optional leading `v`
    pub fn parse(version_str: &str) -> Result<Self, semver::Error> {
        let version_str = version_str.strip_prefix('v').unwrap_or(version_str);
        Ok(Self {
            version: Version::parse(version_str)?,
        })
    }

    /// Precedence ordering; build metadata is ignored.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        let a = &self.version;
        let b = &other.version;
        a.major
            .cmp(&b.major)
            .then(a.minor.cmp(&b.minor))
            .then(a.patch.cmp(&b.patch))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}

/// Compare two raw version strings by semantic-version precedence.
///
/// Malformed versions compare equal to each other and below any valid
/// version.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (SchemaVersion::parse(a), SchemaVersion::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp_precedence(&b),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}
