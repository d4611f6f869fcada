/// Cache types shared by the index, the blob store and the engine
use crate::errors::{CacheError, CacheResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in time an entry was inserted or last touched
pub type Timestamp = DateTime<Utc>;

/// Storage format for timestamps: fixed width, so text order is time order
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Second-resolution format accepted when reading older rows
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Content address of a cache key
///
/// Used as the primary key of the metadata index and as the blob file name.
/// Always a non-empty string of ASCII hex digits, so it is safe to join onto
/// the cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub(crate) fn from_hex_digest(digest: String) -> Self {
        Self(digest)
    }

    /// Validate an address read back from storage
    pub fn parse(raw: &str) -> CacheResult<Self> {
        if raw.is_empty() || raw.len() > 128 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CacheError::StorageUnavailable(format!(
                "corrupt index row: '{}' is not a content address",
                raw
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One row of the metadata index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub address: Address,
    pub touched_at: Timestamp,
}

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> CacheResult<Timestamp> {
    let parsed = if raw.contains('.') {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
    } else {
        NaiveDateTime::parse_from_str(raw, LEGACY_TIMESTAMP_FORMAT)
    };

    parsed.map(|naive| naive.and_utc()).map_err(|e| {
        CacheError::StorageUnavailable(format!(
            "corrupt index row: bad cache_date '{}': {}",
            raw, e
        ))
    })
}
