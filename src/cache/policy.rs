/// Eviction policies
///
/// FIFO and LRU share one removal rule: drop the row with the minimum
/// timestamp. They differ only in whether a read hit refreshes that
/// timestamp, which is the single hook below.
use super::index::MetadataIndex;
use super::types::{Address, Timestamp};
use crate::errors::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CachePolicy {
    /// Evict the entry inserted longest ago
    Fifo,
    /// Evict the entry read or inserted longest ago
    Lru,
}

pub trait EvictionPolicy: Send + Sync {
    /// Called after a lookup found `address` in the index
    fn on_read_hit(
        &self,
        index: &mut dyn MetadataIndex,
        address: &Address,
        now: Timestamp,
    ) -> CacheResult<()>;
}

pub struct FifoPolicy;

pub struct LruPolicy;

impl EvictionPolicy for FifoPolicy {
    fn on_read_hit(
        &self,
        _index: &mut dyn MetadataIndex,
        _address: &Address,
        _now: Timestamp,
    ) -> CacheResult<()> {
        Ok(())
    }
}

impl EvictionPolicy for LruPolicy {
    fn on_read_hit(
        &self,
        index: &mut dyn MetadataIndex,
        address: &Address,
        now: Timestamp,
    ) -> CacheResult<()> {
        index.update_timestamp(address, now)?;
        Ok(())
    }
}

impl CachePolicy {
    pub fn strategy(&self) -> &'static dyn EvictionPolicy {
        match self {
            CachePolicy::Fifo => &FifoPolicy,
            CachePolicy::Lru => &LruPolicy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CachePolicy::Fifo => "FIFO",
            CachePolicy::Lru => "LRU",
        }
    }
}

/// Remove the single entry with the oldest timestamp, whatever the policy
pub fn evict_one(index: &mut dyn MetadataIndex) -> CacheResult<Option<Address>> {
    index.delete_oldest()
}

impl FromStr for CachePolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FIFO" => Ok(CachePolicy::Fifo),
            "LRU" => Ok(CachePolicy::Lru),
            other => Err(CacheError::ConfigInvalid(format!(
                "cache_type must be 'FIFO' or 'LRU', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
