/// Immutable engine configuration
///
/// Built once (usually from the `[config]` section of the TOML file, see
/// `crate::config`) and handed to `CacheEngine` by value.
use super::policy::CachePolicy;
use crate::errors::{CacheError, CacheResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Lifetime value that disables expiry
pub const LIFETIME_DISABLED: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfiguration {
    /// Maximum number of entries held at rest
    pub capacity: usize,

    /// Maximum entry age before an expiry sweep removes it (`None` = never)
    pub ttl: Option<Duration>,

    /// Which operations refresh an entry's timestamp
    pub policy: CachePolicy,

    /// Directory holding one file per cached blob
    pub cache_directory: PathBuf,

    /// SQLite file holding the metadata index
    pub index_path: PathBuf,
}

impl CacheConfiguration {
    /// Defaults matching a freshly materialized config file:
    /// 10 entries, one hour lifetime, FIFO
    pub fn new(cache_directory: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            capacity: 10,
            ttl: Some(Duration::from_secs(3600)),
            policy: CachePolicy::Fifo,
            cache_directory: cache_directory.into(),
            index_path: index_path.into(),
        }
    }

    /// Place both the blobs and the index under `root`
    pub fn in_directory(root: &Path) -> Self {
        Self::new(root.join("blobs"), root.join("index.sqlite"))
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the lifetime in seconds, `-1` disables expiry
    pub fn with_lifetime_seconds(mut self, seconds: i64) -> CacheResult<Self> {
        self.ttl = lifetime_from_seconds(seconds)?;
        Ok(self)
    }

    pub fn ttl_seconds(&self) -> i64 {
        match self.ttl {
            Some(ttl) => ttl.as_secs() as i64,
            None => LIFETIME_DISABLED,
        }
    }

    pub fn validate(&self) -> CacheResult<()> {
        if self.capacity == 0 {
            return Err(CacheError::ConfigInvalid(
                "capacity must be at least 1".to_string(),
            ));
        }
        if let Some(ttl) = self.ttl {
            chrono::Duration::from_std(ttl).map_err(|_| {
                CacheError::ConfigInvalid(format!("lifetime of {}s is out of range", ttl.as_secs()))
            })?;
        }
        if self.cache_directory.as_os_str().is_empty() {
            return Err(CacheError::ConfigInvalid(
                "cache directory must not be empty".to_string(),
            ));
        }
        if self.index_path.as_os_str().is_empty() {
            return Err(CacheError::ConfigInvalid(
                "index location must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Interpret a lifetime in seconds where `-1` means "never expires"
pub fn lifetime_from_seconds(seconds: i64) -> CacheResult<Option<Duration>> {
    match seconds {
        LIFETIME_DISABLED => Ok(None),
        s if s >= 0 => Ok(Some(Duration::from_secs(s as u64))),
        s => Err(CacheError::ConfigInvalid(format!(
            "lifetime must be -1 or a non-negative number of seconds, got {}",
            s
        ))),
    }
}
