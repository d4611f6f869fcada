/// Structured error handling for the cache engine
///
/// Every fallible operation in the crate returns `CacheResult<T>`. The three
/// variants are the only kinds a caller needs to branch on:
/// - `NotFound` - a blob or row that was expected to exist is absent
/// - `StorageUnavailable` - the index or filesystem failed for any other reason
/// - `ConfigInvalid` - a configuration field is missing or malformed
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }

    pub fn is_storage_failure(&self) -> bool {
        matches!(self, CacheError::StorageUnavailable(_))
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, CacheError::ConfigInvalid(_))
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(e: rusqlite::Error) -> Self {
        CacheError::StorageUnavailable(format!("index: {}", e))
    }
}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        CacheError::StorageUnavailable(format!("filesystem: {}", e))
    }
}

impl From<toml::de::Error> for CacheError {
    fn from(e: toml::de::Error) -> Self {
        CacheError::ConfigInvalid(e.to_string())
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
