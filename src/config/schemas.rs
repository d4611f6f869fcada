/// Serde schema for the configuration file
use crate::cache::{lifetime_from_seconds, CacheConfiguration, CachePolicy};
use crate::errors::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Written verbatim when no configuration file exists yet
pub const DEFAULT_CONFIG: &str = r#"[config]
cache_directory = 'cache/'             # created on first use
database_filename = 'cnb'              # index is stored in <database_filename>.sqlite
max_cached_files = 10                  # value in number of files
cached_files_lifetime = 3600           # value in seconds, -1 disables expiry
cache_type = 'FIFO'                    # options are [ 'FIFO', 'LRU' ]
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub config: CacheSection,
}

/// The `[config]` section
///
/// Numeric fields are signed so out-of-range values reach validation and
/// produce a descriptive error instead of a bare parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSection {
    pub cache_directory: String,
    pub database_filename: String,
    pub max_cached_files: i64,
    pub cached_files_lifetime: i64,
    pub cache_type: String,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            cache_directory: "cache/".to_string(),
            database_filename: "cnb".to_string(),
            max_cached_files: 10,
            cached_files_lifetime: 3600,
            cache_type: "FIFO".to_string(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            config: CacheSection::default(),
        }
    }
}

impl CacheSection {
    /// Validate every field and build the engine configuration
    pub fn to_configuration(&self) -> CacheResult<CacheConfiguration> {
        if self.cache_directory.trim().is_empty() {
            return Err(CacheError::ConfigInvalid(
                "cache_directory must not be empty".to_string(),
            ));
        }
        if self.database_filename.trim().is_empty() {
            return Err(CacheError::ConfigInvalid(
                "database_filename must not be empty".to_string(),
            ));
        }
        if self.max_cached_files < 1 {
            return Err(CacheError::ConfigInvalid(format!(
                "max_cached_files must be a positive integer, got {}",
                self.max_cached_files
            )));
        }

        let capacity = usize::try_from(self.max_cached_files).map_err(|_| {
            CacheError::ConfigInvalid(format!(
                "max_cached_files is too large: {}",
                self.max_cached_files
            ))
        })?;
        let ttl = lifetime_from_seconds(self.cached_files_lifetime)?;
        let policy: CachePolicy = self.cache_type.parse()?;

        let config = CacheConfiguration {
            capacity,
            ttl,
            policy,
            cache_directory: PathBuf::from(&self.cache_directory),
            index_path: PathBuf::from(format!(
                "{}.{}",
                self.database_filename,
                super::utils::DATABASE_EXTENSION
            )),
        };
        config.validate()?;
        Ok(config)
    }
}
