/// Configuration utilities - loading, materializing defaults, saving
use super::schemas::{ConfigFile, DEFAULT_CONFIG};
use crate::cache::CacheConfiguration;
use crate::errors::{CacheError, CacheResult};
use crate::logger::{self, LogTag};
use std::path::Path;

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "cnb_config.toml";

/// Extension appended to `database_filename` to form the index path
pub const DATABASE_EXTENSION: &str = "sqlite";

/// Load the configuration from `path`, writing the default file first if
/// it does not exist
///
/// # Returns
/// - `Ok(CacheConfiguration)` - validated engine configuration
/// - `Err(CacheError::ConfigInvalid)` - the file is malformed or a field is out of range
/// - `Err(CacheError::StorageUnavailable)` - the file could not be read or created
pub fn load_or_create(path: &Path) -> CacheResult<CacheConfiguration> {
    if !path.exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, writing defaults", path.display()),
        );
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, DEFAULT_CONFIG)?;
        return load_from_str(DEFAULT_CONFIG);
    }

    let contents = std::fs::read_to_string(path)?;
    let config = load_from_str(&contents).map_err(|e| match e {
        CacheError::ConfigInvalid(msg) => {
            CacheError::ConfigInvalid(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    logger::debug(
        LogTag::Config,
        &format!("Loaded configuration from '{}'", path.display()),
    );
    Ok(config)
}

/// Parse and validate configuration text
pub fn load_from_str(contents: &str) -> CacheResult<CacheConfiguration> {
    let file: ConfigFile = toml::from_str(contents)?;
    file.config.to_configuration()
}

/// Write a configuration file to disk
pub fn save(file: &ConfigFile, path: &Path) -> CacheResult<()> {
    let contents = toml::to_string_pretty(file)
        .map_err(|e| CacheError::ConfigInvalid(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
