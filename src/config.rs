//! Configuration file handling
//!
//! The on-disk format is a TOML document with a single `[config]` section:
//!
//! ```toml
//! [config]
//! cache_directory = 'cache/'
//! database_filename = 'cnb'
//! max_cached_files = 10
//! cached_files_lifetime = 3600
//! cache_type = 'FIFO'
//! ```
//!
//! - `schemas` - serde structs for the file and their defaults
//! - `utils` - loading, materializing defaults, saving
//!
//! The result of loading is a plain `CacheConfiguration` value; nothing here
//! keeps global state.

pub mod schemas;
pub mod utils;

pub use schemas::{CacheSection, ConfigFile, DEFAULT_CONFIG};
pub use utils::{load_from_str, load_or_create, save, CONFIG_FILE_PATH, DATABASE_EXTENSION};
