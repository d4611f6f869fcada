pub mod cache;
pub mod config;
pub mod errors; // Structured error handling
pub mod logger;

pub use cache::{CacheConfiguration, CacheEngine, CachePolicy};
pub use errors::{CacheError, CacheResult};
