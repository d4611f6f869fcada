//! Disk-backed blob cache
//!
//! Values are stored one file per entry under the cache directory, named by
//! the SHA-256 address of their key. A SQLite table (`cache`: `name`,
//! `cache_date`) records when each entry was inserted or last touched.
//!
//! - `hasher` - key → address
//! - `index` - the metadata table (`MetadataIndex`, `SqliteIndex`)
//! - `storage` - blob files (`BlobStore`, `FsBlobStore`)
//! - `policy` - FIFO / LRU read-hit behavior and the shared eviction rule
//! - `manager` - `CacheEngine`, the only type callers need
//!
//! ```no_run
//! use cnb::cache::{CacheConfiguration, CacheEngine, CachePolicy};
//!
//! let config = CacheConfiguration::new("cache/", "cnb.sqlite")
//!     .with_capacity(100)
//!     .with_policy(CachePolicy::Lru);
//! let engine = CacheEngine::open(config)?;
//!
//! engine.put("https://example.com/a.json", b"{}")?;
//! if engine.contains("https://example.com/a.json")? {
//!     let bytes = engine.get("https://example.com/a.json")?;
//!     assert_eq!(bytes, b"{}");
//! }
//! engine.expire_stale()?;
//! # Ok::<(), cnb::errors::CacheError>(())
//! ```

pub mod clock;
pub mod config;
pub mod hasher;
pub mod index;
pub mod manager;
pub mod policy;
pub mod storage;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{lifetime_from_seconds, CacheConfiguration, LIFETIME_DISABLED};
pub use hasher::address_of;
pub use index::{MetadataIndex, SqliteIndex};
pub use manager::CacheEngine;
pub use policy::{CachePolicy, EvictionPolicy, FifoPolicy, LruPolicy};
pub use storage::{BlobStore, FsBlobStore};
pub use types::{Address, CacheEntry, Timestamp};
