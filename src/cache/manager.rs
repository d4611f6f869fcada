/// Cache engine: capacity, expiry and policy on top of an index and a blob store
///
/// Invariant: a blob exists for an address iff an index row exists for it.
/// Every public operation runs under one engine-wide lock, so the
/// "count, maybe evict, insert" sequence in `put` never races.
///
/// Only one engine may own a given index file and cache directory at a time;
/// there is no cross-process coordination.
use super::clock::{Clock, SystemClock};
use super::config::CacheConfiguration;
use super::hasher::address_of;
use super::index::{MetadataIndex, SqliteIndex};
use super::policy::evict_one;
use super::storage::{BlobStore, FsBlobStore};
use super::types::{Address, CacheEntry, Timestamp};
use crate::errors::{CacheError, CacheResult};
use crate::logger::{self, LogTag};
use chrono::SubsecRound;
use std::sync::{Arc, Mutex, MutexGuard};

struct EngineState<I, B> {
    index: I,
    blobs: B,
    /// Last timestamp handed out from the clock
    last_stamp: Option<Timestamp>,
}

impl<I, B> EngineState<I, B> {
    /// Clock reading that is strictly later than any previous one
    ///
    /// Truncated to the stored precision first, so two stamps never collapse
    /// into the same value once written to the index.
    fn stamp(&mut self, now: Timestamp) -> Timestamp {
        let now = now.trunc_subsecs(6);
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + chrono::Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

pub struct CacheEngine<I = SqliteIndex, B = FsBlobStore> {
    config: CacheConfiguration,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState<I, B>>,
}

impl CacheEngine<SqliteIndex, FsBlobStore> {
    /// Open the SQLite index and blob directory named by `config`
    pub fn open(config: CacheConfiguration) -> CacheResult<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: CacheConfiguration, clock: Arc<dyn Clock>) -> CacheResult<Self> {
        config.validate()?;

        let blobs = FsBlobStore::open(&config.cache_directory)?;
        if let Some(parent) = config
            .index_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)?;
        }
        let index = SqliteIndex::open(&config.index_path)?;

        logger::info(
            LogTag::Cache,
            &format!(
                "Cache opened: {} policy, capacity {}, lifetime {}, blobs in {}",
                config.policy,
                config.capacity,
                describe_lifetime(config.ttl_seconds()),
                config.cache_directory.display()
            ),
        );

        Self::with_parts(config, index, blobs, clock)
    }
}

impl<I: MetadataIndex, B: BlobStore> CacheEngine<I, B> {
    /// Assemble an engine from any index and blob store
    pub fn with_parts(
        config: CacheConfiguration,
        index: I,
        blobs: B,
        clock: Arc<dyn Clock>,
    ) -> CacheResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            state: Mutex::new(EngineState {
                index,
                blobs,
                last_stamp: None,
            }),
        })
    }

    pub fn config(&self) -> &CacheConfiguration {
        &self.config
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, EngineState<I, B>>> {
        self.state
            .lock()
            .map_err(|_| CacheError::StorageUnavailable("cache lock poisoned".to_string()))
    }

    /// Store `data` under `key`, timestamped now
    pub fn put(&self, key: &str, data: &[u8]) -> CacheResult<Address> {
        let mut state = self.lock()?;
        let now = state.stamp(self.clock.now());
        Self::put_locked(&self.config, &mut state, key, data, now)
    }

    /// Store `data` under `key` with an explicit timestamp
    pub fn put_at(&self, key: &str, data: &[u8], at: Timestamp) -> CacheResult<Address> {
        let mut state = self.lock()?;
        Self::put_locked(&self.config, &mut state, key, data, at)
    }

    fn put_locked(
        config: &CacheConfiguration,
        state: &mut EngineState<I, B>,
        key: &str,
        data: &[u8],
        at: Timestamp,
    ) -> CacheResult<Address> {
        // Capacity is enforced before the insert, even when `key` is already cached
        while state.index.count()? >= config.capacity {
            match evict_one(&mut state.index)? {
                Some(victim) => {
                    state.blobs.delete(&victim)?;
                    logger::debug(LogTag::Cache, &format!("Evicted {}", victim));
                }
                None => break,
            }
        }

        let address = address_of(key);
        let existed = state.index.get(&address)?.is_some();

        state.blobs.write(&address, data)?;

        if let Err(e) = state.index.insert(&address, at) {
            if !existed {
                if let Err(cleanup) = state.blobs.delete(&address) {
                    logger::warning(
                        LogTag::Blobs,
                        &format!("Failed to roll back blob {}: {}", address, cleanup),
                    );
                }
            }
            return Err(e);
        }

        logger::debug(
            LogTag::Cache,
            &format!("Stored {} bytes as {}", data.len(), address),
        );
        Ok(address)
    }

    /// Index lookup with the policy's read-hit side effect
    ///
    /// Returns the entry's timestamp after the hook ran. Expiry is not checked
    /// here; stale entries stay visible until `expire_stale` runs.
    pub fn lookup(&self, key: &str) -> CacheResult<Option<Timestamp>> {
        let address = address_of(key);
        let mut state = self.lock()?;

        if state.index.get(&address)?.is_none() {
            return Ok(None);
        }

        let now = state.stamp(self.clock.now());
        self.config
            .policy
            .strategy()
            .on_read_hit(&mut state.index, &address, now)?;

        state.index.get(&address)
    }

    pub fn contains(&self, key: &str) -> CacheResult<bool> {
        Ok(self.lookup(key)?.is_some())
    }

    /// Read the cached bytes for `key`
    ///
    /// Meant to follow a successful `contains`; fails with `NotFound` when the
    /// key was never cached or has since been evicted or expired.
    pub fn get(&self, key: &str) -> CacheResult<Vec<u8>> {
        let address = address_of(key);
        let state = self.lock()?;
        state
            .blobs
            .read(&address)
            .map_err(|e| match e {
                CacheError::NotFound(_) => {
                    CacheError::NotFound(format!("'{}' is not cached ({})", key, address))
                }
                other => other,
            })
    }

    /// Drop the entry for `key`; returns whether one existed
    pub fn remove(&self, key: &str) -> CacheResult<bool> {
        let address = address_of(key);
        let mut state = self.lock()?;

        let removed = state.index.delete(&address)?;
        state.blobs.delete(&address)?;
        Ok(removed)
    }

    /// Remove every entry older than the configured lifetime
    pub fn expire_stale(&self) -> CacheResult<usize> {
        let ttl = match self.config.ttl {
            Some(ttl) => ttl,
            None => return Ok(0),
        };
        let ttl = chrono::Duration::from_std(ttl).map_err(|_| {
            CacheError::ConfigInvalid(format!("lifetime of {}s is out of range", ttl.as_secs()))
        })?;

        let mut state = self.lock()?;
        // A lifetime reaching back past the earliest representable time keeps every row
        let threshold = match self.clock.now().checked_sub_signed(ttl) {
            Some(threshold) => threshold,
            None => return Ok(0),
        };
        let expired = state.index.delete_where_older_than(threshold)?;
        Self::purge_blobs(&mut state.blobs, &expired)?;

        if !expired.is_empty() {
            logger::info(
                LogTag::Cache,
                &format!("Expired {} stale entries", expired.len()),
            );
        }
        Ok(expired.len())
    }

    /// Remove every entry, rows and blobs
    pub fn clear(&self) -> CacheResult<usize> {
        let mut state = self.lock()?;
        let cleared = state.index.clear()?;
        Self::purge_blobs(&mut state.blobs, &cleared)?;

        logger::debug(LogTag::Cache, &format!("Cleared {} entries", cleared.len()));
        Ok(cleared.len())
    }

    pub fn count(&self) -> CacheResult<usize> {
        self.lock()?.index.count()
    }

    /// All entries, oldest first
    pub fn list_entries(&self) -> CacheResult<Vec<CacheEntry>> {
        self.lock()?.index.entries()
    }

    /// Delete blobs whose rows are already gone
    ///
    /// Keeps going after a failure so one bad file does not strand the rest;
    /// the first failure is returned.
    fn purge_blobs(blobs: &mut B, addresses: &[Address]) -> CacheResult<()> {
        let mut first_error = None;
        for address in addresses {
            if let Err(e) = blobs.delete(address) {
                logger::warning(
                    LogTag::Blobs,
                    &format!("Failed to delete blob {}: {}", address, e),
                );
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn describe_lifetime(seconds: i64) -> String {
    if seconds < 0 {
        "unlimited".to_string()
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::cache::policy::CachePolicy;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    struct Harness {
        engine: CacheEngine,
        clock: ManualClock,
        dir: TempDir,
    }

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn setup(capacity: usize, lifetime: i64, policy: CachePolicy) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfiguration::in_directory(dir.path())
            .with_capacity(capacity)
            .with_policy(policy)
            .with_lifetime_seconds(lifetime)
            .unwrap();
        let clock = ManualClock::new(t0());
        let engine = CacheEngine::open_with_clock(config, Arc::new(clock.clone())).unwrap();
        Harness { engine, clock, dir }
    }

    fn blob_count(h: &Harness) -> usize {
        std::fs::read_dir(h.dir.path().join("blobs")).unwrap().count()
    }

    #[test]
    fn test_put_then_get() {
        let h = setup(10, 3600, CachePolicy::Fifo);
        h.engine.put("k", b"hello").unwrap();

        assert!(h.engine.contains("k").unwrap());
        assert_eq!(h.engine.lookup("k").unwrap(), Some(t0()));
        assert_eq!(h.engine.get("k").unwrap(), b"hello");
        assert_eq!(h.engine.count().unwrap(), 1);
    }

    #[test]
    fn test_miss() {
        let h = setup(10, 3600, CachePolicy::Lru);
        assert!(!h.engine.contains("nope").unwrap());
        assert_eq!(h.engine.lookup("nope").unwrap(), None);
        assert!(h.engine.get("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_fifo_eviction_order() {
        let h = setup(2, 3600, CachePolicy::Fifo);
        h.engine.put("a", b"1").unwrap();
        h.engine.put("b", b"2").unwrap();
        // Reads do not protect an entry under FIFO
        assert!(h.engine.contains("a").unwrap());
        h.engine.put("c", b"3").unwrap();

        assert!(!h.engine.contains("a").unwrap());
        assert!(h.engine.contains("b").unwrap());
        assert!(h.engine.contains("c").unwrap());
        assert!(h.engine.get("a").unwrap_err().is_not_found());
        assert_eq!(blob_count(&h), 2);
    }

    #[test]
    fn test_lru_eviction_order() {
        let h = setup(2, 3600, CachePolicy::Lru);
        h.engine.put("a", b"1").unwrap();
        h.engine.put("b", b"2").unwrap();
        assert!(h.engine.contains("a").unwrap());
        h.engine.put("c", b"3").unwrap();

        assert!(!h.engine.contains("b").unwrap());
        assert!(h.engine.contains("a").unwrap());
        assert!(h.engine.contains("c").unwrap());
        assert_eq!(blob_count(&h), 2);
    }

    #[test]
    fn test_lru_refresh_advances_timestamp() {
        let h = setup(5, 3600, CachePolicy::Lru);
        h.engine.put("a", b"1").unwrap();

        h.clock.advance(chrono::Duration::seconds(30));
        let refreshed = h.engine.lookup("a").unwrap().unwrap();
        assert_eq!(refreshed, t0() + chrono::Duration::seconds(30));
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let h = setup(3, -1, CachePolicy::Lru);
        for i in 0..25 {
            h.engine.put(&format!("key-{}", i), b"v").unwrap();
            if i % 3 == 0 {
                let _ = h.engine.contains(&format!("key-{}", i / 2)).unwrap();
            }
            assert!(h.engine.count().unwrap() <= 3);
        }
        assert_eq!(h.engine.count().unwrap(), 3);
        assert_eq!(blob_count(&h), 3);
    }

    #[test]
    fn test_ttl_sweep() {
        let h = setup(10, 5, CachePolicy::Fifo);
        h.engine.put("k", b"v").unwrap();

        h.clock.set(t0() + chrono::Duration::seconds(2));
        assert_eq!(h.engine.expire_stale().unwrap(), 0);
        assert!(h.engine.contains("k").unwrap());

        h.clock.set(t0() + chrono::Duration::seconds(10));
        assert_eq!(h.engine.expire_stale().unwrap(), 1);
        assert_eq!(h.engine.lookup("k").unwrap(), None);
        assert!(h.engine.get("k").unwrap_err().is_not_found());
        assert_eq!(blob_count(&h), 0);
    }

    #[test]
    fn test_stale_until_swept() {
        let h = setup(10, 5, CachePolicy::Fifo);
        h.engine.put("k", b"v").unwrap();

        h.clock.set(t0() + chrono::Duration::seconds(60));
        assert!(h.engine.contains("k").unwrap());
        assert_eq!(h.engine.get("k").unwrap(), b"v");
    }

    #[test]
    fn test_ttl_disabled() {
        let h = setup(10, -1, CachePolicy::Fifo);
        h.engine
            .put_at("ancient", b"v", t0() - chrono::Duration::days(3650))
            .unwrap();

        h.clock.advance(chrono::Duration::days(365));
        assert_eq!(h.engine.expire_stale().unwrap(), 0);
        assert!(h.engine.contains("ancient").unwrap());
    }

    #[test]
    fn test_put_at_uses_given_timestamp() {
        let h = setup(10, 5, CachePolicy::Fifo);
        let old = t0() - chrono::Duration::seconds(100);
        h.engine.put_at("old", b"v", old).unwrap();
        h.engine.put("new", b"v").unwrap();

        assert_eq!(h.engine.lookup("old").unwrap(), Some(old));
        assert_eq!(h.engine.expire_stale().unwrap(), 1);
        assert!(h.engine.contains("new").unwrap());
    }

    #[test]
    fn test_clear_is_idempotent_and_purges_blobs() {
        let h = setup(10, 3600, CachePolicy::Fifo);
        h.engine.put("a", b"1").unwrap();
        h.engine.put("b", b"2").unwrap();

        assert_eq!(h.engine.clear().unwrap(), 2);
        assert_eq!(h.engine.count().unwrap(), 0);
        assert_eq!(blob_count(&h), 0);

        assert_eq!(h.engine.clear().unwrap(), 0);
        assert_eq!(h.engine.count().unwrap(), 0);
    }

    #[test]
    fn test_binary_round_trip() {
        let h = setup(10, 3600, CachePolicy::Fifo);
        let payloads: Vec<Vec<u8>> = vec![
            Vec::new(),
            vec![0, 0, 0],
            b"before\0after".to_vec(),
            (0..=255u8).collect(),
        ];

        for (i, payload) in payloads.iter().enumerate() {
            h.engine.put(&format!("p{}", i), payload).unwrap();
        }
        for (i, payload) in payloads.iter().enumerate() {
            assert_eq!(&h.engine.get(&format!("p{}", i)).unwrap(), payload);
        }
    }

    #[test]
    fn test_reput_overwrites_and_refreshes() {
        let h = setup(10, 3600, CachePolicy::Fifo);
        h.engine.put("k", b"old").unwrap();
        h.engine.put("other", b"x").unwrap();

        h.clock.advance(chrono::Duration::seconds(5));
        h.engine.put("k", b"new").unwrap();

        assert_eq!(h.engine.count().unwrap(), 2);
        assert_eq!(h.engine.get("k").unwrap(), b"new");
        assert_eq!(
            h.engine.lookup("k").unwrap(),
            Some(t0() + chrono::Duration::seconds(5))
        );

        let entries = h.engine.list_entries().unwrap();
        assert_eq!(entries.last().unwrap().address, address_of("k"));
    }

    #[test]
    fn test_reput_at_capacity_still_evicts_first() {
        let h = setup(2, 3600, CachePolicy::Fifo);
        h.engine.put("a", b"1").unwrap();
        h.engine.put("b", b"2").unwrap();

        // The pre-insert check evicts "a" even though "b" is the key being rewritten
        h.engine.put("b", b"3").unwrap();

        assert_eq!(h.engine.count().unwrap(), 1);
        assert!(!h.engine.contains("a").unwrap());
        assert_eq!(h.engine.get("b").unwrap(), b"3");
    }

    #[test]
    fn test_remove() {
        let h = setup(10, 3600, CachePolicy::Fifo);
        h.engine.put("k", b"v").unwrap();

        assert!(h.engine.remove("k").unwrap());
        assert!(!h.engine.remove("k").unwrap());
        assert!(!h.engine.contains("k").unwrap());
        assert_eq!(blob_count(&h), 0);
    }

    #[test]
    fn test_missing_blob_does_not_block_eviction() {
        let h = setup(1, 3600, CachePolicy::Fifo);
        let a = h.engine.put("a", b"1").unwrap();
        std::fs::remove_file(h.dir.path().join("blobs").join(a.as_str())).unwrap();

        h.engine.put("b", b"2").unwrap();
        assert_eq!(h.engine.count().unwrap(), 1);
        assert!(h.engine.contains("b").unwrap());
    }

    #[test]
    fn test_list_entries_oldest_first() {
        let h = setup(10, 3600, CachePolicy::Fifo);
        h.engine.put("first", b"1").unwrap();
        h.engine.put("second", b"2").unwrap();

        let entries = h.engine.list_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].address, address_of("first"));
        assert_eq!(entries[1].address, address_of("second"));
        assert!(entries[0].touched_at < entries[1].touched_at);
    }

    #[test]
    fn test_reopen_with_smaller_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfiguration::in_directory(dir.path()).with_capacity(5);
        {
            let engine = CacheEngine::open(config.clone()).unwrap();
            for key in ["a", "b", "c", "d"] {
                engine.put(key, key.as_bytes()).unwrap();
            }
        }

        let engine = CacheEngine::open(config.with_capacity(2)).unwrap();
        assert_eq!(engine.count().unwrap(), 4);
        engine.put("e", b"e").unwrap();
        assert_eq!(engine.count().unwrap(), 2);
        assert!(engine.contains("d").unwrap());
        assert!(engine.contains("e").unwrap());
    }

    #[test]
    fn test_concurrent_puts_respect_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfiguration::in_directory(dir.path()).with_capacity(4);
        let engine = Arc::new(CacheEngine::open(config).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for i in 0..20 {
                        engine.put(&format!("t{}-{}", t, i), b"v").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.count().unwrap(), 4);
        assert_eq!(
            std::fs::read_dir(dir.path().join("blobs")).unwrap().count(),
            4
        );
    }

    #[test]
    fn test_huge_lifetime_sweep_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = crate::config::load_from_str(
            "[config]\n\
             cache_directory = 'cache/'\n\
             database_filename = 'cnb'\n\
             max_cached_files = 10\n\
             cached_files_lifetime = 9000000000000\n\
             cache_type = 'FIFO'\n",
        )
        .unwrap();
        config.cache_directory = dir.path().join("blobs");
        config.index_path = dir.path().join("index.sqlite");

        let engine = CacheEngine::open_with_clock(config, Arc::new(ManualClock::new(t0()))).unwrap();
        engine.put("k", b"v").unwrap();

        assert_eq!(engine.expire_stale().unwrap(), 0);
        assert!(engine.contains("k").unwrap());
    }

    /// SQLite index whose inserts can be switched to fail
    struct FlakyIndex {
        inner: SqliteIndex,
        fail_inserts: Arc<std::sync::atomic::AtomicBool>,
    }

    impl MetadataIndex for FlakyIndex {
        fn count(&self) -> CacheResult<usize> {
            self.inner.count()
        }

        fn get(&self, address: &Address) -> CacheResult<Option<Timestamp>> {
            self.inner.get(address)
        }

        fn insert(&mut self, address: &Address, touched_at: Timestamp) -> CacheResult<()> {
            if self.fail_inserts.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(CacheError::StorageUnavailable("disk I/O error".to_string()));
            }
            self.inner.insert(address, touched_at)
        }

        fn delete(&mut self, address: &Address) -> CacheResult<bool> {
            self.inner.delete(address)
        }

        fn delete_oldest(&mut self) -> CacheResult<Option<Address>> {
            self.inner.delete_oldest()
        }

        fn delete_where_older_than(&mut self, threshold: Timestamp) -> CacheResult<Vec<Address>> {
            self.inner.delete_where_older_than(threshold)
        }

        fn update_timestamp(&mut self, address: &Address, touched_at: Timestamp) -> CacheResult<bool> {
            self.inner.update_timestamp(address, touched_at)
        }

        fn entries(&self) -> CacheResult<Vec<CacheEntry>> {
            self.inner.entries()
        }

        fn clear(&mut self) -> CacheResult<Vec<Address>> {
            self.inner.clear()
        }
    }

    #[test]
    fn test_failed_insert_rolls_back_new_blob() {
        let dir = tempfile::tempdir().unwrap();
        let fail_inserts = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let index = FlakyIndex {
            inner: SqliteIndex::open_in_memory().unwrap(),
            fail_inserts: Arc::clone(&fail_inserts),
        };
        let blobs = FsBlobStore::open(dir.path().join("blobs")).unwrap();
        let engine = CacheEngine::with_parts(
            CacheConfiguration::in_directory(dir.path()),
            index,
            blobs,
            Arc::new(ManualClock::new(t0())),
        )
        .unwrap();

        engine.put("kept", b"first").unwrap();
        fail_inserts.store(true, std::sync::atomic::Ordering::SeqCst);

        // New key: the blob written before the failed insert is removed again
        let err = engine.put("fresh", b"data").unwrap_err();
        assert!(err.is_storage_failure());
        assert!(!dir.path().join("blobs").join(address_of("fresh").as_str()).exists());
        assert!(!engine.contains("fresh").unwrap());

        // Existing key: the row survives the failed overwrite
        assert!(engine.put("kept", b"second").unwrap_err().is_storage_failure());
        assert_eq!(engine.lookup("kept").unwrap(), Some(t0()));
        assert!(dir.path().join("blobs").join(address_of("kept").as_str()).is_file());
        assert_eq!(engine.count().unwrap(), 1);
    }

    /// Blob store that panics while the engine lock is held
    struct PanickingBlobs;

    impl BlobStore for PanickingBlobs {
        fn write(&mut self, _address: &Address, _data: &[u8]) -> CacheResult<()> {
            panic!("blob write crashed");
        }

        fn read(&self, address: &Address) -> CacheResult<Vec<u8>> {
            Err(CacheError::NotFound(format!("no blob for {}", address)))
        }

        fn delete(&mut self, _address: &Address) -> CacheResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_poisoned_lock_is_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(
            CacheEngine::with_parts(
                CacheConfiguration::in_directory(dir.path()),
                SqliteIndex::open_in_memory().unwrap(),
                PanickingBlobs,
                Arc::new(ManualClock::new(t0())),
            )
            .unwrap(),
        );

        let worker = Arc::clone(&engine);
        let result = std::thread::spawn(move || worker.put("k", b"v")).join();
        assert!(result.is_err());

        assert!(engine.count().unwrap_err().is_storage_failure());
        assert!(engine.contains("k").unwrap_err().is_storage_failure());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfiguration::in_directory(dir.path()).with_capacity(0);
        assert!(CacheEngine::open(config).err().unwrap().is_config_error());
    }
}
