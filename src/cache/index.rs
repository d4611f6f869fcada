// Metadata index: address -> last-touch timestamp

use super::types::{format_timestamp, parse_timestamp, Address, CacheEntry, Timestamp};
use crate::errors::{CacheError, CacheResult};
use crate::logger::{self, LogTag};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

/// Durable address → timestamp table
///
/// Every operation is atomic with respect to the index's own storage and none
/// of them touch blob storage. Ties on `touched_at` are broken by insertion
/// order; an upsert counts as a fresh insertion.
pub trait MetadataIndex: Send {
    fn count(&self) -> CacheResult<usize>;

    fn get(&self, address: &Address) -> CacheResult<Option<Timestamp>>;

    /// Insert or overwrite the row for `address`
    fn insert(&mut self, address: &Address, touched_at: Timestamp) -> CacheResult<()>;

    /// Returns whether a row was removed
    fn delete(&mut self, address: &Address) -> CacheResult<bool>;

    /// Remove and return the row with the minimum timestamp
    fn delete_oldest(&mut self) -> CacheResult<Option<Address>>;

    /// Remove and return every row with `touched_at < threshold`
    fn delete_where_older_than(&mut self, threshold: Timestamp) -> CacheResult<Vec<Address>>;

    /// Returns whether a row was updated
    fn update_timestamp(&mut self, address: &Address, touched_at: Timestamp) -> CacheResult<bool>;

    /// All rows, oldest first
    fn entries(&self) -> CacheResult<Vec<CacheEntry>>;

    /// Remove every row and return their addresses
    fn clear(&mut self) -> CacheResult<Vec<Address>>;
}

// =============================================================================
// SQLITE IMPLEMENTATION
// =============================================================================

const SCHEMA_CACHE: &str = r#"
CREATE TABLE IF NOT EXISTS cache (
    name TEXT NOT NULL PRIMARY KEY,
    cache_date DATE
);

CREATE INDEX IF NOT EXISTS idx_cache_date ON cache(cache_date);
"#;

// rowid breaks ties; INSERT OR REPLACE allocates a fresh one
const ORDER_OLDEST_FIRST: &str = "ORDER BY cache_date ASC, rowid ASC";

/// SQLite-backed index holding one long-lived connection
pub struct SqliteIndex {
    conn: Connection,
    location: String,
}

/// Configure the connection for a single local writer
fn configure_connection(conn: &Connection, on_disk: bool) -> rusqlite::Result<()> {
    if on_disk {
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
    }
    conn.busy_timeout(Duration::from_millis(5_000))?;
    Ok(())
}

impl SqliteIndex {
    /// Open (or create) the index file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> CacheResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            CacheError::StorageUnavailable(format!(
                "Failed to open index '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::initialize(conn, path.display().to_string(), true)
    }

    /// Private in-memory index, mostly for tests
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn, ":memory:".to_string(), false)
    }

    fn initialize(conn: Connection, location: String, on_disk: bool) -> CacheResult<Self> {
        configure_connection(&conn, on_disk)?;
        conn.execute_batch(SCHEMA_CACHE)?;

        logger::debug(LogTag::Index, &format!("Index ready at {}", location));

        Ok(Self { conn, location })
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

fn parse_row_date(address: &Address, raw: Option<String>) -> CacheResult<Timestamp> {
    match raw {
        Some(raw) => parse_timestamp(&raw),
        None => Err(CacheError::StorageUnavailable(format!(
            "corrupt index row: {} has no cache_date",
            address
        ))),
    }
}

impl MetadataIndex for SqliteIndex {
    fn count(&self) -> CacheResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn get(&self, address: &Address) -> CacheResult<Option<Timestamp>> {
        let raw: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT cache_date FROM cache WHERE name = ?1",
                params![address.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(date) => parse_row_date(address, date).map(Some),
            None => Ok(None),
        }
    }

    fn insert(&mut self, address: &Address, touched_at: Timestamp) -> CacheResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO cache (name, cache_date) VALUES (?1, ?2)",
            params![address.as_str(), format_timestamp(&touched_at)],
        )?;
        Ok(())
    }

    fn delete(&mut self, address: &Address) -> CacheResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM cache WHERE name = ?1", params![address.as_str()])?;
        Ok(removed > 0)
    }

    fn delete_oldest(&mut self) -> CacheResult<Option<Address>> {
        let tx = self.conn.transaction()?;

        let oldest: Option<String> = tx
            .query_row(
                &format!("SELECT name FROM cache {} LIMIT 1", ORDER_OLDEST_FIRST),
                [],
                |row| row.get(0),
            )
            .optional()?;

        let address = match oldest {
            Some(name) => {
                let address = Address::parse(&name)?;
                tx.execute("DELETE FROM cache WHERE name = ?1", params![name])?;
                Some(address)
            }
            None => None,
        };

        tx.commit()?;
        Ok(address)
    }

    fn delete_where_older_than(&mut self, threshold: Timestamp) -> CacheResult<Vec<Address>> {
        let threshold = format_timestamp(&threshold);
        let tx = self.conn.transaction()?;

        let names: Vec<String> = {
            let mut stmt = tx.prepare(&format!(
                "SELECT name FROM cache WHERE cache_date < ?1 {}",
                ORDER_OLDEST_FIRST
            ))?;
            let rows = stmt.query_map(params![threshold], |row| row.get(0))?;
            rows.collect::<Result<_, _>>()?
        };

        let addresses = names
            .iter()
            .map(|name| Address::parse(name))
            .collect::<CacheResult<Vec<_>>>()?;

        let removed = tx.execute("DELETE FROM cache WHERE cache_date < ?1", params![threshold])?;
        tx.commit()?;

        if removed != addresses.len() {
            logger::warning(
                LogTag::Index,
                &format!(
                    "Expiry removed {} rows but selected {}",
                    removed,
                    addresses.len()
                ),
            );
        }

        Ok(addresses)
    }

    fn update_timestamp(&mut self, address: &Address, touched_at: Timestamp) -> CacheResult<bool> {
        let updated = self.conn.execute(
            "UPDATE cache SET cache_date = ?1 WHERE name = ?2",
            params![format_timestamp(&touched_at), address.as_str()],
        )?;
        Ok(updated > 0)
    }

    fn entries(&self) -> CacheResult<Vec<CacheEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT name, cache_date FROM cache {}",
            ORDER_OLDEST_FIRST
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (name, date) = row?;
            let address = Address::parse(&name)?;
            let touched_at = parse_row_date(&address, date)?;
            entries.push(CacheEntry {
                address,
                touched_at,
            });
        }
        Ok(entries)
    }

    fn clear(&mut self) -> CacheResult<Vec<Address>> {
        let tx = self.conn.transaction()?;

        let names: Vec<String> = {
            let mut stmt = tx.prepare("SELECT name FROM cache")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<Result<_, _>>()?
        };

        tx.execute("DELETE FROM cache", [])?;
        tx.commit()?;

        // Rows that are not addresses have no blob to purge
        Ok(names
            .iter()
            .filter_map(|name| Address::parse(name).ok())
            .collect())
    }
}
