// Blob storage: one file per cached value, named by its address

use super::types::Address;
use crate::errors::{CacheError, CacheResult};
use crate::logger::{self, LogTag};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub trait BlobStore: Send {
    /// Create or overwrite the blob for `address`
    fn write(&mut self, address: &Address, data: &[u8]) -> CacheResult<()>;

    /// Fails with `NotFound` if no blob exists
    fn read(&self, address: &Address) -> CacheResult<Vec<u8>>;

    /// Returns whether a blob was removed; a missing blob is not an error
    fn delete(&mut self, address: &Address) -> CacheResult<bool>;
}

/// Filesystem-backed blob store
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    directory: PathBuf,
}

impl FsBlobStore {
    /// Use `directory` for blobs, creating it if needed
    pub fn open<P: AsRef<Path>>(directory: P) -> CacheResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|e| {
            CacheError::StorageUnavailable(format!(
                "Failed to create cache directory '{}': {}",
                directory.display(),
                e
            ))
        })?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, address: &Address) -> PathBuf {
        self.directory.join(address.as_str())
    }

    fn temp_path_for(&self, address: &Address) -> PathBuf {
        self.directory.join(format!("{}.tmp", address))
    }
}

impl BlobStore for FsBlobStore {
    fn write(&mut self, address: &Address, data: &[u8]) -> CacheResult<()> {
        let path = self.path_for(address);
        let tmp = self.temp_path_for(address);

        // Readers only ever see a complete file
        if let Err(e) = fs::write(&tmp, data) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        logger::verbose(
            LogTag::Blobs,
            &format!("Wrote {} bytes to {}", data.len(), path.display()),
        );
        Ok(())
    }

    fn read(&self, address: &Address) -> CacheResult<Vec<u8>> {
        match fs::read(self.path_for(address)) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CacheError::NotFound(format!("no blob for {}", address)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&mut self, address: &Address) -> CacheResult<bool> {
        match fs::remove_file(self.path_for(address)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
