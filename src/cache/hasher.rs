/// Key → content address mapping
use super::types::Address;
use sha2::{Digest, Sha256};

/// Compute the content address of a cache key
///
/// SHA-256 over the UTF-8 bytes of the key, as 64 lowercase hex characters.
pub fn address_of(key: &str) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    Address::from_hex_digest(format!("{:x}", hasher.finalize()))
}
