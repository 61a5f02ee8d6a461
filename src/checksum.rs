//! Content hashing for deduplication.
//!
//! Records are serialized with `serde_json` before hashing. JSON objects held
//! as [`serde_json::Value`] keep their keys sorted, so a raw feed object
//! produces the same digest regardless of the key order it arrived in.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Length in bytes of a content checksum.
pub const CHECKSUM_LEN: usize = 32;

/// Compute the SHA-256 digest of a serializable record.
pub fn checksum<T: Serialize + ?Sized>(record: &T) -> Result<[u8; CHECKSUM_LEN], serde_json::Error> {
    let bytes = serde_json::to_vec(record)?;
    Ok(Sha256::digest(&bytes).into())
}

/// Compute the lowercase hex SHA-256 digest of a serializable record.
pub fn checksum_hex<T: Serialize + ?Sized>(record: &T) -> Result<String, serde_json::Error> {
    checksum(record).map(hex::encode)
}
