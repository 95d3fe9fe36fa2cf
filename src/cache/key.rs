//! Cache Key Module
//!
//! Turns arbitrary identifiers into fixed-width storage keys.
//!
//! An identifier is first canonicalized into a `serde_json::Value`. Object keys
//! in a `Value` are kept in a sorted map, so two identifiers that differ only in
//! map insertion order canonicalize identically. The canonical JSON bytes are
//! hashed with xxh3 (64 bit) and rendered in radix-36.
//!
//! Collisions are possible and go undetected.

use serde::Serialize;
use serde_json::Value;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::Result;

/// Width of every cache key: the longest `u64` in radix-36.
pub const KEY_WIDTH: usize = 13;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// == Canonicalize ==
/// Converts an identifier into its canonical structured form.
pub fn canonicalize<I: Serialize + ?Sized>(identifier: &I) -> Result<Value> {
    Ok(serde_json::to_value(identifier)?)
}

// == Key From Canonical ==
/// Hashes an already canonical identifier.
pub fn cache_key(canonical: &Value) -> Result<String> {
    let bytes = serde_json::to_vec(canonical)?;
    Ok(to_radix36(xxh3_64(&bytes)))
}

// == Hash Identifier ==
/// Computes the storage key of an identifier.
pub fn hash_identifier<I: Serialize + ?Sized>(identifier: &I) -> Result<String> {
    cache_key(&canonicalize(identifier)?)
}

fn to_radix36(mut n: u64) -> String {
    let mut buf = [b'0'; KEY_WIDTH];
    for slot in buf.iter_mut().rev() {
        *slot = DIGITS[(n % 36) as usize];
        n /= 36;
        if n == 0 {
            break;
        }
    }
    // buf only ever holds ASCII digits
    buf.iter().map(|&b| b as char).collect()
}
