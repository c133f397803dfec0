//! Key hashing for hash indexes.
//!
//! Hash codes are 31-bit: the 64-bit hash is folded to 32 bits and the sign
//! bit cleared, so bucket arithmetic never sees a negative modulus.

use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// Mask applied to every hash code.
pub const HASH_MASK: u32 = 0x7FFF_FFFF;

/// Deterministic hasher builder used when none is supplied.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// Computes the masked 31-bit hash code of `key`.
#[must_use]
pub fn hash_code<K: Hash + ?Sized, S: BuildHasher>(builder: &S, key: &K) -> u32 {
    let full = builder.hash_one(key);
    ((full ^ (full >> 32)) as u32) & HASH_MASK
}
