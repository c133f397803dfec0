use std::hash::{BuildHasher, Hasher};

mod list;
mod properties;
mod sampling;
mod sync;

/// Hasher that maps every key to the same code, forcing one chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantHasher;

impl Hasher for ConstantHasher {
    fn finish(&self) -> u64 {
        0x2A
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantState;

impl BuildHasher for ConstantState {
    type Hasher = ConstantHasher;

    fn build_hasher(&self) -> ConstantHasher {
        ConstantHasher
    }
}

/// Sorted `(key, value)` pairs, for order-insensitive comparison.
pub fn sorted_entries<K: Ord + Clone, V: Clone, S>(
    index: &crate::HashIndex<K, V, S>,
) -> Vec<(K, V)> {
    let mut entries: Vec<(K, V)> = index.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}
