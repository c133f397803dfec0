use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::sorted_entries;
use crate::{HashIndex, Transactional};

fn sample() -> HashIndex<u32, u32> {
    (0..20).map(|k| (k, k * 10)).collect()
}

#[test]
fn get_many_skips_misses() {
    let index = sample();
    assert_eq!(index.get_many(&[3, 99, 5, 3]), vec![&30, &50, &30]);
    assert!(index.get_many(&[]).is_empty());
}

#[test]
fn random_key_is_always_live() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut index = sample();
    for k in (0..20).step_by(2) {
        index.remove(&k);
    }
    let mut seen = HashSet::new();
    for _ in 0..500 {
        let key = *index.random_key(&mut rng).unwrap();
        assert!(index.contains_key(&key), "picked removed key {key}");
        seen.insert(key);
    }
    // Every live key is reachable, the last slot included.
    assert_eq!(seen.len(), 10);
}

#[test]
fn random_key_on_empty_index() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut index: HashIndex<u32, u32> = HashIndex::new();
    assert_eq!(index.random_key(&mut rng), None);
    assert_eq!(index.remove_random(&mut rng), None);
    assert_eq!(index.random_unique_key(&mut rng, &HashSet::new()), None);
}

#[test]
fn random_unique_key_avoids_existing() {
    let mut rng = StdRng::seed_from_u64(42);
    let index = sample();
    let existing: HashSet<u32> = (0..19).collect();
    for _ in 0..50 {
        assert_eq!(index.random_unique_key(&mut rng, &existing), Some(&19));
    }

    let all: HashSet<u32> = (0..20).collect();
    assert_eq!(index.random_unique_key(&mut rng, &all), None);
}

#[test]
fn remove_random_drains_the_index() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut index = sample();
    let mut removed = Vec::new();
    while let Some((key, value)) = index.remove_random(&mut rng) {
        assert_eq!(value, key * 10);
        assert!(!index.contains_key(&key));
        removed.push(key);
    }
    removed.sort_unstable();
    assert_eq!(removed, (0..20).collect::<Vec<_>>());
    assert!(index.is_empty());
}

#[test]
fn remove_random_rolls_back() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut index = sample();
    let before = sorted_entries(&index);

    index.begin_transaction();
    for _ in 0..5 {
        assert!(index.remove_random(&mut rng).is_some());
    }
    index.insert(100, 1).unwrap();
    assert_eq!(index.len(), 16);
    index.rollback_transaction();

    assert_eq!(sorted_entries(&index), before);
}

#[test]
fn clone_is_independent() {
    let mut index = sample();
    index.remove(&4);
    let copy = index.clone();
    assert_eq!(sorted_entries(&copy), sorted_entries(&index));
    assert_eq!(copy.capacity(), index.capacity());
    assert_eq!(copy.free_slots(), 1);

    index.insert(4, 0).unwrap();
    index.insert(1, 0).unwrap();
    assert!(!copy.contains_key(&4));
    assert_eq!(copy.get(&1), Some(&10));
}

#[test]
fn clone_inside_transaction_starts_clean() {
    let mut index = sample();
    index.begin_transaction();
    index.insert(50, 50).unwrap();
    let mut copy = index.clone();
    assert!(!copy.in_transaction());
    copy.rollback_transaction();
    assert!(copy.contains_key(&50));

    index.rollback_transaction();
    assert!(!index.contains_key(&50));
}
