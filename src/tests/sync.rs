use std::thread;

use crate::{Error, HashIndex, SyncHashIndex, Transactional};

#[test]
fn sync_basic_operations() {
    let index: SyncHashIndex<String, i32> = SyncHashIndex::new();
    assert!(index.is_empty());
    index.insert("a".to_owned(), 1).unwrap();
    index.add("b".to_owned(), 2).unwrap();
    assert_eq!(index.add("b".to_owned(), 3), Err(Error::DuplicateKey));

    assert_eq!(index.get(&"a".to_owned()), Some(1));
    assert!(index.contains_key(&"b".to_owned()));
    assert_eq!(index.remove(&"a".to_owned()), Some(1));
    assert_eq!(index.len(), 1);

    index.clear();
    assert!(index.is_empty());
}

#[test]
fn sync_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SyncHashIndex<String, i32>>();
    assert_send_sync::<HashIndex<String, i32>>();
}

#[test]
fn concurrent_writers() {
    let index: SyncHashIndex<u32, u32> = SyncHashIndex::new();
    thread::scope(|s| {
        for t in 0..4_u32 {
            let index = &index;
            s.spawn(move || {
                for k in 0..250 {
                    index.insert(t * 1000 + k, t).unwrap();
                }
            });
        }
    });
    assert_eq!(index.len(), 1000);
    for t in 0..4 {
        assert_eq!(index.get(&(t * 1000 + 249)), Some(t));
    }
}

#[test]
fn transaction_commits_on_ok() {
    let index: SyncHashIndex<u32, u32> = SyncHashIndex::new();
    let out = index.transaction(|inner| {
        inner.insert(1, 10)?;
        inner.insert(2, 20)?;
        Ok(inner.len())
    });
    assert_eq!(out, Ok(2));
    assert_eq!(index.get(&2), Some(20));
    assert!(!index.lock().in_transaction());
}

#[test]
fn transaction_rolls_back_on_err() {
    let index: SyncHashIndex<u32, u32> = SyncHashIndex::new();
    index.insert(1, 10).unwrap();

    let out: Result<(), Error> = index.transaction(|inner| {
        inner.insert(2, 20)?;
        inner.remove(&1);
        inner.add(2, 30)
    });

    assert_eq!(out, Err(Error::DuplicateKey));
    assert_eq!(index.get(&1), Some(10));
    assert!(!index.contains_key(&2));
    assert!(!index.lock().in_transaction());
}

#[test]
fn snapshot_outlives_the_lock() {
    let index: SyncHashIndex<u32, u32> = SyncHashIndex::new();
    for k in 0..5 {
        index.insert(k, k).unwrap();
    }
    let snapshot = index.snapshot();
    index.clear();
    assert_eq!(snapshot.count(), 5);
}

#[test]
fn wraps_and_unwraps() {
    let mut inner = HashIndex::new();
    inner.insert(1, 1).unwrap();
    let index = SyncHashIndex::from(inner);
    assert_eq!(index.len(), 1);
    let inner = index.into_inner();
    assert_eq!(inner.get(&1), Some(&1));
}
