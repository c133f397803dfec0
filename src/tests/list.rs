use crate::{Config, Error, SegmentedList, Transactional};

/// Chunks of four `i32`s, so the capacity ceiling is 16.
fn small() -> SegmentedList<i32> {
    SegmentedList::with_config(Config::new().with_chunk_bytes(16)).unwrap()
}

fn small_from(values: &[i32]) -> SegmentedList<i32> {
    let mut list = small();
    list.insert_slice(0, values).unwrap();
    list
}

#[test]
fn push_and_grow() {
    let mut list = SegmentedList::new();
    assert_eq!(list.capacity(), 0);
    for v in 0..5 {
        list.push(v).unwrap();
    }
    assert_eq!(list.len(), 5);
    assert_eq!(list.capacity(), 8);
    assert_eq!(list.to_vec(), vec![0, 1, 2, 3, 4]);
    assert_eq!(list.get(5), None);
}

#[test]
fn insert_shifts_across_chunks() {
    let mut list = small_from(&[0, 1, 2, 3, 4, 5, 6]);
    list.insert(1, 100).unwrap();
    assert_eq!(list.to_vec(), vec![0, 100, 1, 2, 3, 4, 5, 6]);
    list.insert(8, 200).unwrap();
    assert_eq!(list[8], 200);
}

#[test]
fn insert_past_end_fails() {
    let mut list = small_from(&[1, 2]);
    assert_eq!(
        list.insert(3, 0),
        Err(Error::IndexOutOfRange { index: 3, len: 2 })
    );
    assert_eq!(list.len(), 2);
}

#[test]
fn insert_slice_in_the_middle() {
    let mut list = small_from(&[1, 2, 3]);
    list.insert_slice(1, &[7, 8, 9, 10, 11]).unwrap();
    assert_eq!(list.to_vec(), vec![1, 7, 8, 9, 10, 11, 2, 3]);
    list.insert_slice(0, &[]).unwrap();
    assert_eq!(list.len(), 8);
}

#[test]
fn remove_at_shifts_down() {
    let mut list = small_from(&[0, 1, 2, 3, 4, 5]);
    assert_eq!(list.remove_at(2), Ok(2));
    assert_eq!(list.to_vec(), vec![0, 1, 3, 4, 5]);
    assert_eq!(
        list.remove_at(5),
        Err(Error::IndexOutOfRange { index: 5, len: 5 })
    );
}

#[test]
fn remove_range_returns_values() {
    let mut list = small_from(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(list.remove_range(2, 5), Ok(vec![2, 3, 4, 5, 6]));
    assert_eq!(list.to_vec(), vec![0, 1, 7, 8]);
    assert_eq!(list.remove_range(0, 0), Ok(Vec::new()));
    assert!(list.remove_range(3, 2).is_err());
}

#[test]
fn set_returns_old() {
    let mut list = small_from(&[1, 2, 3]);
    assert_eq!(list.set(1, 20), Ok(2));
    assert_eq!(list.to_vec(), vec![1, 20, 3]);
    assert!(list.set(3, 0).is_err());
}

#[test]
fn search() {
    let list = small_from(&[4, 5, 6, 5]);
    assert_eq!(list.index_of(&5), Some(1));
    assert!(list.contains(&6));
    assert!(!list.contains(&0));
}

#[test]
fn search_ignores_spare_capacity() {
    let list = small_from(&[4, 5, 6]);
    assert!(list.capacity() > list.len());
    assert!(!list.contains(&0));
}

#[test]
fn clear_empties() {
    let mut list = small_from(&[1, 2, 3]);
    list.clear();
    assert!(list.is_empty());
    list.push(9).unwrap();
    assert_eq!(list.to_vec(), vec![9]);
}

#[test]
fn capacity_ceiling_is_enforced() {
    let mut list = small();
    for v in 0..16 {
        list.push(v).unwrap();
    }
    assert_eq!(list.capacity(), 16);
    assert_eq!(
        list.push(16),
        Err(Error::CapacityExceeded {
            requested: 17,
            ceiling: 16
        })
    );
    assert_eq!(list.len(), 16);
}

#[test]
fn trim_excess_shrinks_backing_store() {
    let mut list = SegmentedList::with_capacity(100).unwrap();
    for v in 0..10 {
        list.push(v).unwrap();
    }
    list.trim_excess().unwrap();
    assert_eq!(list.capacity(), 10);
    assert_eq!(list.to_vec(), (0..10).collect::<Vec<_>>());

    list.trim_excess().unwrap();
    assert_eq!(list.capacity(), 10);
}

#[test]
fn rollback_every_record_kind() {
    let mut list = small_from(&[0, 1, 2, 3, 4, 5]);
    let before = list.to_vec();

    list.begin_transaction();
    list.push(6).unwrap();
    list.insert(0, -1).unwrap();
    list.insert_slice(3, &[7, 8, 9]).unwrap();
    list.remove_at(5).unwrap();
    list.remove_range(1, 3).unwrap();
    list.set(2, 42).unwrap();
    list.rollback_transaction();

    assert_eq!(list.to_vec(), before);
    assert!(!list.in_transaction());
}

#[test]
fn rollback_of_clear_restores_contents() {
    let mut list = small_from(&[1, 2, 3]);
    list.begin_transaction();
    list.clear();
    list.push(10).unwrap();
    list.push(20).unwrap();
    list.rollback_transaction();
    assert_eq!(list.to_vec(), vec![1, 2, 3]);
}

#[test]
fn commit_keeps_changes() {
    let mut list = small_from(&[1]);
    list.begin_transaction();
    list.push(2).unwrap();
    list.commit_transaction();
    list.rollback_transaction();
    assert_eq!(list.to_vec(), vec![1, 2]);
}

#[test]
fn iter_is_double_ended_and_sized() {
    let mut list = small_from(&[1, 2, 3, 4, 5]);
    list.remove_at(4).unwrap();
    assert!(list.capacity() > list.len());

    let iter = list.iter();
    assert_eq!(iter.len(), 4);
    assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
    assert_eq!(list.iter().next_back(), Some(&4));
}
