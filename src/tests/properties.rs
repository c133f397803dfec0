use std::collections::HashMap;

use proptest::prelude::*;

use super::{ConstantState, sorted_entries};
use crate::{Config, HashIndex, SegmentedArray, SegmentedList, Transactional};

#[derive(Debug, Clone)]
enum IndexStep {
    Insert(u8, u16),
    Add(u8, u16),
    Remove(u8),
    Clear,
}

fn index_step() -> impl Strategy<Value = IndexStep> {
    prop_oneof![
        6 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| IndexStep::Insert(k, v)),
        2 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| IndexStep::Add(k, v)),
        4 => any::<u8>().prop_map(IndexStep::Remove),
        1 => Just(IndexStep::Clear),
    ]
}

fn apply<S: std::hash::BuildHasher>(index: &mut HashIndex<u8, u16, S>, step: &IndexStep) {
    match *step {
        IndexStep::Insert(k, v) => {
            index.insert(k, v).unwrap();
        }
        IndexStep::Add(k, v) => {
            let _ = index.add(k, v);
        }
        IndexStep::Remove(k) => {
            index.remove(&k);
        }
        IndexStep::Clear => index.clear(),
    }
}

#[derive(Debug, Clone)]
enum ListStep {
    Push(i16),
    Insert(usize, i16),
    InsertSlice(usize, Vec<i16>),
    RemoveAt(usize),
    RemoveRange(usize, usize),
    Set(usize, i16),
    Clear,
}

fn list_step() -> impl Strategy<Value = ListStep> {
    prop_oneof![
        4 => any::<i16>().prop_map(ListStep::Push),
        3 => (any::<usize>(), any::<i16>()).prop_map(|(i, v)| ListStep::Insert(i, v)),
        2 => (any::<usize>(), proptest::collection::vec(any::<i16>(), 0..6))
            .prop_map(|(i, vs)| ListStep::InsertSlice(i, vs)),
        3 => any::<usize>().prop_map(ListStep::RemoveAt),
        2 => (any::<usize>(), 0_usize..5).prop_map(|(i, n)| ListStep::RemoveRange(i, n)),
        3 => (any::<usize>(), any::<i16>()).prop_map(|(i, v)| ListStep::Set(i, v)),
        1 => Just(ListStep::Clear),
    ]
}

/// Applies `step` to both the list and a `Vec` model, mapping arbitrary
/// indices into range.
fn apply_list(list: &mut SegmentedList<i16>, model: &mut Vec<i16>, step: &ListStep) {
    let len = model.len();
    match step {
        ListStep::Push(v) => {
            list.push(*v).unwrap();
            model.push(*v);
        }
        ListStep::Insert(i, v) => {
            let i = i % (len + 1);
            list.insert(i, *v).unwrap();
            model.insert(i, *v);
        }
        ListStep::InsertSlice(i, vs) => {
            let i = i % (len + 1);
            list.insert_slice(i, vs).unwrap();
            model.splice(i..i, vs.iter().copied());
        }
        ListStep::RemoveAt(i) if len > 0 => {
            let i = i % len;
            assert_eq!(list.remove_at(i).unwrap(), model.remove(i));
        }
        ListStep::RemoveRange(i, n) => {
            let i = i % (len + 1);
            let n = (*n).min(len - i);
            let removed: Vec<i16> = model.drain(i..i + n).collect();
            assert_eq!(list.remove_range(i, n).unwrap(), removed);
        }
        ListStep::Set(i, v) if len > 0 => {
            let i = i % len;
            assert_eq!(list.set(i, *v).unwrap(), model[i]);
            model[i] = *v;
        }
        ListStep::Clear => {
            list.clear();
            model.clear();
        }
        ListStep::RemoveAt(_) | ListStep::Set(..) => {}
    }
}

proptest! {
    #[test]
    fn set_get_survives_resize(
        chunk in 1_usize..9,
        len in 0_usize..64,
        new_len in 0_usize..64,
        seed in any::<u32>(),
    ) {
        let len = len.min(chunk * chunk);
        let new_len = new_len.min(chunk * chunk);
        let mut arr: SegmentedArray<u32> = SegmentedArray::with_chunk_capacity(chunk, len).unwrap();
        for i in 0..len {
            arr.set(i, seed ^ i as u32).unwrap();
        }
        for i in 0..len {
            prop_assert_eq!(arr[i], seed ^ i as u32);
        }
        arr.resize(new_len).unwrap();
        prop_assert_eq!(arr.chunk_count(), new_len.div_ceil(chunk));
        for i in 0..len.min(new_len) {
            prop_assert_eq!(arr[i], seed ^ i as u32);
        }
        for i in len.min(new_len)..new_len {
            prop_assert_eq!(arr[i], 0);
        }
    }

    #[test]
    fn cross_chunk_copy(src_chunk in 5_usize..9, dst_chunk in 5_usize..9, len in 0_usize..=25) {
        let mut src: SegmentedArray<usize> =
            SegmentedArray::with_chunk_capacity(src_chunk, 25).unwrap();
        let mut dst: SegmentedArray<usize> =
            SegmentedArray::with_chunk_capacity(dst_chunk, 25).unwrap();
        for i in 0..25 {
            src[i] = i + 1;
        }
        SegmentedArray::copy(&src, 0, &mut dst, 0, len).unwrap();
        for i in 0..25 {
            let expected = if i < len { i + 1 } else { 0 };
            prop_assert_eq!(dst[i], expected);
        }
        let mut round = vec![0; len];
        dst.copy_to(0, &mut round).unwrap();
        prop_assert_eq!(round, (1..=len).collect::<Vec<_>>());
        src.clear_range(0, len).unwrap();
        prop_assert!(src.iter().take(len).all(|&v| v == 0));
    }

    #[test]
    fn copy_within_matches_slice(
        src in 0_usize..30,
        dst in 0_usize..30,
        count in 0_usize..30,
    ) {
        let count = count.min(30 - src.max(dst));
        let mut arr: SegmentedArray<usize> = SegmentedArray::with_chunk_capacity(6, 30).unwrap();
        let mut model: Vec<usize> = (0..30).collect();
        for i in 0..30 {
            arr[i] = i;
        }
        arr.copy_within(src, dst, count).unwrap();
        model.copy_within(src..src + count, dst);
        prop_assert_eq!(arr.to_vec(), model);
    }

    #[test]
    fn index_matches_model(steps in proptest::collection::vec(index_step(), 0..200)) {
        let mut index: HashIndex<u8, u16> = HashIndex::new();
        let mut model: HashMap<u8, u16> = HashMap::new();
        for step in &steps {
            apply(&mut index, step);
            match *step {
                IndexStep::Insert(k, v) => {
                    model.insert(k, v);
                }
                IndexStep::Add(k, v) => {
                    model.entry(k).or_insert(v);
                }
                IndexStep::Remove(k) => {
                    model.remove(&k);
                }
                IndexStep::Clear => model.clear(),
            }
        }
        prop_assert_eq!(index.len(), model.len());
        for k in 0..=u8::MAX {
            prop_assert_eq!(index.get(&k), model.get(&k));
        }
    }

    #[test]
    fn index_rollback_restores_state(
        setup in proptest::collection::vec(index_step(), 0..60),
        steps in proptest::collection::vec(index_step(), 0..120),
    ) {
        let mut index: HashIndex<u8, u16> = HashIndex::new();
        for step in &setup {
            apply(&mut index, step);
        }
        let before = sorted_entries(&index);

        index.begin_transaction();
        for step in &steps {
            apply(&mut index, step);
        }
        index.rollback_transaction();

        prop_assert_eq!(sorted_entries(&index), before);
    }

    #[test]
    fn colliding_rollback_restores_state(
        steps in proptest::collection::vec(index_step(), 0..80),
    ) {
        let config = Config::new().with_initial_capacity(3);
        let mut index: HashIndex<u8, u16, ConstantState> =
            HashIndex::with_config_and_hasher(config, ConstantState).unwrap();
        for k in 0..10 {
            index.insert(k, u16::from(k)).unwrap();
        }
        let before = sorted_entries(&index);

        index.begin_transaction();
        for step in &steps {
            apply(&mut index, step);
        }
        index.rollback_transaction();

        prop_assert_eq!(sorted_entries(&index), before);
    }

    #[test]
    fn list_matches_model_and_rolls_back(
        setup in proptest::collection::vec(list_step(), 0..30),
        steps in proptest::collection::vec(list_step(), 0..60),
    ) {
        let mut list: SegmentedList<i16> =
            SegmentedList::with_config(Config::new().with_chunk_bytes(64)).unwrap();
        let mut model = Vec::new();
        for step in &setup {
            apply_list(&mut list, &mut model, step);
        }
        prop_assert_eq!(list.to_vec(), model.clone());
        let before = model.clone();

        list.begin_transaction();
        for step in &steps {
            apply_list(&mut list, &mut model, step);
        }
        prop_assert_eq!(list.to_vec(), model);
        list.rollback_transaction();

        prop_assert_eq!(list.to_vec(), before);
    }
}
