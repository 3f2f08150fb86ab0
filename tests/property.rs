//! Property-based tests for palimpsest
//!
//! Uses proptest to verify the selection heap and the chained index against
//! reference models across randomly generated inputs.

use palimpsest::{ChainedIndex, SelectionHeap};
use proptest::prelude::*;
use std::collections::HashMap;

/// Reference ordering for heap output: weight descending, label ascending
fn reference_sort(mut pairs: Vec<(String, i64)>) -> Vec<(String, i64)> {
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

fn label_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn heap_full_drain_matches_reference_sort(
        pairs in prop::collection::vec((label_strategy(), any::<i64>()), 0..64)
    ) {
        let mut heap = SelectionHeap::new();
        for (label, weight) in &pairs {
            heap.push(label.clone(), *weight);
        }

        let drained: Vec<(String, i64)> = heap
            .drain_top(pairs.len())
            .into_iter()
            .map(|e| (e.label, e.weight))
            .collect();

        prop_assert_eq!(drained, reference_sort(pairs));
    }

    #[test]
    fn heap_partial_drain_is_prefix_of_full_sort(
        pairs in prop::collection::vec((label_strategy(), any::<i64>()), 1..64),
        k in 0usize..64
    ) {
        let k = k % (pairs.len() + 1);

        let mut heap = SelectionHeap::new();
        for (label, weight) in &pairs {
            heap.push(label.clone(), *weight);
        }

        let top_k: Vec<(String, i64)> = heap
            .drain_top(k)
            .into_iter()
            .map(|e| (e.label, e.weight))
            .collect();

        let reference = reference_sort(pairs);
        prop_assert_eq!(top_k.len(), k);
        prop_assert_eq!(&top_k[..], &reference[..k]);
    }

    #[test]
    fn heap_pop_sequence_is_monotone(
        pairs in prop::collection::vec((label_strategy(), any::<i64>()), 1..64)
    ) {
        let mut heap = SelectionHeap::new();
        for (label, weight) in pairs {
            heap.push(label, weight);
        }

        let mut previous: Option<i64> = None;
        while let Some(entry) = heap.pop() {
            if let Some(prev) = previous {
                prop_assert!(entry.weight <= prev);
            }
            previous = Some(entry.weight);
        }
    }

    #[test]
    fn index_agrees_with_hashmap_model(
        ops in prop::collection::vec((any::<bool>(), 0u64..32, any::<u16>()), 0..256),
        buckets in 1usize..64
    ) {
        let mut index: ChainedIndex<u64, u16> = ChainedIndex::with_buckets(buckets);
        let mut model: HashMap<u64, u16> = HashMap::new();

        for (is_insert, key, value) in ops {
            if is_insert {
                index.insert(key, value);
                model.insert(key, value);
            } else {
                let erased = index.erase(&key);
                prop_assert_eq!(erased, model.remove(&key).is_some());
            }
        }

        prop_assert_eq!(index.len(), model.len());
        for key in 0u64..32 {
            prop_assert_eq!(index.find(&key), model.get(&key));
        }
    }

    #[test]
    fn string_keys_round_trip_any_bucket_count(
        keys in prop::collection::hash_set("[a-zA-Z0-9_.-]{0,16}", 0..32),
        buckets in 1usize..64
    ) {
        let mut index: ChainedIndex<String, usize> = ChainedIndex::with_buckets(buckets);

        let keys: Vec<String> = keys.into_iter().collect();
        for (i, key) in keys.iter().enumerate() {
            index.insert(key.clone(), i);
        }

        prop_assert_eq!(index.len(), keys.len());
        for (i, key) in keys.iter().enumerate() {
            prop_assert_eq!(index.find(key), Some(&i));
        }
    }
}
