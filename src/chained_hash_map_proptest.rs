#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// structural invariants through test-only accessors.

use crate::chained_hash_map::ChainedHashMap;
use crate::config::MapConfig;
use crate::key::MapKey;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl MapKey for Key {}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    PutIfAbsent(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    ContainsValue(i32),
    Replace(usize, i32),
    ComputeAdd(usize, i32),
    ComputeDrop(usize),
    ComputeIfPresent(usize, i32),
    ComputeIfAbsent(usize, i32),
    RemoveAll,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let small = -50i32..50;
        let op = prop_oneof![
            4 => (idx.clone(), small.clone()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => (idx.clone(), small.clone()).prop_map(|(i, v)| OpI::PutIfAbsent(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => small.clone().prop_map(OpI::ContainsValue),
            1 => (idx.clone(), small.clone()).prop_map(|(i, v)| OpI::Replace(i, v)),
            1 => (idx.clone(), small.clone()).prop_map(|(i, d)| OpI::ComputeAdd(i, d)),
            1 => idx.clone().prop_map(OpI::ComputeDrop),
            1 => (idx.clone(), small.clone()).prop_map(|(i, d)| OpI::ComputeIfPresent(i, d)),
            1 => (idx.clone(), small).prop_map(|(i, v)| OpI::ComputeIfAbsent(i, v)),
            1 => Just(OpI::RemoveAll),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Last `put` per key wins; `len` equals the number of distinct live keys.
// - `put_if_absent` and `compute_if_absent` never overwrite and only run
//   their work for absent keys.
// - `remove`/`replace` of absent keys are clean misses.
// - Compute variants insert, update and remove exactly like the model.
// - After every op: chains are well formed, every entry sits in the bucket
//   its cached hash selects, and `len / capacity` respects the threshold.
fn run_state_machine<S: BuildHasher>(
    mut sut: ChainedHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let calls = Cell::new(0u32);

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.put(k.clone(), v), model.insert(k, v));
            }
            OpI::PutIfAbsent(i, v) => {
                let k = key_from(pool, i);
                let absent = !model.contains_key(&k);
                prop_assert_eq!(sut.put_if_absent(k.clone(), v), absent);
                model.entry(k).or_insert(v);
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let before = sut.len();
                let removed = sut.remove(&k);
                prop_assert_eq!(removed, model.remove(&k));
                if removed.is_some() {
                    prop_assert_eq!(sut.len(), before - 1);
                    prop_assert!(sut.get(&k).is_none());
                } else {
                    prop_assert_eq!(sut.len(), before);
                }
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.find(&k).is_some(), model.contains_key(&k));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::ContainsValue(v) => {
                let has_model = model.values().any(|mv| *mv == v);
                prop_assert_eq!(sut.contains_value(&v), has_model);
            }
            OpI::Replace(i, v) => {
                let k = key_from(pool, i);
                let expected = model.get_mut(&k).map(|mv| std::mem::replace(mv, v));
                prop_assert_eq!(sut.replace(&k, v), expected);
            }
            OpI::ComputeAdd(i, d) => {
                let k = key_from(pool, i);
                let next = model.get(&k).copied().unwrap_or(0).saturating_add(d);
                model.insert(k.clone(), next);
                let got = sut
                    .compute(k, |_, v| Some(v.copied().unwrap_or(0).saturating_add(d)))
                    .copied();
                prop_assert_eq!(got, Some(next));
            }
            OpI::ComputeDrop(i) => {
                let k = key_from(pool, i);
                model.remove(&k);
                prop_assert_eq!(sut.compute(k.clone(), |_, _| None), None);
                prop_assert!(!sut.contains_key(&k));
            }
            OpI::ComputeIfPresent(i, d) => {
                let k = key_from(pool, i);
                let before = calls.get();
                // Odd deltas drop the mapping, even ones update it.
                let got = sut
                    .compute_if_present(&k, |_, v| {
                        calls.set(calls.get() + 1);
                        (d % 2 == 0).then(|| v.saturating_add(d))
                    })
                    .copied();
                match model.get(&k).copied() {
                    Some(mv) => {
                        prop_assert_eq!(calls.get(), before + 1);
                        if d % 2 == 0 {
                            let next = mv.saturating_add(d);
                            model.insert(k, next);
                            prop_assert_eq!(got, Some(next));
                        } else {
                            model.remove(&k);
                            prop_assert_eq!(got, None);
                        }
                    }
                    None => {
                        prop_assert_eq!(calls.get(), before, "function must not run");
                        prop_assert_eq!(got, None);
                    }
                }
            }
            OpI::ComputeIfAbsent(i, v) => {
                let k = key_from(pool, i);
                let before = calls.get();
                let present = model.contains_key(&k);
                let got = sut
                    .compute_if_absent(k.clone(), |_| {
                        calls.set(calls.get() + 1);
                        v
                    })
                    .copied();
                if present {
                    prop_assert_eq!(got, None);
                    prop_assert_eq!(calls.get(), before, "function must not run");
                } else {
                    prop_assert_eq!(got, Some(v));
                    prop_assert_eq!(calls.get(), before + 1);
                    model.insert(k, v);
                }
            }
            OpI::RemoveAll => {
                sut.remove_all();
                model.clear();
                prop_assert_eq!(sut.capacity(), sut.config().initial_capacity());
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.keys().cloned().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(&s_keys, &m_keys);
                let set_keys: BTreeSet<_> = sut.key_set().into_iter().cloned().collect();
                prop_assert_eq!(set_keys, m_keys);
            }
        }

        // Post-conditions after each op
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(ChainedHashMap::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress chain walking.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Same invariants under worst-case collision behaviour: every key shares
// one chain, so head/middle/tail splicing is exercised constantly.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(ChainedHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

// Same invariants with a tiny table and a low threshold, so nearly every
// insertion sequence crosses several resizes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_small_table((pool, ops) in arb_scenario()) {
        let config = MapConfig::new().with_initial_capacity(1).with_load_factor(0.5);
        let sut = ChainedHashMap::with_config(config).expect("valid config");
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: across many random insertions spanning multiple resizes, the
// load factor never exceeds 0.75 right after an insertion, capacity only
// doubles, and every key stays retrievable with its last value.
proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn prop_load_factor_bounded(keys in proptest::collection::vec(any::<u32>(), 1..600)) {
        let mut sut: ChainedHashMap<u32, usize> = ChainedHashMap::new();
        let mut model: HashMap<u32, usize> = HashMap::new();
        for (i, k) in keys.iter().copied().enumerate() {
            let before = sut.capacity();
            sut.put(k, i);
            model.insert(k, i);
            prop_assert!(sut.load_factor() <= 0.75, "load factor {} too high", sut.load_factor());
            prop_assert!(sut.capacity() == before || sut.capacity() == before * 2);
        }
        prop_assert_eq!(sut.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
        sut.assert_invariants();
    }
}
