//! ChainedHashMap: separate chaining over an arena of entries.
//!
//! Entries live in a generational `SlotMap`. Each bucket stores the arena
//! key of its chain head and each entry stores the arena key of its
//! successor, so unlinking never leaves a dangling link and a stale
//! `Handle` never resolves to a later entry.
//!
//! Every entry caches the `u64` hash of its key. Bucket selection and
//! rehashing use the cached hash only; `K: Hash` is not invoked after
//! insertion.

use crate::config::MapConfig;
use crate::error::Error;
use crate::key::MapKey;
use core::borrow::Borrow;
use core::fmt;
use core::hash::BuildHasher;
use core::mem;
use hashbrown::HashSet;
use log::{debug, trace};
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Hash recorded for the null key. `0 mod capacity` is bucket 0 at every capacity.
const NULL_KEY_HASH: u64 = 0;

/// Stable reference to one entry, valid until that entry is removed.
///
/// Handles survive rehashing because the arena slot does not move when
/// chains are rebuilt. A handle is only meaningful for the map that issued
/// it; resolving it against another map may yield an unrelated entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn key<'a, K, V, S>(&self, map: &'a ChainedHashMap<K, V, S>) -> Option<&'a K> {
        map.slots.get(self.0).map(|e| &e.key)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a ChainedHashMap<K, V, S>) -> Option<&'a V> {
        map.slots.get(self.0).map(|e| &e.value)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut ChainedHashMap<K, V, S>) -> Option<&'a mut V> {
        map.slots.get_mut(self.0).map(|e| &mut e.value)
    }
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    next: Option<DefaultKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    #[error("key is already present")]
    DuplicateKey,
}

#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = RandomState> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>, // chain heads
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    config: MapConfig,
}

#[inline]
fn bucket_of(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// Walks one bucket chain from head to tail.
struct Chain<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    cursor: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (DefaultKey, &'a Entry<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let entry = self.slots.get(slot)?;
        self.cursor = entry.next;
        Some((slot, entry))
    }
}

impl<K, V> ChainedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_config(config: MapConfig) -> Result<Self, Error> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over immutable entries in `ChainedHashMap`, in unspecified order.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over mutable entries in `ChainedHashMap`, in unspecified order.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(MapConfig::new(), hasher)
    }

    pub fn with_config_and_hasher(config: MapConfig, hasher: S) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: MapConfig, hasher: S) -> Self {
        Self {
            hasher,
            buckets: vec![None; config.initial_capacity()],
            slots: SlotMap::with_key(),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// `len / capacity` at this moment.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    fn chain(&self, index: usize) -> Chain<'_, K, V> {
        Chain {
            slots: &self.slots,
            cursor: self.buckets.get(index).copied().flatten(),
        }
    }

    /// Drops every entry and shrinks back to the configured initial capacity.
    ///
    /// Handles obtained before the call stay invalid afterwards. To keep
    /// that guarantee the entry arena is cleared rather than replaced, so
    /// its allocation stays at its peak size and is reused by later inserts.
    pub fn remove_all(&mut self) {
        trace!(
            "remove_all: discarding {} entries across {} buckets",
            self.slots.len(),
            self.buckets.len()
        );
        self.buckets = vec![None; self.config.initial_capacity()];
        self.slots.clear();
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.slots.values().any(|e| e.value == *value)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.slots.values().map(|e| &e.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots.values().map(|e| &e.value)
    }

    /// Removes the entry a handle refers to; `None` if it is already gone.
    pub fn remove_by_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        self.unlink(handle.0).map(|e| (e.key, e.value))
    }

    /// Diagnostic dump: one line per bucket, `key -> value , ` per entry.
    pub fn display(&self) -> BucketDump<'_, K, V, S> {
        BucketDump { map: self }
    }

    /// Detaches `target` from its chain and frees its slot.
    fn unlink(&mut self, target: DefaultKey) -> Option<Entry<K, V>> {
        let index = bucket_of(self.slots.get(target)?.hash, self.buckets.len());
        let head = self.buckets.get(index).copied().flatten()?;

        if head == target {
            let entry = self.slots.remove(target)?;
            self.buckets[index] = entry.next;
            return Some(entry);
        }

        // Look one entry ahead so the predecessor can be relinked.
        let mut current = head;
        while let Some(next) = self.slots.get(current).and_then(|e| e.next) {
            if next == target {
                let entry = self.slots.remove(target)?;
                if let Some(prev) = self.slots.get_mut(current) {
                    prev.next = entry.next;
                }
                return Some(entry);
            }
            current = next;
        }
        None
    }

    /// Appends a fresh entry to the tail of its bucket chain.
    fn link_new(&mut self, entry: Entry<K, V>) -> DefaultKey {
        let index = bucket_of(entry.hash, self.buckets.len());
        let tail = self.chain(index).last().map(|(slot, _)| slot);
        let slot = self.slots.insert(entry);
        match tail.and_then(|t| self.slots.get_mut(t)) {
            Some(last) => last.next = Some(slot),
            None => self.buckets[index] = Some(slot),
        }
        slot
    }

    /// Grows the table if one more entry would break the load-factor threshold.
    ///
    /// At `MAX_BUCKETS` the table stops growing and chains lengthen instead.
    fn reserve_one(&mut self) {
        let capacity = self.buckets.len();
        let prospective = self.slots.len() + 1;
        if self.config.exceeded_by(prospective, capacity) {
            let grown = self.config.grown_capacity(prospective, capacity);
            if grown > capacity {
                self.rehash(grown);
            }
        }
    }

    /// Rebuilds every chain for `new_capacity` buckets and swaps the array in.
    fn rehash(&mut self, new_capacity: usize) {
        let old_capacity = self.buckets.len();

        let mut order = Vec::with_capacity(self.slots.len());
        for index in 0..old_capacity {
            order.extend(self.chain(index).map(|(slot, _)| slot));
        }

        let mut heads: Vec<Option<DefaultKey>> = vec![None; new_capacity];
        let mut tails: Vec<Option<DefaultKey>> = vec![None; new_capacity];
        for slot in order {
            let Some(entry) = self.slots.get_mut(slot) else {
                continue;
            };
            entry.next = None;
            let index = bucket_of(entry.hash, new_capacity);
            match tails[index] {
                Some(tail) => {
                    if let Some(t) = self.slots.get_mut(tail) {
                        t.next = Some(slot);
                    }
                }
                None => heads[index] = Some(slot),
            }
            tails[index] = Some(slot);
        }
        self.buckets = heads;

        debug!(
            "rehashed {} entries: capacity {} -> {}",
            self.slots.len(),
            old_capacity,
            new_capacity
        );
    }

    /// Stores or discards a compute result for an existing entry.
    fn settle(&mut self, slot: DefaultKey, outcome: Option<V>) -> Option<&V> {
        match outcome {
            Some(value) => {
                let entry = self.slots.get_mut(slot)?;
                entry.value = value;
                Some(&entry.value)
            }
            None => {
                self.unlink(slot);
                None
            }
        }
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: MapKey,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + MapKey,
    {
        if q.is_null_key() {
            NULL_KEY_HASH
        } else {
            self.hasher.hash_one(q)
        }
    }

    fn find_slot<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let index = bucket_of(hash, self.buckets.len());
        self.chain(index)
            .find(|(_, e)| e.hash == hash && e.key.borrow() == q)
            .map(|(slot, _)| slot)
    }

    /// Appends an entry for a key known to be absent, growing first if needed.
    fn place(&mut self, hash: u64, key: K, value: V) -> DefaultKey {
        self.reserve_one();
        self.link_new(Entry {
            key,
            value,
            hash,
            next: None,
        })
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + MapKey,
    {
        let slot = self.find_slot(self.make_hash(q), q)?;
        self.slots.get(slot).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + MapKey,
    {
        let slot = self.find_slot(self.make_hash(q), q)?;
        self.slots.get_mut(slot).map(|e| &mut e.value)
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + MapKey,
    {
        self.find_slot(self.make_hash(q), q).map(Handle)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + MapKey,
    {
        self.find_slot(self.make_hash(q), q).is_some()
    }

    /// Inserts or overwrites. Returns the previous value for an existing key.
    ///
    /// Only a new key can trigger a resize; overwriting leaves `len` and
    /// the bucket array untouched.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        if let Some(entry) = self
            .find_slot(hash, &key)
            .and_then(|slot| self.slots.get_mut(slot))
        {
            return Some(mem::replace(&mut entry.value, value));
        }
        self.place(hash, key, value);
        None
    }

    /// Inserts only if `key` is absent, returning `true` when it did.
    pub fn put_if_absent(&mut self, key: K, value: V) -> bool {
        self.try_insert(key, value).is_ok()
    }

    /// Like `put_if_absent`, but hands back a `Handle` to the new entry.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Handle, InsertError> {
        let hash = self.make_hash(&key);
        if self.find_slot(hash, &key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        Ok(Handle(self.place(hash, key, value)))
    }

    /// `put` each pair in order; a later pair overwrites an earlier equal key.
    pub fn put_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + MapKey,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + MapKey,
    {
        let slot = self.find_slot(self.make_hash(q), q)?;
        self.unlink(slot).map(|e| (e.key, e.value))
    }

    /// Overwrites the value of an existing key and returns the old one.
    ///
    /// An absent key is not inserted; `value` is dropped and `None` returned.
    pub fn replace<Q>(&mut self, q: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + MapKey,
    {
        self.get_mut(q).map(|current| mem::replace(current, value))
    }

    /// Recomputes the mapping for `key` from its current value (if any).
    ///
    /// `f` returning `None` removes an existing mapping and is a no-op for
    /// an absent key. `Some(v)` is stored, inserting or overwriting, and a
    /// reference to it is returned. `f` sees only shared references, so a
    /// panic inside it leaves the map unchanged.
    pub fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        let hash = self.make_hash(&key);
        match self.find_slot(hash, &key) {
            Some(slot) => {
                let entry = self.slots.get(slot)?;
                let outcome = f(&entry.key, Some(&entry.value));
                self.settle(slot, outcome)
            }
            None => {
                let value = f(&key, None)?;
                let slot = self.place(hash, key, value);
                self.slots.get(slot).map(|e| &e.value)
            }
        }
    }

    /// Runs `f` only when `q` is present; `None` from `f` removes the mapping.
    pub fn compute_if_present<Q, F>(&mut self, q: &Q, f: F) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + MapKey,
        F: FnOnce(&K, &V) -> Option<V>,
    {
        let slot = self.find_slot(self.make_hash(q), q)?;
        let entry = self.slots.get(slot)?;
        let outcome = f(&entry.key, &entry.value);
        self.settle(slot, outcome)
    }

    /// Runs `f` only when `key` is absent and stores its result.
    ///
    /// The resize check runs before `f`. There is no "no value" escape:
    /// whatever `f` returns is stored. Returns `None` without calling `f`
    /// when the key is already present.
    pub fn compute_if_absent<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(&K) -> V,
    {
        let hash = self.make_hash(&key);
        if self.find_slot(hash, &key).is_some() {
            return None;
        }
        self.reserve_one();
        let value = f(&key);
        let slot = self.link_new(Entry {
            key,
            value,
            hash,
            next: None,
        });
        self.slots.get(slot).map(|e| &e.value)
    }

    /// The set of live keys, unordered.
    pub fn key_set(&self) -> HashSet<&K> {
        self.keys().collect()
    }
}

/// Diagnostic view returned by `ChainedHashMap::display`.
pub struct BucketDump<'a, K, V, S> {
    map: &'a ChainedHashMap<K, V, S>,
}

impl<K, V, S> fmt::Display for BucketDump<'_, K, V, S>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.map.buckets.len() {
            for (_, e) in self.map.chain(index) {
                write!(f, "{} -> {} , ", e.key, e.value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: MapKey,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: MapKey,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.put_all(iter);
        map
    }
}

#[cfg(test)]
impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: MapKey,
    S: BuildHasher,
{
    /// Bucket a key would occupy at the current capacity.
    pub(crate) fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + MapKey,
    {
        bucket_of(self.make_hash(q), self.buckets.len())
    }

    /// Keys in chain order for one bucket.
    pub(crate) fn chain_keys(&self, index: usize) -> Vec<&K> {
        self.chain(index).map(|(_, e)| &e.key).collect()
    }

    /// Panics if any structural invariant is broken.
    pub(crate) fn assert_invariants(&self) {
        let mut reachable = 0;
        for index in 0..self.buckets.len() {
            let chain: Vec<_> = self.chain(index).collect();
            for (i, (_, e)) in chain.iter().enumerate() {
                assert_eq!(
                    bucket_of(e.hash, self.buckets.len()),
                    index,
                    "entry filed under the wrong bucket"
                );
                assert_eq!(e.hash, self.make_hash(&e.key), "cached hash is stale");
                assert!(
                    chain[i + 1..].iter().all(|(_, other)| other.key != e.key),
                    "duplicate key within one chain"
                );
            }
            reachable += chain.len();
        }
        assert_eq!(reachable, self.len(), "len disagrees with reachable entries");
        if self.len() > 0 && self.buckets.len() < crate::config::MAX_BUCKETS {
            assert!(
                !self.config.exceeded_by(self.len(), self.buckets.len()),
                "load factor above threshold"
            );
        }
    }
}
