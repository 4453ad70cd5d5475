//! chained-collections: hand-built generic containers centred on a
//! separate-chaining hash map with compute-style updates.
//!
//! Internal Design:
//!
//! Summary
//! - ChainedHashMap<K, V, S>: array of bucket heads over an arena of
//!   entries; each bucket is a singly linked chain. Insertions that would
//!   push `len / capacity` past the load factor double the table first.
//! - DoublyLinkedList<T>: arena-backed list; Queue<T> and Stack<T> are
//!   thin adapters over it.
//! - BlockingQueue<T>: bounded, thread-safe Queue behind a mutex and two
//!   condition variables.
//! - The map and the list family are independent of each other.
//!
//! Constraints
//! - ChainedHashMap, DoublyLinkedList, Queue and Stack are single-threaded
//!   containers with no internal synchronization.
//! - No unsafe code. Links are generational `slotmap` keys, so splicing a
//!   chain or list can never leave a dangling reference, and a stale
//!   `Handle` resolves to `None` instead of a newer entry.
//! - Iteration order of the map is unspecified.
//!
//! Hashing and rehashing
//! - Each entry caches the `u64` hash of its key; bucket index is
//!   `hash mod capacity`. Rehashing reuses the cached hashes, builds the
//!   new bucket array from a read-only pass over the old chains, then swaps
//!   it in. `K: Hash` never runs during a rehash.
//! - The null key (see `MapKey`) is a tagged variant pinned to bucket 0.
//!
//! Functional updates
//! - `compute`, `compute_if_present` and `compute_if_absent` take closures.
//!   Closures only receive shared references, so a panicking closure leaves
//!   the map as it was.
//!
//! Errors and logging
//! - Lookups report absence with `Option`; `Error` covers invalid
//!   configuration and out-of-range list positions.
//! - Rehashes are reported at `debug` level through the `log` facade.

pub mod blocking_queue;
pub mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
pub mod error;
pub mod key;
pub mod linked_list;
pub mod queue;
pub mod stack;

// Public surface
pub use blocking_queue::BlockingQueue;
pub use chained_hash_map::{ChainedHashMap, Handle, InsertError};
pub use config::MapConfig;
pub use error::Error;
pub use key::MapKey;
pub use linked_list::DoublyLinkedList;
pub use queue::Queue;
pub use stack::Stack;
