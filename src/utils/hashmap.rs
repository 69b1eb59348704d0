//! Hash-maps and hash-sets used by the per-element caches.
//!
//! Iteration order of these maps is not deterministic, so they are only used
//! for lookups. Anything that is iterated to produce output uses a `Vec` or a
//! `BTreeMap` instead.

pub use hashbrown::hash_map::Entry;

/// Hashmap using [`hashbrown::HashMap`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V>;

/// Hashset using [`hashbrown::HashSet`].
pub type HashSet<K> = hashbrown::HashSet<K>;
