//! Fast hash map type alias and constructors.
//!
//! Lookup keys in this workspace are short strings (lower-cased paths,
//! origins), which the Fx hash from `rustc-hash` handles well. The input is a
//! local scanner log, so denial-of-service resistance is not a concern.
//!
//! # Examples
//!
//! ```
//! use fm_core::{FxHashMap, fx_hash_map};
//!
//! let mut seen: FxHashMap<String, usize> = fx_hash_map();
//! seen.insert("/app/config.php".to_owned(), 0);
//! assert_eq!(seen.get("/app/config.php"), Some(&0));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new [`FxHashMap`] able to hold `capacity` entries without
/// reallocating.
///
/// The deduplicator sizes its index with this from the record count.
///
/// # Examples
///
/// ```
/// use fm_core::fx_hash_map_with_capacity;
///
/// let map: fm_core::FxHashMap<String, usize> = fx_hash_map_with_capacity(64);
/// assert!(map.capacity() >= 64);
/// ```
#[inline]
#[must_use]
pub fn fx_hash_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
