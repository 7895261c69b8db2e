//! Memoization of keyword-in-context lookups
//!
//! Users flip between the same handful of keywords and year selections
//! all the time, and the matching snippets never change once the corpus
//! is published, so lookup results are kept around in a bounded
//! least-recently-used cache.

use crate::{kwic::KwicRecord, Year};
use lru::LruCache;
use std::{
    collections::BTreeSet,
    num::NonZeroUsize,
    sync::{Arc, Mutex},
};

/// Canonical identity of one lookup
///
/// Two lookups that ask for the same keyword and the same set of years
/// are the same lookup, no matter how the years were ordered or repeated
/// in the request. Keys are therefore built from a year set, which hands
/// them sorted and deduplicated years.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LookupKey {
    /// Keyword whose contexts were requested
    keyword: Box<str>,

    /// Selected years, in increasing order without duplicates
    ///
    /// Empty means that no year filter was applied.
    years: Box<[Year]>,
}
//
impl LookupKey {
    /// Canonicalize a lookup into its cache identity
    pub fn new(keyword: &str, years: &BTreeSet<Year>) -> Self {
        Self {
            keyword: keyword.into(),
            years: years.iter().copied().collect(),
        }
    }

    /// Selected years, in increasing order without duplicates
    pub fn years(&self) -> &[Year] {
        &self.years
    }
}

/// Bounded cache of lookup results
///
/// Snippet lists are shared, so a hit hands out a cheap clone of the
/// previously fetched list. The cache is guarded by a plain mutex, which
/// is only held for the duration of a map operation and never across an
/// await point.
pub struct LookupCache(Mutex<LruCache<LookupKey, Arc<[KwicRecord]>>>);
//
impl LookupCache {
    /// Set up a cache that remembers at most `capacity` lookups
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self(Mutex::new(LruCache::new(capacity)))
    }

    /// Fetch the memoized result of a lookup, marking it recently used
    pub fn get(&self, key: &LookupKey) -> Option<Arc<[KwicRecord]>> {
        self.lock().get(key).cloned()
    }

    /// Memoize the result of a lookup
    ///
    /// Once the cache is full, the least recently used lookup is evicted
    /// to make room.
    pub fn insert(&self, key: LookupKey, records: Arc<[KwicRecord]>) {
        self.lock().put(key, records);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<LookupKey, Arc<[KwicRecord]>>> {
        self.0.lock().expect("No panics while holding the cache lock")
    }
}
