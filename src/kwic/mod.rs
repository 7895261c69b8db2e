//! Keyword-in-context lookups
//!
//! Frequency curves tell how often a keyword was printed, the
//! keyword-in-context table tells where and how. This module resolves a
//! (keyword, years) selection into the matching newspaper snippets,
//! going through a bounded cache before the snippet store and decorating
//! store rows with browsable library viewer links.

pub mod cache;
pub mod store;

use crate::{
    error::{Error, Result},
    Keyword, Year,
};
use cache::{LookupCache, LookupKey};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, num::NonZeroUsize, sync::Arc};
use store::SnippetStore;

/// Origin of the national library's newspaper viewer
///
/// The snippet store records viewer paths only, links handed out to
/// clients are prefixed with this origin.
pub const VIEWER_BASE_URL: &str = "https://digi.kansalliskirjasto.fi";

/// One keyword occurrence, ready for display
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct KwicRecord {
    /// Newspaper the occurrence was printed in
    pub publication: String,

    /// Publication year
    pub year: Year,

    /// Text surrounding the occurrence
    pub context: String,

    /// Absolute link to the scanned page in the library viewer
    pub link: String,
}

/// Resolution of (keyword, years) selections into newspaper snippets
pub struct KwicService {
    /// Snippet store, if one is configured
    store: Option<Arc<dyn SnippetStore>>,

    /// Memoized lookup results
    cache: LookupCache,

    /// Tracked vocabulary, in lexicographic order
    keywords: Arc<[Keyword]>,
}
//
impl KwicService {
    /// Set up the lookup service
    ///
    /// `keywords` is the vocabulary of the frequency dataset, which also
    /// delimits what may be looked up in the snippet store.
    pub fn new(
        store: Option<Arc<dyn SnippetStore>>,
        keywords: Arc<[Keyword]>,
        cache_capacity: NonZeroUsize,
    ) -> Self {
        Self {
            store,
            cache: LookupCache::new(cache_capacity),
            keywords,
        }
    }

    /// Truth that a snippet store is configured
    pub fn store_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Fetch the snippets of one keyword, filtered by a set of years
    ///
    /// An empty year set means no year filter. Results come back sorted
    /// by year, then publication, with viewer links already prefixed.
    /// Identical selections are answered from the cache without touching
    /// the store again.
    pub async fn lookup(&self, keyword: &str, years: &BTreeSet<Year>) -> Result<Arc<[KwicRecord]>> {
        // Only keywords from the tracked vocabulary may reach the store
        let known_keyword = (self.keywords)
            .binary_search_by(|kw| (**kw).cmp(keyword))
            .is_ok();
        if !known_keyword {
            return Err(Error::UnknownKeyword(keyword.into()));
        }
        let store = self.store.as_ref().ok_or(Error::StoreUnavailable)?;

        // Serve memoized results where possible
        let key = LookupKey::new(keyword, years);
        if let Some(records) = self.cache.get(&key) {
            tracing::debug!(keyword, "serving a memoized lookup");
            return Ok(records);
        }

        // Query the store, then dress up its rows for display
        tracing::debug!(keyword, num_years = years.len(), "querying the snippet store");
        let rows = store.fetch(keyword, key.years()).await?;
        let records = (rows.into_iter())
            .map(|row| KwicRecord {
                publication: row.publication,
                year: row.year,
                context: row.context,
                link: format!("{VIEWER_BASE_URL}{}", row.url),
            })
            .collect::<Arc<[KwicRecord]>>();
        self.cache.insert(key, records.clone());
        Ok(records)
    }
}
