use std::path::Path;

use once_cell::sync::OnceCell;

use crate::corpus::{CorpusError, RawCorpus, normalize};
use crate::model::types::{ScoredItem, SearchableItem};
use crate::search::facets::{FacetOptions, filter_options};
use crate::search::filter::SearchFilters;
use crate::search::score::score_item;
use crate::search::sort::{SortOption, sort_items};
use crate::state::{QueryState, RecentItems};

/// Filter, score, sort and cap `items` for one query.
///
/// A blank query keeps every item that passes the filters with score 0;
/// otherwise items scoring 0 are dropped. `limit` truncates after sorting.
pub fn search_items(
    items: &[SearchableItem],
    query: &str,
    filters: &SearchFilters,
    sort: SortOption,
    limit: Option<usize>,
) -> Vec<ScoredItem> {
    let q = query.trim();
    let filtered: Vec<&SearchableItem> =
        items.iter().filter(|item| filters.matches(item)).collect();
    let filtered_count = filtered.len();

    let mut results: Vec<ScoredItem> = if q.is_empty() {
        filtered
            .into_iter()
            .map(|item| ScoredItem::new(item.clone(), 0))
            .collect()
    } else {
        filtered
            .into_iter()
            .filter_map(|item| match score_item(item, q) {
                0 => None,
                score => Some(ScoredItem::new(item.clone(), score)),
            })
            .collect()
    };
    tracing::debug!(
        filtered = filtered_count,
        matched = results.len(),
        "search_ranked"
    );

    sort_items(&mut results, sort);
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    results
}

/// Read-through cache over [`normalize`].
///
/// The raw corpus is normalized on first access and reused until
/// [`CorpusCache::reload`] swaps in a new corpus.
#[derive(Debug, Default)]
pub struct CorpusCache {
    raw: RawCorpus,
    items: OnceCell<Vec<SearchableItem>>,
}

impl CorpusCache {
    pub fn new(raw: RawCorpus) -> Self {
        Self {
            raw,
            items: OnceCell::new(),
        }
    }

    pub fn items(&self) -> Result<&[SearchableItem], CorpusError> {
        self.items
            .get_or_try_init(|| normalize(&self.raw))
            .map(Vec::as_slice)
    }

    pub fn is_loaded(&self) -> bool {
        self.items.get().is_some()
    }

    /// Replace the raw corpus and drop the normalized copy.
    pub fn reload(&mut self, raw: RawCorpus) {
        self.raw = raw;
        self.items = OnceCell::new();
        tracing::debug!("corpus_cache_invalidated");
    }
}

/// Query entry point for callers holding one corpus for a session.
#[derive(Debug, Default)]
pub struct SearchClient {
    cache: CorpusCache,
}

impl SearchClient {
    pub fn new(raw: RawCorpus) -> Self {
        Self {
            cache: CorpusCache::new(raw),
        }
    }

    /// Load the corpus file and normalize it up front so defects surface
    /// before the first query.
    pub fn open(path: &Path) -> Result<Self, CorpusError> {
        let client = Self::new(RawCorpus::load_from(path)?);
        client.items()?;
        Ok(client)
    }

    pub fn items(&self) -> Result<&[SearchableItem], CorpusError> {
        self.cache.items()
    }

    pub fn reload(&mut self, raw: RawCorpus) {
        self.cache.reload(raw);
    }

    pub fn search(
        &self,
        state: &QueryState,
        limit: Option<usize>,
    ) -> Result<Vec<ScoredItem>, CorpusError> {
        let items = self.items()?;
        tracing::debug!(
            query = %state.text,
            sort = %state.sort,
            facets = !state.filters.is_empty(),
            corpus = items.len(),
            "search_start"
        );
        let results = search_items(items, &state.text, &state.filters, state.sort, limit);
        tracing::debug!(returned = results.len(), "search_done");
        Ok(results)
    }

    pub fn facets(&self) -> Result<FacetOptions, CorpusError> {
        Ok(filter_options(self.items()?))
    }

    pub fn find(&self, id: &str) -> Result<Option<&SearchableItem>, CorpusError> {
        Ok(self.items()?.iter().find(|item| item.id == id))
    }

    /// Recent ids resolved against the corpus, most recent first.
    pub fn recent<'a>(
        &'a self,
        recent: &RecentItems,
    ) -> Result<Vec<&'a SearchableItem>, CorpusError> {
        Ok(recent.resolve(self.items()?))
    }
}
