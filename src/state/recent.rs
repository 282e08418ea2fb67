use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::model::types::SearchableItem;

pub const DEFAULT_RECENT_CAPACITY: usize = 5;

/// Most-recent-first list of opened item ids, deduplicated and capped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentItems {
    capacity: usize,
    ids: VecDeque<String>,
}

impl Default for RecentItems {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecentItems {
    /// A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            ids: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move `id` to the front, evicting the oldest entry when full.
    pub fn touch(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.ids.retain(|existing| *existing != id);
        self.ids.push_front(id);
        self.ids.truncate(self.capacity);
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() < before
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Look the ids up in `items`, skipping any no longer in the corpus.
    pub fn resolve<'a>(&self, items: &'a [SearchableItem]) -> Vec<&'a SearchableItem> {
        self.ids
            .iter()
            .filter_map(|id| items.iter().find(|item| item.id == *id))
            .collect()
    }
}
