use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::types::SearchableItem;

/// Facet constraints. An empty set leaves its dimension unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub categories: HashSet<String>,
    #[serde(default)]
    pub statuses: HashSet<String>,
    #[serde(default)]
    pub types: HashSet<String>,
    #[serde(default)]
    pub authors: HashSet<String>,
    #[serde(default)]
    pub implementors: HashSet<String>,
}

impl SearchFilters {
    /// True when no facet is active.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.statuses.is_empty()
            && self.types.is_empty()
            && self.authors.is_empty()
            && self.implementors.is_empty()
    }

    /// Every active facet must be satisfied by at least one of its values.
    pub fn matches(&self, item: &SearchableItem) -> bool {
        scalar_ok(&self.categories, &item.category)
            && scalar_ok(&self.statuses, &item.status)
            && scalar_ok(&self.types, item.kind.as_str())
            && any_ok(&self.authors, &item.authors)
            && any_ok(&self.implementors, &item.implementors)
    }
}

fn scalar_ok(wanted: &HashSet<String>, value: &str) -> bool {
    wanted.is_empty() || wanted.contains(value)
}

fn any_ok(wanted: &HashSet<String>, values: &[String]) -> bool {
    wanted.is_empty() || values.iter().any(|v| wanted.contains(v))
}
