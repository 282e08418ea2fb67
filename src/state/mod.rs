//! Caller-owned state passed into the search layer on every call.

mod recent;

pub use recent::{DEFAULT_RECENT_CAPACITY, RecentItems};

use serde::{Deserialize, Serialize};

use crate::search::{SearchFilters, SortOption};

/// Query text, facet selections and sort order captured by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub sort: SortOption,
}

impl QueryState {
    /// Build from decoded query-string pairs (`q`, `category`, `status`,
    /// `type`, `author`, `implementor`, `sort`).
    ///
    /// Multi-valued keys are comma separated. Unknown keys are ignored and
    /// an unknown sort falls back to the default.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = Self::default();
        for (key, value) in params {
            match key {
                "q" => state.text = value.to_string(),
                "category" => state.filters.categories = split_list(value),
                "status" => state.filters.statuses = split_list(value),
                "type" => state.filters.types = split_list(value),
                "author" => state.filters.authors = split_list(value),
                "implementor" => state.filters.implementors = split_list(value),
                "sort" => {
                    state.sort = value.parse().unwrap_or_else(|err| {
                        tracing::debug!("ignoring sort param: {err}");
                        SortOption::default()
                    })
                }
                _ => {}
            }
        }
        state
    }

    /// Inverse of [`QueryState::from_params`]; empty fields and the default
    /// sort are omitted. Values within a key are sorted for stable output.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.text.is_empty() {
            params.push(("q", self.text.clone()));
        }
        let lists = [
            ("category", &self.filters.categories),
            ("status", &self.filters.statuses),
            ("type", &self.filters.types),
            ("author", &self.filters.authors),
            ("implementor", &self.filters.implementors),
        ];
        for (key, values) in lists {
            if !values.is_empty() {
                let mut values: Vec<&str> = values.iter().map(String::as_str).collect();
                values.sort_unstable();
                params.push((key, values.join(",")));
            }
        }
        if self.sort != SortOption::default() {
            params.push(("sort", self.sort.to_string()));
        }
        params
    }

    /// Reset to the initial state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn split_list(value: &str) -> std::collections::HashSet<String> {
    value
        .split(',')
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
