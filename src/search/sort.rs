//! Result orderings.
//!
//! All orderings use a stable sort, so items that compare equal keep the
//! order they had in the corpus and repeated queries give identical output.

use std::cmp::Reverse;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::types::ScoredItem;

/// Supported result orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    NumberAsc,
    /// Highest score first.
    Relevance,
    NumberDesc,
    TitleAsc,
    TitleDesc,
    CreatedAsc,
    CreatedDesc,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sort option '{0}'. Valid options: number-asc, relevance, number-desc, title-asc, title-desc, created-asc, created-desc")]
pub struct ParseSortError(pub String);

impl SortOption {
    /// Wire name, as used in query parameters and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumberAsc => "number-asc",
            Self::Relevance => "relevance",
            Self::NumberDesc => "number-desc",
            Self::TitleAsc => "title-asc",
            Self::TitleDesc => "title-desc",
            Self::CreatedAsc => "created-asc",
            Self::CreatedDesc => "created-desc",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::NumberAsc,
            Self::Relevance,
            Self::NumberDesc,
            Self::TitleAsc,
            Self::TitleDesc,
            Self::CreatedAsc,
            Self::CreatedDesc,
        ]
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|opt| opt.as_str() == s)
            .ok_or_else(|| ParseSortError(s.to_string()))
    }
}

/// First run of ASCII digits in `id`, or 0 when there is none.
pub fn extract_number(id: &str) -> u64 {
    id.split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .and_then(|run| run.parse().ok())
        .unwrap_or(0)
}

/// Case- and accent-insensitive sort key for titles, with the raw title
/// as tie-breaker.
fn title_key(title: &str) -> (String, String) {
    (collation_key(title), title.to_string())
}

fn collation_key(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Order `items` in place.
pub fn sort_items(items: &mut [ScoredItem], sort: SortOption) {
    match sort {
        SortOption::NumberAsc => items.sort_by_key(|i| extract_number(&i.id)),
        SortOption::Relevance => items.sort_by_key(|i| Reverse(i.score)),
        SortOption::NumberDesc => {
            items.sort_by(|a, b| extract_number(&b.id).cmp(&extract_number(&a.id)))
        }
        SortOption::TitleAsc => items.sort_by_cached_key(|i| title_key(&i.title)),
        SortOption::TitleDesc => items.sort_by_cached_key(|i| Reverse(title_key(&i.title))),
        SortOption::CreatedAsc => items.sort_by(|a, b| a.created.cmp(&b.created)),
        SortOption::CreatedDesc => items.sort_by(|a, b| b.created.cmp(&a.created)),
    }
}
