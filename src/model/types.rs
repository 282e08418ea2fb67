use serde::{Deserialize, Serialize};

/// Document family a proposal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocKind {
    /// Cardano Improvement Proposal.
    Cip,
    /// Cardano Problem Statement.
    Cps,
}

impl DocKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cip => "CIP",
            Self::Cps => "CPS",
        }
    }

    /// Path segment used when building document urls.
    pub fn url_segment(self) -> &'static str {
        match self {
            Self::Cip => "cip",
            Self::Cps => "cps",
        }
    }
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proposal in its uniform, searchable shape.
///
/// Built only by [`crate::corpus::normalize`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableItem {
    /// `"{KIND}-{number}"`, unique across the corpus.
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: DocKind,
    /// Markdown body; empty when the document has none.
    pub content: String,
    /// Lower-cased leading token of the raw status.
    pub status: String,
    pub category: String,
    pub status_badge_color: String,
    pub authors: Vec<String>,
    pub implementors: Vec<String>,
    /// Fixed-width ISO date, so string order is chronological order.
    pub created: String,
}

/// A [`SearchableItem`] paired with its relevance for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: SearchableItem,
    pub score: u32,
}

impl ScoredItem {
    pub fn new(item: SearchableItem, score: u32) -> Self {
        Self { item, score }
    }
}

impl std::ops::Deref for ScoredItem {
    type Target = SearchableItem;

    fn deref(&self) -> &Self::Target {
        &self.item
    }
}
