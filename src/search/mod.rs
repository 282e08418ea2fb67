//! Search layer facade.
//!
//! - **[`query`]**: the query pipeline (filter, score, sort, cap) and the corpus cache.
//! - **[`score`]**: additive relevance scoring.
//! - **[`filter`]**: facet predicates.
//! - **[`sort`]**: result orderings, including relevance.
//! - **[`highlight`]**: match highlighting and content snippets.
//! - **[`facets`]**: distinct facet values for filter menus.

pub mod facets;
pub mod filter;
pub mod highlight;
pub mod query;
pub mod score;
pub mod sort;

pub use filter::SearchFilters;
pub use query::{CorpusCache, SearchClient, search_items};
pub use sort::SortOption;
