//! Facet value enumeration for building filter menus.

use itertools::Itertools;
use serde::Serialize;

use crate::model::types::SearchableItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub label: String,
    pub value: String,
}

impl FacetOption {
    fn plain(value: String) -> Self {
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Distinct values present in the corpus, per facet, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub categories: Vec<FacetOption>,
    pub statuses: Vec<FacetOption>,
    pub types: Vec<FacetOption>,
    pub authors: Vec<FacetOption>,
    pub implementors: Vec<FacetOption>,
}

pub fn filter_options(items: &[SearchableItem]) -> FacetOptions {
    FacetOptions {
        categories: distinct(items.iter().map(|i| i.category.as_str()))
            .map(FacetOption::plain)
            .collect(),
        statuses: distinct(items.iter().map(|i| i.status.as_str()))
            .map(|status| FacetOption {
                label: capitalize(&status),
                value: status,
            })
            .collect(),
        types: distinct(items.iter().map(|i| i.kind.as_str()))
            .map(FacetOption::plain)
            .collect(),
        authors: distinct(items.iter().flat_map(|i| i.authors.iter().map(String::as_str)))
            .map(FacetOption::plain)
            .collect(),
        implementors: distinct(
            items
                .iter()
                .flat_map(|i| i.implementors.iter().map(String::as_str)),
        )
        .map(FacetOption::plain)
        .collect(),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> impl Iterator<Item = String> {
    values
        .filter(|v| !v.is_empty())
        .sorted_unstable()
        .dedup()
        .map(str::to_string)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
