//! Corpus normalization.
//!
//! The content pipeline hands over two collections of loosely-shaped
//! records, one per [`DocKind`]. Every "string or list or absent" decision
//! is made here so the search layer only ever sees [`SearchableItem`]s with
//! one fixed shape.
//!
//! # Corpus file
//!
//! ```json
//! {
//!   "cips": [{ "CIP": 1, "Title": "CIP process", "Status": "Active",
//!              "Authors": ["Jane Doe <jane@example.com>"],
//!              "Created": "2020-03-17", "slug": "CIP-0001", "content": "# ..." }],
//!   "cps":  [{ "CPS": 1, "Title": "Metadata discoverability", "Status": "Open",
//!              "Created": "2022-10-24", "slug": "CPS-0001" }]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::types::{DocKind, SearchableItem};

/// Errors raised while loading or normalizing the raw corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read corpus file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse corpus file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{kind} entry {entry} is missing required field '{field}'")]
    MissingField {
        kind: DocKind,
        entry: String,
        field: &'static str,
    },

    #[error("Duplicate document id: {0}")]
    DuplicateId(String),
}

/// A metadata value that may be a single scalar or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<serde_json::Value>),
    One(serde_json::Value),
}

impl OneOrMany {
    /// Flatten to strings, rendering non-string scalars and skipping nulls.
    pub fn into_strings(self) -> Vec<String> {
        let values = match self {
            Self::Many(values) => values,
            Self::One(value) => vec![value],
        };
        values.into_iter().filter_map(value_to_string).collect()
    }
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Raw CIP record as produced by the content pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCip {
    #[serde(rename = "CIP", default)]
    pub number: Option<u32>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Authors", default)]
    pub authors: Option<OneOrMany>,
    #[serde(rename = "Implementors", default)]
    pub implementors: Option<OneOrMany>,
    #[serde(rename = "Created", default)]
    pub created: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "statusBadgeColor", default)]
    pub status_badge_color: Option<String>,
}

/// Raw CPS record as produced by the content pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCps {
    #[serde(rename = "CPS", default)]
    pub number: Option<u32>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Authors", default)]
    pub authors: Option<Vec<String>>,
    #[serde(rename = "Created", default)]
    pub created: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "statusBadgeColor", default)]
    pub status_badge_color: Option<String>,
}

/// Both raw collections, exactly as the corpus provider supplies them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCorpus {
    #[serde(default)]
    pub cips: Vec<RawCip>,
    #[serde(default)]
    pub cps: Vec<RawCps>,
}

impl RawCorpus {
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the corpus file written by the content pipeline.
    pub fn load_from(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path)?;
        let corpus = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            cips = corpus.cips.len(),
            cps = corpus.cps.len(),
            "corpus_loaded"
        );
        Ok(corpus)
    }
}

static CONTACT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid contact regex"));

/// Strip `<...>` contact annotations from an author string.
///
/// `"Jane Doe <jane@example.com>"` becomes `"Jane Doe"`.
pub fn clean_name(name: &str) -> String {
    CONTACT_RE.replace_all(name, "").trim().to_string()
}

/// Clean every name and drop the ones that end up empty.
pub fn clean_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| clean_name(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect()
}

/// Presentation token for a raw status, used when the record carries none.
pub fn status_badge_color(raw_status: &str) -> &'static str {
    match raw_status {
        "Proposed" | "Draft" => "bg-cf-blue-600/30 ring-cf-blue-600/30 text-blue-600",
        "Solved" | "Active" => "bg-cf-green-600/30 ring-cf-green-600/30 text-green-600",
        "Inactive" => "bg-cf-red-600/20 ring-cf-red-600/20 text-red-600",
        "Open" => "bg-cf-yellow-600/20 ring-cf-yellow-600/20 text-yellow-600",
        _ => "bg-white/10 ring-gray-100/10 text-slate-300",
    }
}

/// Convert the raw corpus into searchable items.
///
/// CIPs come first, then CPSs, each ascending by number. A record missing
/// its number, title, status, created date or slug is rejected, as is a
/// corpus in which two records map to the same id.
pub fn normalize(raw: &RawCorpus) -> Result<Vec<SearchableItem>, CorpusError> {
    let mut cips = raw
        .cips
        .iter()
        .enumerate()
        .map(|(idx, cip)| normalize_cip(idx, cip))
        .collect::<Result<Vec<_>, _>>()?;
    cips.sort_by_key(|(number, _)| *number);

    let mut cps = raw
        .cps
        .iter()
        .enumerate()
        .map(|(idx, cps)| normalize_cps(idx, cps))
        .collect::<Result<Vec<_>, _>>()?;
    cps.sort_by_key(|(number, _)| *number);

    let items: Vec<SearchableItem> = cips
        .into_iter()
        .chain(cps)
        .map(|(_, item)| item)
        .collect();

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.id.as_str()) {
            return Err(CorpusError::DuplicateId(item.id.clone()));
        }
    }

    tracing::debug!(
        cips = raw.cips.len(),
        cps = raw.cps.len(),
        items = items.len(),
        "corpus_normalized"
    );
    Ok(items)
}

fn normalize_cip(idx: usize, cip: &RawCip) -> Result<(u32, SearchableItem), CorpusError> {
    let kind = DocKind::Cip;
    let entry = entry_label(idx, cip.slug.as_deref());
    let number = cip.number.ok_or_else(|| missing(kind, &entry, "CIP"))?;
    let title = required(kind, &entry, "Title", cip.title.as_deref())?;
    let raw_status = required(kind, &entry, "Status", cip.status.as_deref())?;
    let created = required(kind, &entry, "Created", cip.created.as_deref())?;
    let slug = required(kind, &entry, "slug", cip.slug.as_deref())?;

    // Only the leading word of a CIP status is significant ("Active (since ...)").
    let status = raw_status
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    let authors = match cip.authors.clone() {
        Some(OneOrMany::One(serde_json::Value::String(joined))) => {
            clean_names(joined.split(", "))
        }
        Some(authors) => clean_names(authors.into_strings()),
        None => Vec::new(),
    };
    let implementors = cip
        .implementors
        .clone()
        .map(|i| clean_names(i.into_strings()))
        .unwrap_or_default();

    let item = SearchableItem {
        id: format!("{kind}-{number}"),
        title: title.to_string(),
        url: format!("/{}/{slug}", kind.url_segment()),
        kind,
        content: cip.content.clone().unwrap_or_default(),
        status,
        category: cip.category.clone().unwrap_or_default(),
        status_badge_color: cip
            .status_badge_color
            .clone()
            .unwrap_or_else(|| status_badge_color(raw_status).to_string()),
        authors,
        implementors,
        created: created.to_string(),
    };
    Ok((number, item))
}

fn normalize_cps(idx: usize, cps: &RawCps) -> Result<(u32, SearchableItem), CorpusError> {
    let kind = DocKind::Cps;
    let entry = entry_label(idx, cps.slug.as_deref());
    let number = cps.number.ok_or_else(|| missing(kind, &entry, "CPS"))?;
    let title = required(kind, &entry, "Title", cps.title.as_deref())?;
    let raw_status = required(kind, &entry, "Status", cps.status.as_deref())?;
    let created = required(kind, &entry, "Created", cps.created.as_deref())?;
    let slug = required(kind, &entry, "slug", cps.slug.as_deref())?;

    let item = SearchableItem {
        id: format!("{kind}-{number}"),
        title: title.to_string(),
        url: format!("/{}/{slug}", kind.url_segment()),
        kind,
        content: cps.content.clone().unwrap_or_default(),
        status: raw_status.trim().to_lowercase(),
        category: cps.category.clone().unwrap_or_default(),
        status_badge_color: cps
            .status_badge_color
            .clone()
            .unwrap_or_else(|| status_badge_color(raw_status).to_string()),
        authors: cps
            .authors
            .as_deref()
            .map(|authors| clean_names(authors))
            .unwrap_or_default(),
        implementors: Vec::new(),
        created: created.to_string(),
    };
    Ok((number, item))
}

fn entry_label(idx: usize, slug: Option<&str>) -> String {
    match slug {
        Some(slug) if !slug.trim().is_empty() => slug.to_string(),
        _ => format!("#{idx}"),
    }
}

fn missing(kind: DocKind, entry: &str, field: &'static str) -> CorpusError {
    CorpusError::MissingField {
        kind,
        entry: entry.to_string(),
        field,
    }
}

/// Blank strings count as missing.
fn required<'a>(
    kind: DocKind,
    entry: &str,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, CorpusError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing(kind, entry, field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cip(number: u32, title: &str, status: &str) -> RawCip {
        RawCip {
            number: Some(number),
            title: Some(title.into()),
            status: Some(status.into()),
            created: Some("2021-01-01".into()),
            slug: Some(format!("CIP-{number:04}")),
            ..Default::default()
        }
    }

    fn cps(number: u32, title: &str, status: &str) -> RawCps {
        RawCps {
            number: Some(number),
            title: Some(title.into()),
            status: Some(status.into()),
            created: Some("2022-01-01".into()),
            slug: Some(format!("CPS-{number:04}")),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("Jane Doe <jane@example.com>"), "Jane Doe");
        assert_eq!(clean_name("Jane Doe"), "Jane Doe");
        assert_eq!(clean_name("  <only@contact.io> "), "");
    }

    #[test]
    fn test_clean_names_drops_empty() {
        let names = clean_names(["A <a@x>", "<b@x>", "  ", "C"]);
        assert_eq!(names, vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_normalize_orders_by_kind_then_number() {
        let raw = RawCorpus {
            cips: vec![cip(30, "Thirty", "Draft"), cip(2, "Two", "Active")],
            cps: vec![cps(5, "Five", "Open"), cps(1, "One", "Open")],
        };
        let items = normalize(&raw).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["CIP-2", "CIP-30", "CPS-1", "CPS-5"]);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = RawCorpus {
            cips: vec![cip(3, "Three", "Draft"), cip(1, "One", "Active")],
            cps: vec![cps(2, "Two", "Solved")],
        };
        assert_eq!(normalize(&raw).unwrap(), normalize(&raw).unwrap());
    }

    #[test]
    fn test_cip_fields() {
        let mut raw = cip(42, "Wallet Standard", "Active (since epoch 300)");
        raw.category = Some("Wallets".into());
        raw.authors = Some(OneOrMany::One(serde_json::json!(
            "Jane Doe <jane@example.com>, John Roe"
        )));
        raw.implementors = Some(OneOrMany::Many(vec![
            serde_json::json!("Lace <lace@example.com>"),
            serde_json::json!(7),
            serde_json::Value::Null,
        ]));
        let items = normalize(&RawCorpus {
            cips: vec![raw],
            cps: vec![],
        })
        .unwrap();
        let item = &items[0];
        assert_eq!(item.id, "CIP-42");
        assert_eq!(item.url, "/cip/CIP-0042");
        assert_eq!(item.kind, DocKind::Cip);
        assert_eq!(item.status, "active");
        assert_eq!(item.category, "Wallets");
        assert_eq!(item.authors, vec!["Jane Doe", "John Roe"]);
        assert_eq!(item.implementors, vec!["Lace", "7"]);
        assert_eq!(item.content, "");
        assert_eq!(item.status_badge_color, status_badge_color("Active (since epoch 300)"));
    }

    #[test]
    fn test_cps_status_is_whole_value_lowercased() {
        let items = normalize(&RawCorpus {
            cips: vec![],
            cps: vec![cps(9, "Problem", "Open")],
        })
        .unwrap();
        assert_eq!(items[0].status, "open");
        assert_eq!(items[0].url, "/cps/CPS-0009");
        assert!(items[0].implementors.is_empty());
        assert_eq!(items[0].category, "");
    }

    #[test]
    fn test_badge_color_carried_through() {
        let mut raw = cip(1, "One", "Draft");
        raw.status_badge_color = Some("custom-token".into());
        let items = normalize(&RawCorpus {
            cips: vec![raw],
            cps: vec![],
        })
        .unwrap();
        assert_eq!(items[0].status_badge_color, "custom-token");
    }

    #[test]
    fn test_missing_required_field_fails() {
        let mut raw = cip(1, "One", "Draft");
        raw.created = None;
        let err = normalize(&RawCorpus {
            cips: vec![raw],
            cps: vec![],
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CorpusError::MissingField {
                kind: DocKind::Cip,
                field: "Created",
                ..
            }
        ));

        let mut raw = cps(1, "One", "Open");
        raw.number = None;
        let err = normalize(&RawCorpus {
            cips: vec![],
            cps: vec![raw],
        })
        .unwrap_err();
        assert!(err.to_string().contains("'CPS'"));
    }

    #[test]
    fn test_blank_title_is_missing() {
        let mut raw = cip(1, "   ", "Draft");
        raw.slug = None;
        let err = normalize(&RawCorpus {
            cips: vec![raw],
            cps: vec![],
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "CIP entry #0 is missing required field 'Title'"
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = normalize(&RawCorpus {
            cips: vec![cip(1, "One", "Draft"), cip(1, "Again", "Draft")],
            cps: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateId(id) if id == "CIP-1"));
    }

    #[test]
    fn test_from_json_str_raw_shapes() {
        let json = r#"{
            "cips": [{"CIP": 10, "Title": "T", "Status": "Proposed", "Created": "2020-01-01",
                      "slug": "CIP-0010", "Authors": ["A <a@b.c>"], "Implementors": "Impl"}],
            "cps": [{"CPS": 3, "Title": "P", "Status": "Solved", "Created": "2023-02-02",
                     "slug": "CPS-0003", "Authors": ["B"]}]
        }"#;
        let raw = RawCorpus::from_json_str(json).unwrap();
        let items = normalize(&raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].authors, vec!["A"]);
        assert_eq!(items[0].implementors, vec!["Impl"]);
        assert_eq!(items[1].authors, vec!["B"]);
        assert_eq!(items[1].status, "solved");
    }

    #[test]
    fn test_status_badge_color_table() {
        assert!(status_badge_color("Draft").contains("blue"));
        assert!(status_badge_color("Solved").contains("green"));
        assert!(status_badge_color("Inactive").contains("red"));
        assert!(status_badge_color("Open").contains("yellow"));
        assert!(status_badge_color("Whatever").contains("slate"));
    }
}
