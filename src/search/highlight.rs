//! Query highlighting and content snippets for rendering results.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Default snippet window, in characters.
pub const DEFAULT_SNIPPET_LENGTH: usize = 100;

const ELLIPSIS: &str = "...";

/// A piece of highlighted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Plain(String),
    Match(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(s) | Self::Match(s) => s,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }
}

/// Literal, case-insensitive matcher for `query`.
fn literal_matcher(query: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Split `text` around every case-insensitive occurrence of `query`.
///
/// An empty `query` or `text` yields the text as one plain segment.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    if query.is_empty() || text.is_empty() {
        return vec![Segment::Plain(text.to_string())];
    }
    let Some(re) = literal_matcher(query) else {
        return vec![Segment::Plain(text.to_string())];
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Plain(text[last..m.start()].to_string()));
        }
        segments.push(Segment::Match(m.as_str().to_string()));
        last = m.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment::Plain(text[last..].to_string()));
    }
    segments
}

/// Join segments back into a string, wrapping matches in `open`/`close`.
pub fn render_segments(segments: &[Segment], open: &str, close: &str) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Plain(s) => out.push_str(s),
            Segment::Match(s) => {
                out.push_str(open);
                out.push_str(s);
                out.push_str(close);
            }
        }
    }
    out
}

static MD_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"#{1,6}\s*").expect("valid heading regex"));
static MD_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));
static MD_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));
static MD_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("valid code regex"));
static MD_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));

fn strip_markdown(text: &str) -> String {
    let text = MD_HEADING.replace_all(text, "");
    let text = MD_BOLD.replace_all(&text, "$1");
    let text = MD_ITALIC.replace_all(&text, "$1");
    let text = MD_CODE.replace_all(&text, "$1");
    let text = MD_LINK.replace_all(&text, "$1");
    text.trim().to_string()
}

/// Excerpt of `content` around the first occurrence of `query`.
///
/// The window is `max_length` characters starting `max_length / 2` before the
/// match, clamped to the content. Markdown markup is stripped and `...` marks
/// each truncated end. Returns an empty string when there is no match.
pub fn content_snippet(content: &str, query: &str, max_length: usize) -> String {
    if content.is_empty() || query.is_empty() {
        return String::new();
    }
    let Some(found) = literal_matcher(query).and_then(|re| re.find(content)) else {
        return String::new();
    };

    let index = content[..found.start()].chars().count();
    let total = content.chars().count();
    let start = index.saturating_sub(max_length / 2);
    let end = total.min(start + max_length);

    let window: String = content.chars().skip(start).take(end - start).collect();
    let mut snippet = strip_markdown(&window);

    if start > 0 {
        snippet.insert_str(0, ELLIPSIS);
    }
    if end < total {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}
