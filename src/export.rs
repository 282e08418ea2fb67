//! Rendering of search results for the command line.
//!
//! Provides conversion of ranked results to:
//! - Markdown - headings per result, metadata table, highlighted title
//! - JSON - structured data for programmatic use
//! - Plain Text - simple, copy-paste friendly format

use std::str::FromStr;

use chrono::Utc;

use crate::model::types::ScoredItem;
use crate::search::highlight::{DEFAULT_SNIPPET_LENGTH, content_snippet, highlight, render_segments};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
    PlainText,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "plain" | "text" | "txt" => Ok(Self::PlainText),
            other => Err(format!(
                "unknown format '{other}' (expected markdown, json or plain)"
            )),
        }
    }
}

/// Options for export customization
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Include full content (not just snippets)
    pub include_content: bool,
    pub include_score: bool,
    /// Snippet window in characters
    pub snippet_length: usize,
    /// Query string, used for snippets, highlighting and the header
    pub query: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_content: false,
            include_score: true,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            query: None,
        }
    }
}

impl ExportOptions {
    fn active_query(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn snippet_for(&self, hit: &ScoredItem) -> String {
        self.active_query()
            .map(|q| content_snippet(&hit.content, q, self.snippet_length))
            .unwrap_or_default()
    }
}

/// Export search results to the specified format
pub fn export_results(hits: &[ScoredItem], format: ExportFormat, options: &ExportOptions) -> String {
    match format {
        ExportFormat::Markdown => export_markdown(hits, options),
        ExportFormat::Json => export_json(hits, options),
        ExportFormat::PlainText => export_plain_text(hits, options),
    }
}

/// Escape special Markdown characters to prevent formatting issues or injection.
fn escape_markdown(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('*', "\\*")
        .replace('_', "\\_")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace('<', "\\<")
        .replace('>', "\\>")
        .replace('`', "\\`")
}

fn export_markdown(hits: &[ScoredItem], options: &ExportOptions) -> String {
    let mut output = String::new();

    output.push_str("# Search Results\n\n");

    if let Some(query) = options.active_query() {
        output.push_str(&format!("**Query:** `{}`\n\n", query.replace('`', "")));
    }

    output.push_str(&format!(
        "**Results:** {} | **Exported:** {}\n\n",
        hits.len(),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("---\n\n");

    if hits.is_empty() {
        output.push_str("_No results found._\n");
        return output;
    }

    for hit in hits {
        let title = match options.active_query() {
            Some(q) => {
                let segments = highlight(&escape_markdown(&hit.title), &escape_markdown(q));
                render_segments(&segments, "**", "**")
            }
            None => escape_markdown(&hit.title),
        };
        output.push_str(&format!("## {}: {}\n\n", hit.id, title));

        output.push_str("| Field | Value |\n");
        output.push_str("|-------|-------|\n");
        output.push_str(&format!("| Status | {} |\n", escape_markdown(&hit.status)));
        if !hit.category.is_empty() {
            output.push_str(&format!("| Category | {} |\n", escape_markdown(&hit.category)));
        }
        if !hit.authors.is_empty() {
            output.push_str(&format!(
                "| Authors | {} |\n",
                escape_markdown(&hit.authors.join(", "))
            ));
        }
        if !hit.implementors.is_empty() {
            output.push_str(&format!(
                "| Implementors | {} |\n",
                escape_markdown(&hit.implementors.join(", "))
            ));
        }
        output.push_str(&format!("| Created | {} |\n", escape_markdown(&hit.created)));
        output.push_str(&format!("| Link | `{}` |\n", hit.url.replace('`', "")));
        if options.include_score {
            output.push_str(&format!("| Score | {} |\n", hit.score));
        }
        output.push('\n');

        let snippet = options.snippet_for(hit);
        if !snippet.is_empty() {
            output.push_str(&format!("> {}\n\n", snippet.replace('\n', " ")));
        }

        if options.include_content && !hit.content.is_empty() {
            output.push_str("<details>\n<summary>Full Content</summary>\n\n");
            output.push_str(&hit.content);
            if !hit.content.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("\n</details>\n\n");
        }

        output.push_str("---\n\n");
    }

    output
}

fn export_json(hits: &[ScoredItem], options: &ExportOptions) -> String {
    let export_data = serde_json::json!({
        "query": options.active_query(),
        "count": hits.len(),
        "exported_at": Utc::now().to_rfc3339(),
        "hits": hits.iter().map(|hit| {
            let mut obj = serde_json::json!({
                "id": hit.id,
                "title": hit.title,
                "url": hit.url,
                "type": hit.kind,
                "status": hit.status,
                "category": hit.category,
                "authors": hit.authors,
                "implementors": hit.implementors,
                "created": hit.created,
                "statusBadgeColor": hit.status_badge_color,
            });

            if options.include_score {
                obj["score"] = serde_json::json!(hit.score);
            }

            let snippet = options.snippet_for(hit);
            if !snippet.is_empty() {
                obj["snippet"] = serde_json::json!(snippet);
            }

            if let Some(q) = options.active_query() {
                obj["title_highlight"] = serde_json::json!(highlight(&hit.title, q));
            }

            if options.include_content && !hit.content.is_empty() {
                obj["content"] = serde_json::json!(hit.content);
            }

            obj
        }).collect::<Vec<_>>()
    });

    serde_json::to_string_pretty(&export_data).unwrap_or_else(|_| "{}".to_string())
}

fn export_plain_text(hits: &[ScoredItem], options: &ExportOptions) -> String {
    let mut output = String::new();

    output.push_str("SEARCH RESULTS\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');

    if let Some(query) = options.active_query() {
        output.push_str(&format!("Query: {query}\n"));
    }

    output.push_str(&format!(
        "Results: {} | Exported: {}\n",
        hits.len(),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if hits.is_empty() {
        output.push_str("No results found.\n");
        return output;
    }

    for hit in hits {
        output.push_str(&format!("[{}] {}\n", hit.id, hit.title));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        output.push_str(&format!("Status: {}\n", hit.status));
        if !hit.category.is_empty() {
            output.push_str(&format!("Category: {}\n", hit.category));
        }
        if !hit.authors.is_empty() {
            output.push_str(&format!("Authors: {}\n", hit.authors.join(", ")));
        }
        if !hit.implementors.is_empty() {
            output.push_str(&format!("Implementors: {}\n", hit.implementors.join(", ")));
        }
        output.push_str(&format!("Created: {}\n", hit.created));
        output.push_str(&format!("Link: {}\n", hit.url));

        if options.include_score {
            output.push_str(&format!("Score: {}\n", hit.score));
        }

        let snippet = options.snippet_for(hit);
        if !snippet.is_empty() {
            output.push('\n');
            for line in snippet.lines() {
                output.push_str(&format!("  {line}\n"));
            }
        }

        if options.include_content && !hit.content.is_empty() {
            output.push_str("\nFull Content:\n");
            for line in hit.content.lines() {
                output.push_str(&format!("  {line}\n"));
            }
        }

        output.push('\n');
    }

    output
}
