//! Additive relevance scoring for a single item against a query.

use crate::model::types::SearchableItem;

const ID_EXACT: u32 = 100;
const ID_PREFIX: u32 = 80;
const ID_CONTAINS: u32 = 60;
const TITLE_PREFIX: u32 = 70;
const TITLE_CONTAINS: u32 = 40;
const TITLE_WORD_PREFIX: u32 = 20;
const CONTENT_PHRASE: u32 = 30;
const CONTENT_OCCURRENCE: u32 = 5;
const CONTENT_OCCURRENCE_CAP: u32 = 25;
const CONTENT_WORD: u32 = 2;
const CONTENT_WORD_CAP: u32 = 15;
const CONTENT_HEADER: u32 = 10;

/// Score `item` against `query`; 0 means "not a match".
///
/// Matching is case-insensitive and literal. A blank query scores 0; the
/// search layer never calls this with one.
pub fn score_item(item: &SearchableItem, query: &str) -> u32 {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return 0;
    }

    let id = item.id.to_lowercase();
    let title = item.title.to_lowercase();
    let mut score = 0;

    if id == q {
        score += ID_EXACT;
    } else if id.starts_with(&q) {
        score += ID_PREFIX;
    } else if id.contains(&q) {
        score += ID_CONTAINS;
    }

    if title.starts_with(&q) {
        score += TITLE_PREFIX;
    } else if title.contains(&q) {
        score += TITLE_CONTAINS;
    }

    if title.split_whitespace().any(|word| word.starts_with(&q)) {
        score += TITLE_WORD_PREFIX;
    }

    if !item.content.is_empty() {
        score += content_score(&item.content.to_lowercase(), &q);
    }

    score
}

fn content_score(content: &str, q: &str) -> u32 {
    let mut score = 0;

    let occurrences = count_u32(content.matches(q).count());
    if occurrences > 0 {
        score += CONTENT_PHRASE;
        score += occurrences
            .saturating_mul(CONTENT_OCCURRENCE)
            .min(CONTENT_OCCURRENCE_CAP);
    }

    let matching_words = count_u32(content.split_whitespace().filter(|w| w.contains(q)).count());
    score += matching_words
        .saturating_mul(CONTENT_WORD)
        .min(CONTENT_WORD_CAP);

    let header_matches = count_u32(
        content
            .lines()
            .filter(|line| line.trim_start().starts_with('#') && line.contains(q))
            .count(),
    );
    score += header_matches.saturating_mul(CONTENT_HEADER);

    score
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
