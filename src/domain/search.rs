//! Chapter search: set-based token scoring with a chapter-order tie-break.
//!
//! A chapter whose title contains every query token outranks any chapter that
//! only contains them somewhere below its title. Among title matches the
//! shorter title wins; among content matches the smaller vocabulary wins.
//! Lower chapter numbers get a small bonus on top.

use std::cmp::Ordering;

use tracing::{instrument, trace};

use crate::domain::chapter::{ChapterIndex, ChapterRecord};
use crate::domain::tokenizer::{tokens, TokenSet};

pub const TITLE_MATCH_SCORE: f64 = 10_000.0;
pub const TITLE_SPECIFICITY_BONUS: f64 = 1_000.0;
pub const CONTENT_MATCH_SCORE: f64 = 5_000.0;
pub const CONTENT_SIZE_PENALTY: f64 = 0.1;
pub const CHAPTER_ORDER_BASE: f64 = 100.0;

/// A chapter together with its score for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChapter<'a> {
    pub score: f64,
    pub chapter: &'a ChapterRecord,
}

/// Score one chapter against a non-empty query token set. Zero means no match.
pub fn score_chapter(query: &TokenSet, chapter: &ChapterRecord) -> f64 {
    let mut score = 0.0;

    if query.is_subset(&chapter.title_tokens) {
        score += TITLE_MATCH_SCORE;
        score += TITLE_SPECIFICITY_BONUS / (chapter.title_tokens.len() as f64 + 1.0);
    } else if query.is_subset(&chapter.all_tokens) {
        score += CONTENT_MATCH_SCORE;
        score -= CONTENT_SIZE_PENALTY * chapter.all_tokens.len() as f64;
    }

    if score > 0.0 {
        if let Some(number) = chapter_number(&chapter.code) {
            score += CHAPTER_ORDER_BASE - number as f64;
        }
    }
    score
}

/// Leading two characters of a chapter code as a number, if they are one.
///
/// The code is sliced as stored; only whitespace inside the two-character
/// slice is ignored, so `" 1"` is chapter 1 but `"  12"` has no number.
pub fn chapter_number(code: &str) -> Option<i64> {
    let prefix: String = code.chars().take(2).collect();
    prefix.trim().parse().ok()
}

/// Every matching chapter, best first. Equal scores keep index order.
#[instrument(level = "debug", skip(index))]
pub fn rank_chapters<'a>(index: &'a ChapterIndex, query: &str) -> Vec<ScoredChapter<'a>> {
    let query_tokens = tokens(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredChapter<'a>> = index
        .chapters()
        .iter()
        .map(|chapter| ScoredChapter {
            score: score_chapter(&query_tokens, chapter),
            chapter,
        })
        .filter(|s| s.score > 0.0)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    trace!("{} chapters matched", scored.len());
    scored
}

/// Best matching chapter, or None for an empty query or no match.
pub fn search_chapter<'a>(index: &'a ChapterIndex, query: &str) -> Option<&'a ChapterRecord> {
    rank_chapters(index, query).first().map(|s| s.chapter)
}

impl ChapterIndex {
    pub fn search(&self, query: &str) -> Option<&ChapterRecord> {
        search_chapter(self, query)
    }

    pub fn rank(&self, query: &str) -> Vec<ScoredChapter<'_>> {
        rank_chapters(self, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_codes_when_reading_chapter_number_then_uses_first_two_chars() {
        assert_eq!(chapter_number("0101"), Some(1));
        assert_eq!(chapter_number("84"), Some(84));
        assert_eq!(chapter_number("7"), Some(7));
        assert_eq!(chapter_number("A1"), None);
        assert_eq!(chapter_number(""), None);
        assert_eq!(chapter_number(" 1"), Some(1));
        assert_eq!(chapter_number("  12"), None);
    }
}
