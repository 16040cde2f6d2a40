//! Tests for chapter search scoring and ranking

use hscode::domain::search::{score_chapter, CONTENT_MATCH_SCORE, TITLE_MATCH_SCORE};
use hscode::domain::{rank_chapters, search_chapter, tokens, ChapterIndex, RawRow, RowPolicy};

fn row(line: usize, level: &str, code: &str, text: &str) -> RawRow {
    RawRow::new(line, level, code, text, "")
}

fn index(rows: &[RawRow]) -> ChapterIndex {
    ChapterIndex::build(rows, RowPolicy::Skip).unwrap()
}

#[test]
fn given_exact_title_and_descendant_match_when_searching_then_title_wins() {
    // Arrange: "05" only mentions animals below its title
    let index = index(&[
        row(1, "0", "05", "Products of animal origin"),
        row(2, "1", "0511", "Live animals products, not elsewhere specified"),
        row(3, "0", "01", "Live animals"),
    ]);

    // Act
    let ranked = rank_chapters(&index, "live animals");
    let best = search_chapter(&index, "live animals").expect("match");

    // Assert
    assert_eq!(best.code, "01");
    assert!(ranked[0].score >= TITLE_MATCH_SCORE);
    assert!(ranked[1].score <= CONTENT_MATCH_SCORE + 100.0);
    assert_eq!(ranked[1].chapter.code, "05");
}

#[test]
fn given_equal_title_matches_when_searching_then_lower_chapter_number_wins() {
    // Arrange: same title size, so only the chapter-order bonus differs
    let index = index(&[
        row(1, "0", "09123", "Coffee tea"),
        row(2, "0", "02456", "Coffee meat"),
    ]);

    // Act
    let ranked = rank_chapters(&index, "coffee");

    // Assert
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].chapter.code, "02456");
    assert_eq!(ranked[1].chapter.code, "09123");
    assert!((ranked[0].score - ranked[1].score - 7.0).abs() < 1e-9);
}

#[test]
fn given_title_match_when_scoring_then_shorter_title_scores_higher() {
    let index = index(&[
        row(1, "0", "10", "Cereals"),
        row(2, "0", "10", "Cereals grains and seeds"),
    ]);
    let query = tokens("cereals");

    let short = score_chapter(&query, &index.chapters()[0]);
    let long = score_chapter(&query, &index.chapters()[1]);

    // 10000 + 1000/2 + 90 vs 10000 + 1000/5 + 90
    assert!((short - 10_590.0).abs() < 1e-9);
    assert!((long - 10_290.0).abs() < 1e-9);
}

#[test]
fn given_content_match_when_scoring_then_penalizes_vocabulary_size() {
    let index = index(&[
        row(1, "0", "03", "Fish"),
        row(2, "1", "0301", "Live salmon trout eels"),
    ]);
    let chapter = &index.chapters()[0];
    assert_eq!(chapter.all_tokens.len(), 5);

    let score = score_chapter(&tokens("salmon"), chapter);

    // 5000 - 0.1 * 5 + (100 - 3)
    assert!((score - 5_096.5).abs() < 1e-9);
}

#[test]
fn given_non_numeric_code_when_scoring_then_no_order_adjustment() {
    let index = index(&[row(1, "0", "XV", "Base metals")]);

    let score = score_chapter(&tokens("metals"), &index.chapters()[0]);

    assert!((score - (10_000.0 + 1_000.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn given_partial_query_overlap_when_searching_then_no_match() {
    // Every query word must be present
    let index = index(&[row(1, "0", "01", "Live animals")]);

    assert!(search_chapter(&index, "live plants").is_none());
}

#[test]
fn given_empty_query_when_searching_then_none() {
    let index = index(&[row(1, "0", "01", "Live animals")]);

    assert!(search_chapter(&index, "").is_none());
    assert!(search_chapter(&index, "123 %%").is_none());
    assert!(rank_chapters(&index, "   ").is_empty());
}

#[test]
fn given_identical_scores_when_ranking_then_keeps_index_order() {
    let index = index(&[
        row(1, "0", "", "Textiles"),
        row(2, "0", "", "Textiles"),
        row(3, "0", "", "Textiles"),
    ]);
    let ranked = rank_chapters(&index, "textiles");

    assert_eq!(ranked.len(), 3);
    for (scored, chapter) in ranked.iter().zip(index.chapters()) {
        assert!(std::ptr::eq(scored.chapter, chapter));
    }
}

#[test]
fn given_index_methods_when_searching_then_same_as_free_functions() {
    let index = index(&[row(1, "0", "01", "Live animals"), row(2, "0", "02", "Meat")]);

    assert_eq!(index.search("meat"), search_chapter(&index, "meat"));
    assert_eq!(index.rank("meat").len(), 1);
}
