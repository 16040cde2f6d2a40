//! Tests for the chapter index builder

use hscode::domain::{ChapterIndex, DomainError, RawRow, RowPolicy, TokenSet};

fn row(line: usize, level: &str, code: &str, text: &str) -> RawRow {
    RawRow::new(line, level, code, text, "")
}

fn set(words: &[&str]) -> TokenSet {
    words.iter().map(|w| w.to_string()).collect()
}

fn table() -> Vec<RawRow> {
    vec![
        RawRow::new(1, "level", "hs_code", "vn", "en"),
        row(2, "0", "01", "Live animals"),
        row(3, "1", "0101", "Horses, asses, mules"),
        row(4, "2", "010121", "Pure-bred breeding animals"),
        row(5, "0", "02", "Meat and edible offal"),
        row(6, "1", "0201", "Meat of bovine animals, fresh or chilled"),
    ]
}

#[test]
fn given_chapter_with_children_when_indexing_then_title_tokens_are_title_only() {
    // Act
    let index = ChapterIndex::build(&table(), RowPolicy::Skip).unwrap();

    // Assert
    let chapter = index.get("01").expect("chapter 01");
    assert_eq!(chapter.local_text, "Live animals");
    assert_eq!(chapter.title_tokens, set(&["live", "animals"]));
    assert!(chapter
        .all_tokens
        .is_superset(&set(&["live", "animals", "horses", "asses", "mules"])));
    assert!(chapter.all_tokens.contains("breeding"));
    assert!(!chapter.all_tokens.contains("meat"));
}

#[test]
fn given_two_chapters_when_indexing_then_keeps_table_order() {
    let index = ChapterIndex::build(&table(), RowPolicy::Skip).unwrap();

    let codes: Vec<_> = index.chapters().iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["01", "02"]);
}

#[test]
fn given_last_chapter_when_input_ends_then_it_is_finalized() {
    let index = ChapterIndex::build(&table(), RowPolicy::Skip).unwrap();

    let meat = index.get("02").expect("chapter 02");
    assert!(meat.all_tokens.contains("bovine"));
    assert!(meat.title_tokens.is_subset(&meat.all_tokens));
}

#[test]
fn given_rows_before_first_chapter_when_indexing_then_ignored() {
    let rows = vec![row(1, "1", "0000", "orphan heading"), row(2, "0", "01", "Live animals")];

    let index = ChapterIndex::build(&rows, RowPolicy::Skip).unwrap();

    assert_eq!(index.len(), 1);
    assert!(!index.chapters()[0].all_tokens.contains("orphan"));
}

#[test]
fn given_malformed_row_when_skipping_then_partial_index_is_returned() {
    // Arrange
    let rows = vec![
        row(1, "0", "01", "Live animals"),
        row(2, "??", "0101", "Horses"),
        row(3, "1", "0102", "Bovine animals"),
        row(4, "0.0", "02", "Meat"),
    ];

    // Act
    let index = ChapterIndex::build(&rows, RowPolicy::Skip).unwrap();

    // Assert
    assert_eq!(index.len(), 2);
    let live = index.get("01").unwrap();
    assert!(!live.all_tokens.contains("horses"));
    assert!(live.all_tokens.contains("bovine"));
}

#[test]
fn given_malformed_row_when_strict_then_errors() {
    let rows = vec![row(1, "0", "01", "Live animals"), row(2, "??", "0101", "Horses")];

    let result = ChapterIndex::build(&rows, RowPolicy::Strict);

    assert!(matches!(
        result,
        Err(DomainError::MalformedRow { line: 2, .. })
    ));
}

#[test]
fn given_same_rows_when_indexing_twice_then_identical() {
    let first = ChapterIndex::build(&table(), RowPolicy::Skip).unwrap();
    let second = ChapterIndex::build(&table(), RowPolicy::Skip).unwrap();
    assert_eq!(first, second);
}
