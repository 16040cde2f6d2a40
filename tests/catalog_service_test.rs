//! Tests for the catalog and its service

use std::sync::Arc;

use hscode::application::services::{Catalog, CatalogService};
use hscode::domain::{RawRow, RowPolicy, TreeBuilder};
use hscode::util::testing;

fn row(line: usize, level: &str, code: &str, text: &str) -> RawRow {
    RawRow::new(line, level, code, text, "")
}

fn table() -> Vec<RawRow> {
    vec![
        RawRow::new(1, "level", "code", "local", "alt"),
        row(2, "0", "01", "Live animals"),
        row(3, "1", "0101", "Live horses"),
        row(4, "2", "010121", "Pure-bred breeding animals"),
        row(5, "0", "05", "Products of animal origin"),
        row(6, "1", "0511", "Products of animals not elsewhere specified"),
        row(7, "0", "09", "Coffee tea and spices"),
        row(8, "1", "0901", "Coffee roasted or not"),
    ]
}

fn service() -> CatalogService {
    testing::init_test_setup();
    CatalogService::new(Catalog::build(&table(), RowPolicy::Skip).unwrap())
}

#[test]
fn given_table_when_building_catalog_then_tree_and_index_agree() {
    let catalog = Catalog::build(&table(), RowPolicy::Skip).unwrap();

    assert_eq!(catalog.tree().roots().len(), catalog.chapters().len());
    for chapter in catalog.chapters().chapters() {
        assert!(catalog.tree().find_by_code(&chapter.code).is_some());
    }
}

#[test]
fn given_matching_query_when_looking_up_then_returns_chapter_and_candidates() {
    // Act
    let lookup = service().lookup("coffee").expect("match");

    // Assert
    assert_eq!(lookup.chapter.code, "09");
    assert_eq!(lookup.candidates.len(), 1);
    assert_eq!(lookup.candidates[0].code, "0901");
}

#[test]
fn given_unmatched_query_when_looking_up_then_none() {
    let service = service();

    assert!(service.lookup("semiconductors").is_none());
    assert!(service.lookup("").is_none());
}

#[test]
fn given_top_limit_when_ranking_then_truncates_best_first() {
    let service = service();

    let all = service.rank("animals", 10);
    let top = service.rank("animals", 1);

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].code, "01");
    assert_eq!(all[1].code, "05");
    assert!(all[0].score > all[1].score);
    assert_eq!(top, all[..1].to_vec());
}

#[test]
fn given_snapshot_when_replaced_then_old_snapshot_stays_valid() {
    // Arrange
    let service = service();
    let before = service.snapshot();

    // Act
    let coffee_only = vec![row(1, "0", "09", "Coffee")];
    let previous = service.replace(Catalog::build(&coffee_only, RowPolicy::Skip).unwrap());

    // Assert
    assert!(Arc::ptr_eq(&before, &previous));
    assert_eq!(before.chapters().len(), 3);
    assert_eq!(service.snapshot().chapters().len(), 1);
    assert!(service.lookup("animals").is_none());
    assert!(before.lookup("animals").is_some());
}

#[test]
fn given_prebuilt_tree_when_combining_then_lookups_use_it() {
    // Arrange
    let raw = table();
    let tree = TreeBuilder::default().build(&raw).unwrap();

    // Act
    let catalog = Catalog::with_tree(&raw, tree, RowPolicy::Skip).unwrap();

    // Assert
    let lookup = catalog.lookup("live animals").unwrap();
    assert_eq!(lookup.chapter.code, "01");
    let codes: Vec<_> = lookup.candidates.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["0101", "010121"]);
}

#[test]
fn given_service_when_shared_across_threads_then_reads_are_consistent() {
    let service = Arc::new(service());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || service.lookup("coffee").map(|l| l.chapter.code))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().as_deref(), Some("09"));
    }
}
