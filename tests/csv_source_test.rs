//! Tests for reading tariff tables from CSV

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use hscode::domain::{leveled_rows, RowPolicy};
use hscode::infrastructure::traits::{CsvRowSource, RowSource};
use hscode::infrastructure::InfraError;

fn write_table(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("data.csv");
    fs::write(&path, content).expect("write table");
    path
}

#[test]
fn given_table_with_header_when_reading_then_returns_every_record_in_order() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_table(
        &temp,
        "\u{feff}level,code,vn,en\n0,01,Động vật sống,Live animals\n1,0101,\"Ngựa, lừa, la\",\"Horses, asses, mules\"\n",
    );

    // Act
    let rows = CsvRowSource.read_rows(&path).unwrap();

    // Assert
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_header());
    assert_eq!(rows[1].line, 2);
    assert_eq!(rows[1].code, "01");
    assert_eq!(rows[2].local_text, "Ngựa, lừa, la");
    assert_eq!(rows[2].alt_text, "Horses, asses, mules");
}

#[test]
fn given_short_records_when_reading_then_missing_columns_are_empty() {
    let temp = TempDir::new().unwrap();
    let path = write_table(&temp, "0,01,Live animals\n1\n");

    let rows = CsvRowSource.read_rows(&path).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].alt_text, "");
    assert_eq!(rows[1].level, "1");
    assert_eq!(rows[1].code, "");
    assert_eq!(rows[1].local_text, "");
}

#[test]
fn given_blank_and_malformed_levels_when_leveling_then_only_valid_rows_remain() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_table(
        &temp,
        "level,code,vn,en\n0,01,Live animals,\n,,note without level,\nabc,0101,Horses,\n1.0,0102,Bovine,\n",
    );
    let raw = CsvRowSource.read_rows(&path).unwrap();

    // Act
    let rows = leveled_rows(&raw, RowPolicy::Skip).unwrap();

    // Assert
    let codes: Vec<_> = rows.iter().filter_map(|r| r.code.as_deref()).collect();
    assert_eq!(codes, vec!["01", "0102"]);
    assert_eq!(rows[1].level, 1);
    assert!(leveled_rows(&raw, RowPolicy::Strict).is_err());
}

#[test]
fn given_missing_file_when_reading_then_source_error_names_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.csv");

    let result = CsvRowSource.read_rows(&path);

    match result {
        Err(InfraError::Source { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected source error, got {other:?}"),
    }
}
