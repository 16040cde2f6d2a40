//! Leveled rows of the tariff table.
//!
//! The table is a pre-order listing of the hierarchy: every row carries its
//! indentation level, an optional HS code and two descriptions.

use tracing::{debug, warn};

use crate::domain::error::{DomainError, DomainResult};

const BOM: char = '\u{feff}';

/// Untyped row as read from the tabular source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    /// 1-based record number in the source
    pub line: usize,
    pub level: String,
    pub code: String,
    pub local_text: String,
    pub alt_text: String,
}

impl RawRow {
    pub fn new(line: usize, level: &str, code: &str, local_text: &str, alt_text: &str) -> Self {
        Self {
            line,
            level: level.to_string(),
            code: code.to_string(),
            local_text: local_text.to_string(),
            alt_text: alt_text.to_string(),
        }
    }

    /// Build from positional fields `[level, code, localText, altText]`.
    /// Missing trailing fields read as empty.
    pub fn from_fields<S: AsRef<str>>(line: usize, fields: &[S]) -> Self {
        let field = |i: usize| fields.get(i).map(|f| f.as_ref()).unwrap_or("");
        Self::new(line, field(0), field(1), field(2), field(3))
    }

    /// A header row names its first column `level`.
    pub fn is_header(&self) -> bool {
        self.level
            .trim_start_matches(BOM)
            .trim()
            .eq_ignore_ascii_case("level")
    }
}

/// Typed row consumed by the tree builder and the chapter index builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub level: u32,
    /// `None` when the code column is blank
    pub code: Option<String>,
    pub local_text: String,
    pub alt_text: String,
}

/// What to do with a row whose level is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Drop the row and keep building
    #[default]
    Skip,
    /// Abort the build with `DomainError::MalformedRow`
    Strict,
}

/// Parse a level field. Accepts integer and float notation ("2", "0.0"),
/// truncating toward zero. Negative and non-finite values are rejected.
pub fn parse_level(field: &str) -> Option<u32> {
    let field = field.trim_start_matches(BOM).trim();
    if let Ok(level) = field.parse::<u32>() {
        return Some(level);
    }
    let value = field.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < 0.0 || truncated > f64::from(u32::MAX) {
        return None;
    }
    Some(truncated as u32)
}

/// Trim whitespace and trailing separator colons from a description.
pub fn clean_text(text: &str) -> String {
    text.trim().trim_end_matches(':').to_string()
}

impl Row {
    /// Type a raw row. Returns `None` when the level is not a number.
    pub fn parse(raw: &RawRow) -> Option<Self> {
        let level = parse_level(&raw.level)?;
        let code = raw.code.trim();
        Some(Self {
            line: raw.line,
            level,
            code: (!code.is_empty()).then(|| code.to_string()),
            local_text: clean_text(&raw.local_text),
            alt_text: clean_text(&raw.alt_text),
        })
    }

    pub fn is_chapter(&self) -> bool {
        self.level == 0
    }
}

/// Type the retained rows of a table, in order.
///
/// Skips a leading header row and rows with a blank level. Rows with an
/// unparseable level are dropped or reported according to `policy`.
pub fn leveled_rows(raw: &[RawRow], policy: RowPolicy) -> DomainResult<Vec<Row>> {
    let body = match raw.first() {
        Some(first) if first.is_header() => &raw[1..],
        _ => raw,
    };

    let mut rows = Vec::with_capacity(body.len());
    for record in body {
        if record.level.trim_start_matches(BOM).trim().is_empty() {
            debug!("skipping row {}: blank level", record.line);
            continue;
        }
        match Row::parse(record) {
            Some(row) => rows.push(row),
            None => match policy {
                RowPolicy::Skip => {
                    warn!(
                        "skipping malformed row {}: level {:?}",
                        record.line, record.level
                    );
                }
                RowPolicy::Strict => {
                    return Err(DomainError::MalformedRow {
                        line: record.line,
                        value: record.level.clone(),
                    });
                }
            },
        }
    }
    Ok(rows)
}
