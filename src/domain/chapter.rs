//! Chapter index: one searchable record per top-level chapter.

use tracing::{debug, instrument};

use crate::domain::error::DomainResult;
use crate::domain::row::{leveled_rows, RawRow, Row, RowPolicy};
use crate::domain::tokenizer::{tokens, TokenSet};

/// Search record for a level-0 chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRecord {
    pub code: String,
    pub local_text: String,
    /// Tokens of the chapter's own title
    pub title_tokens: TokenSet,
    /// Title tokens plus the tokens of every descendant line
    pub all_tokens: TokenSet,
}

impl ChapterRecord {
    fn open(row: &Row) -> Self {
        let title_tokens = tokens(&row.local_text);
        Self {
            code: row.code.clone().unwrap_or_default(),
            local_text: row.local_text.clone(),
            all_tokens: title_tokens.clone(),
            title_tokens,
        }
    }

    fn absorb(&mut self, row: &Row) {
        self.all_tokens.extend(tokens(&row.local_text));
    }
}

/// Ordered list of chapter records, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterIndex {
    chapters: Vec<ChapterRecord>,
}

impl ChapterIndex {
    /// Build the index from raw table rows.
    #[instrument(level = "debug", skip(raw), fields(rows = raw.len()))]
    pub fn build(raw: &[RawRow], policy: RowPolicy) -> DomainResult<Self> {
        let rows = leveled_rows(raw, policy)?;
        Ok(Self::from_rows(&rows))
    }

    /// Single forward pass: a level-0 row closes the open chapter and opens a
    /// new one, deeper rows feed the open chapter's content tokens. Rows before
    /// the first chapter belong to nothing and are ignored.
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut chapters = Vec::new();
        let mut current: Option<ChapterRecord> = None;

        for row in rows {
            if row.is_chapter() {
                chapters.extend(current.take());
                current = Some(ChapterRecord::open(row));
            } else if let Some(chapter) = current.as_mut() {
                chapter.absorb(row);
            }
        }
        chapters.extend(current);

        debug!("built chapter index: {} chapters", chapters.len());
        Self { chapters }
    }

    pub fn chapters(&self) -> &[ChapterRecord] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&ChapterRecord> {
        self.chapters.iter().find(|c| c.code == code)
    }
}

impl From<Vec<ChapterRecord>> for ChapterIndex {
    fn from(chapters: Vec<ChapterRecord>) -> Self {
        Self { chapters }
    }
}
