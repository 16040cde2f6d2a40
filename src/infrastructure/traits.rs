//! I/O boundary traits for testability
//!
//! These traits abstract the tariff table source and the external narrowing
//! step, allowing services to be tested with mock implementations.

use std::path::Path;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::{tokens, Candidate, Classification, RawRow};
use crate::infrastructure::{InfraError, InfraResult};

/// Source of leveled tariff rows.
pub trait RowSource: Send + Sync {
    /// Read every record of the table at `path`, in order.
    fn read_rows(&self, path: &Path) -> InfraResult<Vec<RawRow>>;
}

/// Narrowing step: picks one final code out of a candidate list.
pub trait Classifier: Send + Sync {
    /// Choose the best candidate for `query`.
    /// Returns an error message when no choice can be made.
    fn classify(&self, query: &str, candidates: &[Candidate]) -> Result<Classification, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// CSV table with positional columns `level, code, localText, altText`.
#[derive(Debug, Default)]
pub struct CsvRowSource;

impl RowSource for CsvRowSource {
    #[instrument(level = "debug", skip(self))]
    fn read_rows(&self, path: &Path) -> InfraResult<Vec<RawRow>> {
        let source_err = |e: csv::Error| InfraError::Source {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(source_err)?;

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(source_err)?;
            let fields: Vec<&str> = record.iter().collect();
            rows.push(RawRow::from_fields(i + 1, &fields));
        }

        debug!("read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}

/// Offline classifier: the candidate sharing the most words with the query wins.
///
/// Ties go to the more specific (longer) code, then to the earlier candidate.
#[derive(Debug, Default)]
pub struct TokenOverlapClassifier;

impl Classifier for TokenOverlapClassifier {
    fn classify(&self, query: &str, candidates: &[Candidate]) -> Result<Classification, String> {
        let query_tokens = tokens(query);
        if query_tokens.is_empty() {
            return Err("query contains no words".to_string());
        }

        let mut best: Option<((usize, usize), &Candidate, Vec<String>)> = None;
        for candidate in candidates {
            let mut text_tokens = tokens(&candidate.local_text);
            text_tokens.extend(tokens(&candidate.alt_text));

            let matched: Vec<String> = query_tokens.intersection(&text_tokens).cloned().collect();
            if matched.is_empty() {
                continue;
            }

            let digits = candidate.code.chars().filter(|c| c.is_ascii_digit()).count();
            let key = (matched.len(), digits);
            if best.as_ref().map_or(true, |(best_key, _, _)| key > *best_key) {
                best = Some((key, candidate, matched));
            }
        }

        match best {
            Some((_, candidate, matched)) => {
                let reason = format!(
                    "{} of {} query words found in \"{}\": {}",
                    matched.len(),
                    query_tokens.len(),
                    candidate.local_text,
                    matched.iter().join(", ")
                );
                Ok(Classification::from_response(&candidate.code, reason))
            }
            None => Err("no candidate shares a word with the query".to_string()),
        }
    }
}
