//! Domain entities: records exchanged with the narrowing step

use serde::{Deserialize, Serialize};

use crate::domain::arena::NodeData;

/// Default number of candidates handed to a classifier.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 150;

/// One flattened descendant of a matched chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// HS code, empty for grouping lines without one
    pub code: String,
    pub local_text: String,
    pub alt_text: String,
}

impl From<&NodeData> for Candidate {
    fn from(data: &NodeData) -> Self {
        Self {
            code: data.code.clone().unwrap_or_default(),
            local_text: data.local_text.clone(),
            alt_text: data.alt_text.clone(),
        }
    }
}

impl Candidate {
    /// Whether the code carries at least one digit.
    pub fn has_numeric_code(&self) -> bool {
        self.code.chars().any(|c| c.is_ascii_digit())
    }
}

/// Select the candidates worth sending to a classifier: coded lines only,
/// in order, at most `limit` of them.
pub fn candidate_context(candidates: &[Candidate], limit: usize) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|c| c.has_numeric_code())
        .take(limit)
        .cloned()
        .collect()
}

/// Final code picked by a classifier, with its justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Digits only
    pub code: String,
    pub reason: String,
}

impl Classification {
    /// Normalize a classifier response: every non-digit is stripped from the code.
    /// Length and checksum are not validated.
    pub fn from_response(raw_code: &str, reason: impl Into<String>) -> Self {
        Self {
            code: raw_code.chars().filter(|c| c.is_ascii_digit()).collect(),
            reason: reason.into(),
        }
    }
}
