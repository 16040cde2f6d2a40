//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations found while building the tariff structures.
/// Absence of a match is not an error and never shows up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed row at line {line}: level {value:?} is not a number")]
    MalformedRow { line: usize, value: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
