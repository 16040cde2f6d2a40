//! Text normalization into word-token sets.
//!
//! Tokens are maximal runs of lowercase Latin letters, including the Vietnamese
//! diacritic letters used in tariff descriptions, bounded by word boundaries.
//! A run glued to a digit or underscore (`abc123`) has no boundary and yields nothing.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Set of distinct, lowercased word tokens.
pub type TokenSet = BTreeSet<String>;

/// Word pattern: plain a-z plus the precomposed Vietnamese letters.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b[a-zàáảãạâầấẩẫậăằắẳẵặèéẻẽẹêềếểễệìíỉĩịòóỏõọôồốổỗộơờớởỡợùúủũụưừứửữựỳýỷỹỵđ]+\b",
    )
    .unwrap()
});

/// Tokenize optional text. `None` and empty text both yield the empty set.
pub fn tokenize(text: Option<&str>) -> TokenSet {
    match text {
        Some(t) => tokens(t),
        None => TokenSet::new(),
    }
}

/// Tokenize text into its set of distinct lowercase words.
pub fn tokens(text: &str) -> TokenSet {
    if text.is_empty() {
        return TokenSet::new();
    }
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
