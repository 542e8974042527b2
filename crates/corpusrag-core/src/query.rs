//! Shared query tokenizer used by lexical scoring and graph node matching.

use std::collections::HashSet;

pub const STOPWORDS: &[&str] = &[
    "the", "and", "for", "that", "with", "this", "from", "have", "your", "you", "are", "was", "were", "but", "not",
    "can", "will", "would", "could", "should", "into", "about", "what", "when", "where", "which", "how", "why",
    "then", "than", "their", "there", "here", "them", "they", "our", "out", "all", "any", "just", "like", "more",
    "some", "such", "also", "its", "over", "under", "between", "in", "on", "of", "to", "as", "at", "by", "is", "it",
    "a", "an",
];

pub const DEFAULT_MIN_TERM_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    pub remove_stopwords: bool,
    pub min_len: usize,
}

impl TokenizeOptions {
    /// Lexical scoring: stopwords dropped.
    pub fn lexical() -> Self {
        Self { remove_stopwords: true, min_len: DEFAULT_MIN_TERM_LEN }
    }

    /// Graph matching: stopwords kept, entity names may contain them.
    pub fn entity() -> Self {
        Self { remove_stopwords: false, min_len: DEFAULT_MIN_TERM_LEN }
    }
}

pub fn is_stopword(term: &str) -> bool {
    STOPWORDS.contains(&term)
}

/// Lowercase, split on non-word characters (anything but ASCII alphanumerics
/// and `_`), drop short tokens and optionally stopwords, deduplicate keeping
/// first occurrence.
pub fn tokenize_query(query: &str, options: TokenizeOptions) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut seen = HashSet::new();
    lowered
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= options.min_len)
        .filter(|t| !(options.remove_stopwords && is_stopword(t)))
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}
