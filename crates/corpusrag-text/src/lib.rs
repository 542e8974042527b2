//! corpusrag-text
//!
//! TF-IDF style keyword scoring over raw chunk text. Terms are matched as
//! lowercase substrings, so no index is built; see `scorer`.

pub mod scorer;

pub use scorer::{LexicalScorer, TermWeight};
