use tracing::debug;

use corpusrag_core::query::{tokenize_query, TokenizeOptions};
use corpusrag_core::types::{Chunk, ScoredChunk};

pub const DEFAULT_MIN_CHARS_FOR_RETRIEVAL: usize = 80;

/// IDF weight of one query term over the candidate set.
#[derive(Debug, Clone, PartialEq)]
pub struct TermWeight {
    pub term: String,
    pub document_frequency: usize,
    pub idf: f64,
}

/// Keyword scorer: `sum(occurrences(term) * ln(N / df(term)))` over query terms.
///
/// Chunks whose trimmed text is shorter than `min_chars` are not candidates at
/// all and do not count towards `N`.
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    min_chars: usize,
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self { min_chars: DEFAULT_MIN_CHARS_FOR_RETRIEVAL }
    }
}

impl LexicalScorer {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Ranked chunks, highest score first. Equal scores keep corpus order.
    pub fn score(&self, chunks: &[Chunk], query: &str, max_results: usize) -> Vec<ScoredChunk> {
        let terms = tokenize_query(query, TokenizeOptions::lexical());
        if terms.is_empty() {
            return Vec::new();
        }

        let candidates: Vec<(&Chunk, String)> = chunks
            .iter()
            .filter(|c| c.text.trim().chars().count() >= self.min_chars)
            .map(|c| (c, c.text.to_lowercase()))
            .collect();

        let weights = term_weights(&terms, candidates.iter().map(|(_, lower)| lower.as_str()));
        if weights.is_empty() {
            return Vec::new();
        }
        for w in &weights {
            debug!(term = %w.term, df = w.document_frequency, candidates = candidates.len(), idf = w.idf, "lexical term weight");
        }

        let mut scored: Vec<ScoredChunk> = candidates
            .iter()
            .filter_map(|(chunk, lower)| {
                let score: f64 = weights
                    .iter()
                    .map(|w| count_occurrences(lower, &w.term) as f64 * w.idf)
                    .sum();
                (score > 0.0).then(|| ScoredChunk { chunk: (*chunk).clone(), score })
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(max_results);
        scored
    }

    /// Per-term document frequency and IDF over the eligible chunks; terms
    /// found nowhere are omitted.
    pub fn weights(&self, chunks: &[Chunk], query: &str) -> Vec<TermWeight> {
        let terms = tokenize_query(query, TokenizeOptions::lexical());
        let lowered: Vec<String> = chunks
            .iter()
            .filter(|c| c.text.trim().chars().count() >= self.min_chars)
            .map(|c| c.text.to_lowercase())
            .collect();
        term_weights(&terms, lowered.iter().map(String::as_str))
    }
}

fn term_weights<'a, I>(terms: &[String], texts: I) -> Vec<TermWeight>
where
    I: Iterator<Item = &'a str> + Clone,
{
    let total = texts.clone().count();
    terms
        .iter()
        .filter_map(|term| {
            let df = texts.clone().filter(|t| t.contains(term.as_str())).count();
            (df > 0).then(|| TermWeight {
                term: term.clone(),
                document_frequency: df,
                idf: (total as f64 / df as f64).ln(),
            })
        })
        .collect()
}

/// Non-overlapping occurrences; each match resumes the scan after itself.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long(doc: &str, idx: usize, body: &str) -> Chunk {
        // pad past the retrieval threshold without introducing query terms
        Chunk::new(doc, idx, format!("{body} {}", "lorem ipsum dolor sit amet ".repeat(4)))
    }

    #[test]
    fn counts_non_overlapping_matches() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("banana", "ana"), 1);
        assert_eq!(count_occurrences("abc", "zzz"), 0);
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let chunks = vec![
            long("a", 0, "melody melody harmony"),
            long("b", 0, "melody"),
            long("c", 0, "rhythm"),
        ];
        let scorer = LexicalScorer::default();
        let results = scorer.score(&chunks, "melody harmony", 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.doc_id, "a");
        let idf_melody = (3.0f64 / 2.0).ln();
        let idf_harmony = 3.0f64.ln();
        assert!((results[0].score - (2.0 * idf_melody + idf_harmony)).abs() < 1e-12);
        assert!((results[1].score - idf_melody).abs() < 1e-12);
    }

    #[test]
    fn short_chunks_are_never_candidates() {
        let chunks = vec![Chunk::new("a", 0, "melody"), long("b", 0, "melody"), long("c", 0, "other")];
        let results = LexicalScorer::default().score(&chunks, "melody", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.doc_id, "b");
    }

    #[test]
    fn ubiquitous_terms_contribute_nothing() {
        let chunks = vec![long("a", 0, "theme motif"), long("b", 0, "theme")];
        let results = LexicalScorer::default().score(&chunks, "theme motif", 10);
        // "theme" is everywhere (idf 0); only the motif chunk scores
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.doc_id, "a");
    }

    #[test]
    fn stopword_only_query_yields_nothing() {
        let chunks = vec![long("a", 0, "the and with")];
        assert!(LexicalScorer::default().score(&chunks, "the and with", 5).is_empty());
    }

    #[test]
    fn ties_keep_corpus_order_and_truncate() {
        let chunks = vec![
            long("a", 0, "fugue"),
            long("b", 0, "fugue"),
            long("c", 0, "fugue"),
            long("d", 0, "canon"),
        ];
        let results = LexicalScorer::default().score(&chunks, "fugue", 2);
        let docs: Vec<&str> = results.iter().map(|r| r.chunk.doc_id.as_str()).collect();
        assert_eq!(docs, vec!["a", "b"]);
    }

    #[test]
    fn weights_report_df_and_idf() {
        let chunks = vec![long("a", 0, "fugue"), long("b", 0, "canon")];
        let w = LexicalScorer::default().weights(&chunks, "fugue sonata");
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].term, "fugue");
        assert_eq!(w[0].document_frequency, 1);
        assert!((w[0].idf - 2.0f64.ln()).abs() < 1e-12);
    }
}
