use proptest::prelude::*;

use corpusrag_core::types::Chunk;
use corpusrag_text::LexicalScorer;

const VOCAB: &[&str] = &["melody", "harmony", "rhythm", "cadence", "tonic", "the", "and", "motif", "ostinato"];

fn chunk_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 1..40).prop_map(|words| words.join(" "))
}

fn corpus() -> impl Strategy<Value = Vec<Chunk>> {
    prop::collection::vec(chunk_text(), 1..20)
        .prop_map(|texts| texts.into_iter().enumerate().map(|(i, t)| Chunk::new(format!("d{}", i % 3), i, t)).collect())
}

fn query() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 1..4).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn results_are_sorted_and_respect_min_length(chunks in corpus(), q in query(), k in 1usize..10) {
        let scorer = LexicalScorer::default();
        let results = scorer.score(&chunks, &q, k);
        prop_assert!(results.len() <= k);
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for r in &results {
            prop_assert!(r.score > 0.0);
            prop_assert!(r.chunk.text.trim().chars().count() >= scorer.min_chars());
        }
    }

    #[test]
    fn scoring_is_deterministic(chunks in corpus(), q in query()) {
        let scorer = LexicalScorer::default();
        prop_assert_eq!(scorer.score(&chunks, &q, 8), scorer.score(&chunks, &q, 8));
    }
}

#[test]
fn stopword_query_returns_empty_sequence() {
    let chunks = vec![Chunk::new("a", 0, "the and the and ".repeat(10))];
    assert!(LexicalScorer::default().score(&chunks, "the and", 5).is_empty());
}
