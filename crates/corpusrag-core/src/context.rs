//! Renders ranked chunks into the evidence block passed to generation.

use crate::types::{RagContext, ScoredChunk};

pub const SOURCE_SEPARATOR: &str = "\n\n--------------------\n\n";

/// Order-preserving, side-effect-free rendering of `results`.
///
/// Each result becomes a block:
///
/// ```text
/// Source N
/// doc: <doc_id>
/// chunkIndex: <chunk_index>
/// score: <score>
///
/// <trimmed text>
/// ```
///
/// Blocks are joined by [`SOURCE_SEPARATOR`]; no results yields an empty string.
pub fn assemble_context(query: &str, results: Vec<ScoredChunk>) -> RagContext {
    let context_text = results
        .iter()
        .enumerate()
        .map(|(i, r)| render_source(i + 1, r))
        .collect::<Vec<_>>()
        .join(SOURCE_SEPARATOR);
    RagContext { query: query.to_string(), results, context_text }
}

fn render_source(n: usize, result: &ScoredChunk) -> String {
    format!(
        "Source {}\ndoc: {}\nchunkIndex: {}\nscore: {}\n\n{}",
        n,
        result.chunk.doc_id,
        result.chunk.chunk_index,
        result.score,
        result.chunk.text.trim()
    )
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Short single-line preview, suffixed with `...` when truncated.
pub fn preview(text: &str, max_chars: usize) -> String {
    let normalized = collapse_whitespace(text);
    if normalized.chars().count() <= max_chars {
        return normalized;
    }
    let mut out: String = normalized.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn scored(doc: &str, idx: usize, text: &str, score: f64) -> ScoredChunk {
        ScoredChunk { chunk: Chunk::new(doc, idx, text), score }
    }

    #[test]
    fn empty_results_render_empty_text() {
        let ctx = assemble_context("anything", vec![]);
        assert_eq!(ctx.context_text, "");
        assert_eq!(ctx.query, "anything");
        assert!(ctx.results.is_empty());
    }

    #[test]
    fn renders_one_block_per_result_in_order() {
        let results = vec![scored("b", 2, "  second text \n", 0.5), scored("a", 0, "first", 0.25)];
        let ctx = assemble_context("q", results.clone());
        assert_eq!(ctx.results, results);
        let blocks: Vec<&str> = ctx.context_text.split(SOURCE_SEPARATOR).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "Source 1\ndoc: b\nchunkIndex: 2\nscore: 0.5\n\nsecond text");
        assert_eq!(blocks[1], "Source 2\ndoc: a\nchunkIndex: 0\nscore: 0.25\n\nfirst");
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        assert_eq!(preview("a  b\n\nc", 10), "a b c");
        assert_eq!(preview("abcdef", 3), "abc...");
    }
}
