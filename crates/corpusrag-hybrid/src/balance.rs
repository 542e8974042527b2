use std::collections::{BTreeSet, HashMap, HashSet};

use corpusrag_core::types::ScoredChunk;

/// `max(1, floor(max_results / target_count))`.
pub fn per_doc_limit(max_results: usize, target_count: usize) -> usize {
    (max_results / target_count.max(1)).max(1)
}

/// Pick up to `max_results` chunks from a rank-ordered pool, spreading them
/// over `targets`.
///
/// The primary pass admits chunks from target documents while each stays
/// under [`per_doc_limit`]. If that leaves room, a backfill pass walks the
/// pool again in rank order and admits anything not yet taken, whatever its
/// document. No chunk appears twice.
pub fn balance(pool: &[ScoredChunk], targets: &BTreeSet<String>, max_results: usize) -> Vec<ScoredChunk> {
    let limit = per_doc_limit(max_results, targets.len());
    let mut taken: HashSet<(&str, usize)> = HashSet::new();
    let mut per_doc: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::with_capacity(max_results.min(pool.len()));

    for candidate in pool {
        if out.len() >= max_results {
            break;
        }
        let doc = candidate.chunk.doc_id.as_str();
        if !targets.contains(doc) || taken.contains(&candidate.chunk.key()) {
            continue;
        }
        let count = per_doc.entry(doc).or_insert(0);
        if *count >= limit {
            continue;
        }
        *count += 1;
        taken.insert(candidate.chunk.key());
        out.push(candidate.clone());
    }

    for candidate in pool {
        if out.len() >= max_results {
            break;
        }
        if taken.insert(candidate.chunk.key()) {
            out.push(candidate.clone());
        }
    }
    out
}
