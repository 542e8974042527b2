use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use corpusrag_core::config::RetrievalSettings;
use corpusrag_core::context::assemble_context;
use corpusrag_core::error::Error;
use corpusrag_core::traits::EmbedProvider;
use corpusrag_core::types::{Chunk, EmbeddedChunk, RagContext};
use corpusrag_graph::{GraphExpander, GraphNode, KnowledgeGraph};
use corpusrag_text::LexicalScorer;
use corpusrag_vector::SemanticScorer;

use crate::balance::balance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalMode {
    Keyword,
    Embedding,
    #[default]
    Graph,
}

impl FromStr for RetrievalMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "keyword" | "lexical" => Ok(Self::Keyword),
            "2" | "embedding" | "semantic" => Ok(Self::Embedding),
            "3" | "graph" | "graph-rag" => Ok(Self::Graph),
            other => Err(Error::InvalidConfig(format!("unknown retrieval mode '{other}'"))),
        }
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keyword => "keyword",
            Self::Embedding => "embedding",
            Self::Graph => "graph",
        })
    }
}

/// Graph-mode result: the assembled context plus the nodes that steered it.
#[derive(Debug, Clone, Default)]
pub struct GraphRagContext {
    pub context: RagContext,
    pub matched_nodes: Vec<GraphNode>,
    pub expanded_nodes: Vec<GraphNode>,
    pub target_doc_ids: BTreeSet<String>,
    /// True when no work node resolved to a document and the whole corpus was searched.
    /// Targets without embedded chunks still restrict the search, possibly to nothing.
    pub used_full_corpus: bool,
}

/// Owns the read-only corpus state shared by every query: chunks, their
/// embeddings and (for graph mode) the knowledge graph.
pub struct RetrievalEngine {
    settings: RetrievalSettings,
    chunks: Vec<Chunk>,
    embedded: Vec<EmbeddedChunk>,
    embedder: Option<Box<dyn EmbedProvider>>,
    expander: Option<GraphExpander>,
    lexical: LexicalScorer,
    semantic: SemanticScorer,
}

impl RetrievalEngine {
    /// Keyword-only engine; attach embeddings and a graph for the other modes.
    pub fn new(settings: RetrievalSettings, chunks: Vec<Chunk>) -> Self {
        let lexical = LexicalScorer::new(settings.min_chars_for_retrieval);
        Self {
            settings,
            chunks,
            embedded: Vec::new(),
            embedder: None,
            expander: None,
            lexical,
            semantic: SemanticScorer::new(),
        }
    }

    /// `embedder` must be the model that produced `embedded`; it embeds queries.
    pub fn with_embeddings(mut self, embedded: Vec<EmbeddedChunk>, embedder: Box<dyn EmbedProvider>) -> Self {
        self.embedded = embedded;
        self.embedder = Some(embedder);
        self
    }

    pub fn with_graph(mut self, graph: KnowledgeGraph) -> Self {
        self.expander = Some(GraphExpander::new(graph).with_seed_limit(self.settings.graph_seed_limit));
        self
    }

    pub fn default_max_results(&self) -> usize {
        self.settings.max_chunks_per_query
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub async fn retrieve(&self, mode: RetrievalMode, query: &str, max_results: usize) -> Result<RagContext> {
        match mode {
            RetrievalMode::Keyword => Ok(self.lexical(query, max_results)),
            RetrievalMode::Embedding => self.semantic(query, max_results).await,
            RetrievalMode::Graph => Ok(self.graph(query, max_results).await?.context),
        }
    }

    pub fn lexical(&self, query: &str, max_results: usize) -> RagContext {
        let query = query.trim();
        if query.is_empty() {
            return RagContext::empty();
        }
        let results = self.lexical.score(&self.chunks, query, max_results);
        debug!(results = results.len(), "keyword retrieval");
        assemble_context(query, results)
    }

    pub async fn semantic(&self, query: &str, max_results: usize) -> Result<RagContext> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(RagContext::empty());
        }
        let query_vector = self.embed_query(query).await?;
        let results = self.semantic.score(&self.embedded, &query_vector, max_results)?;
        debug!(results = results.len(), "embedding retrieval");
        Ok(assemble_context(query, results))
    }

    /// Embedding search over the documents the knowledge graph ties to the
    /// query, or over the whole corpus when it ties to none. With several
    /// target documents the ranked pool is balanced across them; otherwise the
    /// pool's best `max_results` are used.
    pub async fn graph(&self, query: &str, max_results: usize) -> Result<GraphRagContext> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(GraphRagContext::default());
        }
        let expander = self
            .expander
            .as_ref()
            .ok_or_else(|| Error::InvalidConfig("graph retrieval needs a knowledge graph".into()))?;
        let expansion = expander.expand(query);

        let used_full_corpus = expansion.target_doc_ids.is_empty();
        let candidates: Vec<&EmbeddedChunk> = self
            .embedded
            .iter()
            .filter(|ec| used_full_corpus || expansion.target_doc_ids.contains(&ec.chunk.doc_id))
            .collect();
        info!(
            targets = ?expansion.target_doc_ids,
            candidates = candidates.len(),
            full_corpus = used_full_corpus,
            "graph candidate set"
        );

        let query_vector = self.embed_query(query).await?;
        let pool_size = max_results.saturating_mul(self.settings.graph_pool_factor.max(1));
        let mut pool = self.semantic.score(candidates, &query_vector, pool_size)?;

        let results = if expansion.target_doc_ids.len() > 1 {
            let balanced = balance(&pool, &expansion.target_doc_ids, max_results);
            debug!(pool = pool.len(), selected = balanced.len(), "balanced across target documents");
            balanced
        } else {
            pool.truncate(max_results);
            pool
        };

        Ok(GraphRagContext {
            context: assemble_context(query, results),
            matched_nodes: expansion.seeds.iter().map(|n| (*n).clone()).collect(),
            expanded_nodes: expansion.nodes.iter().map(|n| (*n).clone()).collect(),
            target_doc_ids: expansion.target_doc_ids,
            used_full_corpus,
        })
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or_else(|| Error::InvalidConfig("embedding retrieval needs an embedding provider".into()))?;
        embedder
            .embed(query)
            .await
            .with_context(|| format!("embedding query with {}", embedder.model_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse_from_menu_numbers_and_names() {
        assert_eq!("1".parse::<RetrievalMode>().unwrap(), RetrievalMode::Keyword);
        assert_eq!(" Embedding ".parse::<RetrievalMode>().unwrap(), RetrievalMode::Embedding);
        assert_eq!("3".parse::<RetrievalMode>().unwrap(), RetrievalMode::Graph);
        assert!("4".parse::<RetrievalMode>().is_err());
        assert_eq!(RetrievalMode::default().to_string(), "graph");
    }
}
