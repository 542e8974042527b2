//! Configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_RETRIEVAL__MAX_CHUNKS_PER_QUERY`).
//! Settings are extracted once at startup and passed to the engine explicitly.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Build from an explicit figment, bypassing file discovery.
    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.corpus.max_chars_per_chunk == 0 {
            return Err(Error::InvalidConfig("corpus.max_chars_per_chunk must be > 0".into()).into());
        }
        if settings.retrieval.max_chunks_per_query == 0 {
            return Err(Error::InvalidConfig("retrieval.max_chunks_per_query must be > 0".into()).into());
        }
        if settings.embedding.batch_size == 0 {
            return Err(Error::InvalidConfig("embedding.batch_size must be > 0".into()).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub chat: ChatSettings,
    pub api: ApiSettings,
    pub graph: GraphSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub dir: String,
    pub max_chars_per_chunk: usize,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self { dir: "data/corpus".to_string(), max_chars_per_chunk: 1200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub max_chunks_per_query: usize,
    /// Chunks whose trimmed text is shorter than this never enter lexical scoring.
    pub min_chars_for_retrieval: usize,
    pub graph_seed_limit: usize,
    /// Graph mode asks the semantic scorer for `max_results * graph_pool_factor` candidates.
    pub graph_pool_factor: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { max_chunks_per_query: 8, min_chars_for_retrieval: 80, graph_seed_limit: 5, graph_pool_factor: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model: String,
    pub cache_path: String,
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model: "text-embedding-3-small".to_string(), cache_path: "data/embeddings.json".to_string(), batch_size: 96 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub model: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self { model: "gpt-5-nano".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub key: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self { base_url: "https://api.openai.com/v1".to_string(), key: None }
    }
}

impl ApiSettings {
    /// Configured key, else `OPENAI_API_KEY` from the environment.
    pub fn resolve_key(&self) -> Option<String> {
        self.key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub nodes_path: String,
    pub edges_path: String,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self { nodes_path: "data/graph_nodes.json".to_string(), edges_path: "data/graph_edges.json".to_string() }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
