mod console;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use corpusrag_core::config::{resolve_with_base, Config, Settings};
use corpusrag_core::context::preview;
use corpusrag_core::data_processor::DataProcessor;
use corpusrag_core::traits::ChatProvider;
use corpusrag_core::types::RagContext;
use corpusrag_embed::{generate_answer, get_default_embedder, OpenAiChat};
use corpusrag_graph::load_knowledge_graph;
use corpusrag_hybrid::{RetrievalEngine, RetrievalMode};
use corpusrag_vector::build_embedded_index;

const PREVIEW_CHARS: usize = 200;
const QUIET_FILTER: &str = "warn,corpusrag_cli=info";
const VERBOSE_FILTER: &str = "info,corpusrag_cli=debug,corpusrag_core=debug,corpusrag_text=debug,\
corpusrag_vector=debug,corpusrag_graph=debug,corpusrag_hybrid=debug,corpusrag_embed=debug";

#[derive(Parser, Debug)]
#[command(name = "corpusrag", about = "Ask questions of a text corpus with keyword, embedding or graph-guided retrieval")]
struct Cli {
    /// Retrieval mode: keyword (1), embedding (2) or graph (3). Prompted when omitted.
    #[arg(short, long)]
    mode: Option<RetrievalMode>,

    /// Log scoring details and print the context sent to the model
    #[arg(short, long)]
    verbose: bool,

    /// Chunks per query (defaults to retrieval.max_chunks_per_query)
    #[arg(long)]
    max_results: Option<usize>,

    /// Retrieve only; never call the chat model
    #[arg(long)]
    no_generate: bool,

    /// Configuration environment (dev, prod, test); defaults to RUST_ENV
    #[arg(long)]
    config_env: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mode = match cli.mode {
        Some(mode) => mode,
        None => console::prompt_mode()?,
    };
    let verbose = cli.verbose || (cli.mode.is_none() && console::prompt_yes_no("Verbose output? [y/N]: ")?);

    let filter = if verbose { VERBOSE_FILTER } else { QUIET_FILTER };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = match cli.config_env.as_deref() {
        Some(env) => Config::load_for_env(env),
        None => Config::load(),
    }
    .context("loading configuration")?;
    let settings = config.settings()?;
    let max_results = cli.max_results.unwrap_or(settings.retrieval.max_chunks_per_query).max(1);
    let base = std::env::current_dir()?;

    let engine = build_engine(&settings, mode, &base).await?;
    let chat = if cli.no_generate { None } else { chat_provider(&settings) };

    println!("\nMode: {mode}. Enter a question, or an empty line to quit.");
    loop {
        let Some(query) = console::prompt("\nQuestion: ")? else { break };
        if query.is_empty() {
            break;
        }
        if let Err(e) = answer(&engine, mode, &query, max_results, verbose, chat.as_deref()).await {
            eprintln!("Query failed: {e:#}");
        }
    }
    println!("Bye.");
    Ok(())
}

async fn build_engine(settings: &Settings, mode: RetrievalMode, base: &Path) -> Result<RetrievalEngine> {
    let corpus_dir = resolve_with_base(base, &settings.corpus.dir);
    let processor = DataProcessor::with_max_chars(settings.corpus.max_chars_per_chunk);
    let docs = processor
        .load_documents(&corpus_dir)
        .with_context(|| format!("loading corpus from {}", corpus_dir.display()))?;
    println!("Loaded {} documents from {}", docs.len(), corpus_dir.display());
    for doc in &docs {
        println!("- {} ({}): {}", doc.id, doc.filename, preview(&doc.content, PREVIEW_CHARS));
    }
    let chunks = processor.chunk_documents(&docs);
    println!("Created {} chunks (max {} chars each)", chunks.len(), settings.corpus.max_chars_per_chunk);

    let mut engine = RetrievalEngine::new(settings.retrieval.clone(), chunks.clone());
    if mode == RetrievalMode::Keyword {
        return Ok(engine);
    }

    let embedder = get_default_embedder(settings)?;
    let cache_path = resolve_with_base(base, &settings.embedding.cache_path);
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} embedding {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    let embedded = build_embedded_index(&chunks, embedder.as_ref(), &cache_path, settings.embedding.batch_size, &spinner)
        .await
        .context("building embedding index")?;
    spinner.finish_with_message(format!("done ({} chunks)", embedded.len()));
    engine = engine.with_embeddings(embedded, embedder);

    if mode == RetrievalMode::Graph {
        let nodes = resolve_with_base(base, &settings.graph.nodes_path);
        let edges = resolve_with_base(base, &settings.graph.edges_path);
        let graph = load_knowledge_graph(&nodes, &edges).await.context("loading knowledge graph")?;
        println!("Knowledge graph: {} nodes, {} edges", graph.nodes().len(), graph.edges().len());
        engine = engine.with_graph(graph);
    }
    Ok(engine)
}

fn chat_provider(settings: &Settings) -> Option<Box<dyn ChatProvider>> {
    match settings.api.resolve_key() {
        Some(key) => Some(Box::new(OpenAiChat::new(&settings.api.base_url, key, &settings.chat.model))),
        None => {
            warn!("no API key configured; answers will not be generated");
            None
        }
    }
}

async fn answer(
    engine: &RetrievalEngine,
    mode: RetrievalMode,
    query: &str,
    max_results: usize,
    verbose: bool,
    chat: Option<&dyn ChatProvider>,
) -> Result<()> {
    let ctx = if mode == RetrievalMode::Graph {
        let graph = engine.graph(query, max_results).await?;
        if verbose {
            let ids = |nodes: &[corpusrag_graph::GraphNode]| nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>().join(", ");
            println!("Matched nodes: {}", ids(&graph.matched_nodes));
            println!("Expanded nodes: {}", ids(&graph.expanded_nodes));
            if graph.used_full_corpus {
                println!("No target documents; searched the whole corpus.");
            } else {
                println!("Target documents: {}", graph.target_doc_ids.iter().cloned().collect::<Vec<_>>().join(", "));
            }
        }
        graph.context
    } else {
        engine.retrieve(mode, query, max_results).await?
    };

    if ctx.is_empty() {
        println!("No relevant chunks found.");
        return Ok(());
    }
    print_results(&ctx);
    if verbose {
        println!("\n=== Context sent to the model ===\n{}\n=== End of context ===", ctx.context_text);
    }
    if let Some(chat) = chat {
        println!("\nGenerating answer with {}...", chat.model_id());
        let reply = generate_answer(chat, &ctx).await?;
        println!("\n{reply}");
    }
    Ok(())
}

fn print_results(ctx: &RagContext) {
    println!("\nTop {} chunks:", ctx.results.len());
    for (i, r) in ctx.results.iter().enumerate() {
        println!(
            "[{}] {}#{} (score {:.4}): {}",
            i + 1,
            r.chunk.doc_id,
            r.chunk.chunk_index,
            r.score,
            preview(&r.chunk.text, PREVIEW_CHARS)
        );
    }
}
