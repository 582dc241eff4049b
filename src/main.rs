use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::watch;

use sage_core::{AnswerEngine, Config};
use sage_gateway::GatewayServer;
use sage_llm::ollama::{GenerationLimits, OllamaProvider};
use sage_memory::document::{IngestionPipeline, SplitterConfig, WordSplitter};
use sage_memory::{ChunkStore, Retriever};

#[derive(Debug, Parser)]
#[command(
    name = "sage",
    version,
    about = "Retrieval-augmented question answering over forum and markdown corpora"
)]
struct Cli {
    /// Path to the TOML configuration file. Falls back to `SAGE_CONFIG`,
    /// then to `config/default.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chunk, embed, and store both corpora.
    Ingest {
        /// Override the discourse export path from the config.
        #[arg(long)]
        discourse: Option<PathBuf>,
        /// Override the markdown directory from the config.
        #[arg(long)]
        markdown: Option<PathBuf>,
    },
    /// Serve the question-answering HTTP API.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let config = Config::load(&config_path)?;
    config.validate()?;

    match cli.command {
        Command::Ingest {
            discourse,
            markdown,
        } => run_ingest(&config, discourse, markdown).await,
        Command::Serve => run_serve(&config).await,
    }
}

async fn run_ingest(
    config: &Config,
    discourse: Option<PathBuf>,
    markdown: Option<PathBuf>,
) -> anyhow::Result<()> {
    let provider = Arc::new(build_provider(config));
    health_check(&provider).await;

    let store = ChunkStore::new(&config.store.sqlite_path).await?;
    let splitter = WordSplitter::new(SplitterConfig {
        window_size: config.chunking.window_size,
        overlap: config.chunking.overlap,
    })?;
    let pipeline = IngestionPipeline::new(splitter, store, provider);

    let discourse_path =
        discourse.unwrap_or_else(|| PathBuf::from(&config.ingest.discourse_path));
    let markdown_dir = markdown.unwrap_or_else(|| PathBuf::from(&config.ingest.markdown_dir));

    let report = pipeline.run(&discourse_path, &markdown_dir).await;
    tracing::info!(
        discourse = report.discourse_chunks,
        markdown = report.markdown_chunks,
        "ingestion complete"
    );
    println!(
        "ingested {} discourse chunk(s), {} markdown chunk(s)",
        report.discourse_chunks, report.markdown_chunks
    );
    Ok(())
}

async fn run_serve(config: &Config) -> anyhow::Result<()> {
    let provider = Arc::new(build_provider(config));
    health_check(&provider).await;

    let store = ChunkStore::new(&config.store.sqlite_path).await?;
    let retriever = Retriever::new(store);
    let engine = Arc::new(AnswerEngine::new(
        provider,
        retriever,
        config.retrieval.top_k,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    GatewayServer::new(&config.gateway.bind, config.gateway.port, engine, shutdown_rx)
        .with_max_body_size(config.gateway.max_body_size)
        .serve()
        .await?;
    Ok(())
}

fn build_provider(config: &Config) -> OllamaProvider {
    OllamaProvider::new(
        &config.llm.base_url,
        config.llm.model.clone(),
        config.llm.embedding_model.clone(),
    )
    .with_limits(GenerationLimits {
        max_tokens: config.llm.max_tokens,
        context_length: config.llm.context_length,
        stop: config.llm.stop.clone(),
    })
}

async fn health_check(provider: &OllamaProvider) {
    match provider.health_check().await {
        Ok(()) => tracing::info!("ollama health check passed"),
        Err(e) => tracing::warn!("ollama health check failed: {e:#}"),
    }
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Priority: `--config` > `SAGE_CONFIG` env > `config/default.toml`.
fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_path {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("SAGE_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}
