//! Question-answering server binary
//!
//! Run with: cargo run -p frontdesk-rag --bin frontdesk-rag-server -- --config frontdesk.toml

use anyhow::Context;
use clap::Parser;
use frontdesk_rag::{
    config::{RagConfig, DEFAULT_ENV_FILE},
    ingestion::FileExtractor,
    providers::GeminiClient,
    server::RagServer,
    RagEngine,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "frontdesk-rag-server", version, about = "Receptionist Q&A over a single document")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "FRONTDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Dotenv file with secrets such as GEMINI_API_KEY (optional)
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frontdesk_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = RagConfig::load(args.config.as_deref(), Some(&args.env_file))?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Document: {}", config.document.path.display());
    tracing::info!(
        "  - Chunk size: {} words (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Top-k: {} ({:?} scorer)", config.retrieval.top_k, config.retrieval.scorer);
    tracing::info!("  - LLM model: {}", config.llm.model);

    let llm = Arc::new(GeminiClient::new(&config.llm)?);
    let engine = Arc::new(RagEngine::new(&config, llm)?);

    // The listener is not bound until the document is in.
    let loader = Arc::clone(&engine);
    let source = config.document.path.clone();
    tokio::task::spawn_blocking(move || loader.load_document(&FileExtractor::new(), &source))
        .await
        .context("document loader panicked")?
        .context("startup aborted")?;

    let server = RagServer::new(config.server.clone(), engine);

    println!("\nServer starting...");
    println!("  API: http://{}/rag", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
