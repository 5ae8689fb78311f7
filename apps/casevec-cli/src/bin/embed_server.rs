use clap::Parser;
use std::sync::Arc;
use tracing::info;

use casevec_cli::init_tracing;
use casevec_core::config::Config;
use casevec_embed::get_default_embedder;
use casevec_server::{serve, AppState};

#[derive(Parser)]
#[command(name = "casevec-embed-server", about = "Serve sentence embeddings over HTTP")]
struct Cli {
    /// Address to listen on (overrides `server.bind`).
    #[arg(long)]
    bind: Option<String>,

    /// Model checkpoint directory (overrides `server.model_dir`).
    #[arg(long)]
    model_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.server()?;
    if let Some(bind) = cli.bind { settings.bind = bind; }
    if let Some(dir) = cli.model_dir { settings.model_dir = dir; }

    info!(model_dir = %settings.model_dir, max_tokens = settings.max_tokens, "loading embedding model");
    let embedder = get_default_embedder(&settings)?;
    serve(&settings.bind, AppState::new(Arc::from(embedder))).await
}
