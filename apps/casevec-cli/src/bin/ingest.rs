use clap::{Parser, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use casevec_cli::init_tracing;
use casevec_core::config::{expand_path, Config, DedupFailurePolicy, ProfileKind};
use casevec_core::field_mapping::FieldMapping;
use casevec_core::source::{read_records_from_path, SourceOptions};
use casevec_vector::{EmbedProvider, IngestProfile, LocalProvider, Pipeline, PipelineOptions, QdrantClient, RemoteProvider};

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg { Content, Title }

impl From<ProfileArg> for ProfileKind {
    fn from(p: ProfileArg) -> Self {
        match p { ProfileArg::Content => ProfileKind::Content, ProfileArg::Title => ProfileKind::Title }
    }
}

#[derive(Parser)]
#[command(name = "casevec-ingest", about = "Embed CSV rows and upsert them into a Qdrant collection")]
struct Cli {
    /// CSV or TSV file (defaults to `ingest.input_path`).
    input: Option<PathBuf>,

    /// Which columns to embed and deduplicate on.
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    #[arg(long)]
    collection: Option<String>,

    /// Qdrant base URL.
    #[arg(long)]
    store_url: Option<String>,

    /// Embedding service endpoint.
    #[arg(long)]
    embed_url: Option<String>,

    /// Embed in-process instead of calling the embedding service.
    #[arg(long)]
    local: bool,

    /// Skip rows whose text column is blank, whatever the profile's default.
    #[arg(long, conflicts_with = "no_skip_blank")]
    skip_blank: bool,

    /// Embed blank rows too, whatever the profile's default.
    #[arg(long)]
    no_skip_blank: bool,

    /// Skip rows whose duplicate check fails instead of inserting them.
    #[arg(long)]
    fail_closed: bool,

    /// Pause after each upsert, in milliseconds.
    #[arg(long)]
    throttle_ms: Option<u64>,

    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.ingest()?;
    if let Some(p) = cli.profile { settings.profile = p.into(); }
    if let Some(c) = cli.collection { settings.collection = c; }
    if let Some(u) = cli.store_url { settings.store_url = u; }
    if let Some(u) = cli.embed_url { settings.embed_url = u; }
    if let Some(ms) = cli.throttle_ms { settings.throttle_ms = ms; }
    if cli.skip_blank { settings.skip_blank = Some(true); }
    if cli.no_skip_blank { settings.skip_blank = Some(false); }
    if cli.fail_closed { settings.on_dedup_error = DedupFailurePolicy::FailClosed; }
    anyhow::ensure!(!settings.collection.trim().is_empty(), "collection name must not be empty");

    let input = cli.input.unwrap_or_else(|| expand_path(&settings.input_path));
    let records = read_records_from_path(&input, &SourceOptions::for_path(&input))?;

    let timeout = Duration::from_secs(settings.http_timeout_secs);
    let store = QdrantClient::new(&settings.store_url, &settings.collection, timeout)?;
    let embedder: Box<dyn EmbedProvider> = if cli.local {
        Box::new(LocalProvider::from_settings(&config.server()?)?)
    } else {
        Box::new(RemoteProvider::new(&settings.embed_url, timeout)?)
    };

    let mapping = FieldMapping::builtin();
    let profile = IngestProfile::from_settings(&settings);
    let options = PipelineOptions {
        throttle: Duration::from_millis(settings.throttle_ms),
        on_dedup_error: settings.on_dedup_error,
        progress: !cli.no_progress && std::io::stderr().is_terminal(),
    };
    let pipeline = Pipeline::new(&store, embedder.as_ref(), &mapping, profile, options);

    println!("Ingesting {} rows from {} into '{}'", records.len(), input.display(), store.collection());
    let report = pipeline.run(&records).await;
    println!("\n✅ Upload completed: {}", report);
    Ok(())
}
