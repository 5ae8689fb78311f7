use tracing_subscriber::EnvFilter;

/// Line-oriented logs on stderr, `RUST_LOG` overriding the `info` default.
/// Stdout is left to the final report.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
