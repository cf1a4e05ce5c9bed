//! Querydeck CLI binary.

use anyhow::Result;
use querydeck::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the querydeck CLI.
///
/// Uses tokio's `current_thread` runtime; every command is sequential I/O.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=querydeck=debug,querydeck_jsonl=trace
    // Logs go to stderr so stdout stays parseable with --json.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("querydeck=info,querydeck_jsonl=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting querydeck CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Querydeck CLI completed successfully");
    Ok(())
}
