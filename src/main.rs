//! Headless Brickfall runner (default binary).
//!
//! Speaks the JSON-lines protocol on stdin/stdout. Logs go to stderr so
//! stdout stays a clean protocol stream; filter them with `RUST_LOG`.

use anyhow::Result;
use tokio::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use brickfall::adapter::{serve, GameRuntime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    info!(
        rows = config.game.rows,
        cols = config.game.cols,
        versus = config.versus,
        "starting brickfall"
    );

    let runtime = GameRuntime::spawn(config);
    serve(runtime, BufReader::new(io::stdin()), io::stdout()).await
}
