//! Remora — active protocol verification for exposed IoT/IIoT endpoints.
//!
//! Usage:
//!   remora <ENDPOINTS.json> [--cap <N>] [--timeout <MS>] [--output pretty|json] [--yes]

use clap::Parser;
use remora::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialise logging (RUST_LOG=debug etc.)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
