//! CLI entrypoint for remora.
//!
//! Loads a candidate endpoint file produced by an upstream discovery pass,
//! asks the operator to confirm active probing, runs the verification
//! engine, and prints the report.

pub mod output;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::engine::{resolve_sample_cap, Verifier, VerifyConfig};
use crate::registry::REGISTRY;
use crate::EndpointDescriptor;

pub use output::{format_json, format_pretty};

// ─────────────────────────────────────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────────────────────────────────────

/// Remora — active protocol verification for exposed IoT/IIoT endpoints.
#[derive(Parser, Debug)]
#[command(name = "remora", version, about)]
#[command(
    long_about = "Remora takes candidate endpoints discovered by an indexed search service \
    and actively verifies, with one minimal protocol-correct handshake per endpoint, \
    whether each one answers without credentials. Direct TCP/UDP connections are made \
    to every probed endpoint — only run it against systems you are authorised to test."
)]
pub struct Cli {
    /// Path to a JSON endpoint file: [{"ip": ..., "port": ..., "category": ...}, ...]
    pub endpoints: PathBuf,

    /// Max endpoints to probe per category (invalid values fall back to 10)
    #[arg(long)]
    pub cap: Option<String>,

    /// Per-endpoint probe timeout in milliseconds
    #[arg(long, default_value = "5000")]
    pub timeout: u64,

    /// Output format
    #[arg(long, default_value = "pretty", value_enum)]
    pub output: OutputFmt,

    /// Skip the interactive confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFmt {
    Pretty,
    Json,
}

/// Errors from CLI glue (file loading, operator prompt).
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("could not read operator confirmation: {0}")]
    Prompt(std::io::Error),
}

/// Load candidate endpoints from a JSON file.
pub fn load_endpoints(path: &Path) -> Result<Vec<EndpointDescriptor>, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CliError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&raw).map_err(|e| CliError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Warn the operator and ask for confirmation before any socket is opened.
/// Empty input or y/yes proceeds; anything else declines.
fn confirm_proceed(total: usize, categories: usize) -> std::io::Result<bool> {
    eprintln!("This makes DIRECT TCP/UDP connections to {total} endpoint(s) across {categories} categor(ies).");
    eprintln!("Only probe systems you are authorised to test.");
    eprint!("Proceed with active verification? [Y/n]: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(matches!(answer.as_str(), "" | "y" | "yes"))
}

/// Run the CLI: load endpoints, confirm, verify, print.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let endpoints = load_endpoints(&cli.endpoints)?;

    let populated_categories = REGISTRY
        .iter()
        .filter(|spec| endpoints.iter().any(|e| e.category == spec.category))
        .count();

    if !cli.yes
        && !confirm_proceed(endpoints.len(), populated_categories).map_err(CliError::Prompt)?
    {
        // Declined: back to idle with no partial state and no report.
        eprintln!("Verification declined.");
        return Ok(());
    }

    let config = VerifyConfig {
        max_per_category: resolve_sample_cap(cli.cap.as_deref()),
        probe_timeout: Duration::from_millis(cli.timeout),
    };
    let report = Verifier::new(config).run(&endpoints).await;

    match cli.output {
        OutputFmt::Pretty => print!("{}", format_pretty(&report)),
        OutputFmt::Json => println!("{}", format_json(&report)),
    }
    Ok(())
}
