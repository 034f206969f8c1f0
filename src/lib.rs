//! Remora — active protocol verification engine for exposed IoT/IIoT endpoints.
//!
//! Given candidate endpoints tagged by protocol category (camera streams,
//! industrial control, building automation, message brokers, web interfaces,
//! legacy terminals), remora performs a minimal protocol-correct handshake
//! against each one and classifies whether it answers without requiring
//! credentials. Usable as a library or via the CLI.

pub mod cli;
pub mod coordinator;
pub mod engine;
pub mod probe;
pub mod registry;
pub mod report;

use serde::{Deserialize, Deserializer, Serialize};

// Re-export key types for library users.
pub use coordinator::{run_probe_batch, ProbeTask, WORKER_CAP};
pub use engine::{resolve_sample_cap, Verifier, VerifyConfig, DEFAULT_SAMPLE_CAP};
pub use probe::{ProbeOutcome, Protocol};
pub use registry::{Category, ProbeSpec, REGISTRY};
pub use report::{CategoryReport, ProbeResult, VerificationReport, VerifyStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Candidate endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// One candidate endpoint produced by an upstream discovery phase.
///
/// Immutable during a verification run. `port` is optional: when absent (or
/// when the discovery export carried something that is not a valid port
/// number) the category's registered default port applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Target IP address. Endpoints with an empty IP are reported as
    /// unconfirmed without opening a socket.
    pub ip: String,
    /// Explicit target port, if the discovery data had a usable one.
    #[serde(default, deserialize_with = "de_lenient_port")]
    pub port: Option<u16>,
    /// Protocol family this endpoint was discovered under.
    pub category: Category,
}

impl EndpointDescriptor {
    /// Port to actually probe: the endpoint's own port, or the category
    /// default when none was recorded.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.category.spec().default_port)
    }
}

/// Discovery exports are messy: ports arrive as numbers, numeric strings, or
/// junk. Anything that is not a valid u16 port collapses to `None` so the
/// category default applies.
fn de_lenient_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u16>().ok(),
        _ => None,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
