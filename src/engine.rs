//! Verification orchestrator.
//!
//! Top-level driver over the per-category pipeline: validate preconditions,
//! sample each category's candidates, run the bounded probe batch, and fold
//! the results into the final report. Categories are processed sequentially
//! in registry order; probes within a category run concurrently.

use std::time::{Duration, Instant};

use crate::coordinator::{run_probe_batch, ProbeTask};
use crate::registry::REGISTRY;
use crate::report::{CategoryReport, ReportBuilder, VerificationReport, VerifyStatus};
use crate::EndpointDescriptor;

/// Endpoints sampled per category when the operator gives no usable cap.
pub const DEFAULT_SAMPLE_CAP: usize = 10;

/// Per-endpoint probe timeout when none is configured.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5000;

/// Resolve the operator-supplied per-category cap. Absent, non-numeric, or
/// non-positive input falls back to [`DEFAULT_SAMPLE_CAP`].
pub fn resolve_sample_cap(raw: Option<&str>) -> usize {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => n as usize,
        _ => DEFAULT_SAMPLE_CAP,
    }
}

/// Configuration for a verification run.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Maximum endpoints probed per category.
    pub max_per_category: usize,
    /// Wall-clock budget for each individual probe.
    pub probe_timeout: Duration,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            max_per_category: DEFAULT_SAMPLE_CAP,
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }
}

/// Verification orchestrator.
pub struct Verifier {
    config: VerifyConfig,
}

impl Verifier {
    pub fn new(config: VerifyConfig) -> Self {
        Self { config }
    }

    /// Run verification over `candidates` and return the report snapshot.
    ///
    /// The candidate store is never mutated. Sampling takes the first
    /// `max_per_category` endpoints of each category in their stored
    /// discovery order: deterministic, deliberately biased toward the
    /// earliest-discovered endpoints. With no candidates at all, no probing
    /// happens and the report carries [`VerifyStatus::NothingToVerify`].
    pub async fn run(&self, candidates: &[EndpointDescriptor]) -> VerificationReport {
        let started = Instant::now();

        if candidates.is_empty() {
            tracing::warn!("no candidate endpoints supplied; nothing to verify");
            return VerificationReport::empty(VerifyStatus::NothingToVerify);
        }

        let mut builder = ReportBuilder::new();

        for spec in &REGISTRY {
            let pool: Vec<&EndpointDescriptor> = candidates
                .iter()
                .filter(|e| e.category == spec.category)
                .collect();
            if pool.is_empty() {
                continue;
            }

            let sampled = &pool[..pool.len().min(self.config.max_per_category)];
            tracing::info!(
                category = %spec.category,
                protocol = spec.protocol.label(),
                candidates = pool.len(),
                sampled = sampled.len(),
                "probing category sample"
            );

            let tasks: Vec<ProbeTask> = sampled
                .iter()
                .map(|e| ProbeTask {
                    ip: e.ip.clone(),
                    port: e.port.unwrap_or(spec.default_port),
                })
                .collect();

            let protocol = spec.protocol;
            let results = run_probe_batch(
                spec.category,
                tasks,
                self.config.probe_timeout,
                move |ip, port, timeout| async move { protocol.probe(&ip, port, timeout).await },
            )
            .await;

            let report = CategoryReport::from_results(spec.category, protocol.label(), results);
            tracing::info!(
                category = %spec.category,
                probed = report.probed,
                confirmed = report.confirmed,
                "category batch complete"
            );
            builder.push(report);
        }

        let report = builder.finish(
            VerifyStatus::Completed,
            started.elapsed().as_millis() as u64,
        );
        tracing::info!(
            probed = report.grand_probed,
            confirmed = report.grand_confirmed,
            duration_ms = report.duration_ms,
            "verification complete"
        );
        report
    }
}
