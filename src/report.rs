//! Verification report model and aggregation.
//!
//! All result types are created and fully populated within a single
//! orchestrator run and returned as an immutable snapshot; the engine never
//! persists anything itself. Export collaborators serialize the report with
//! serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::Category;

// ─────────────────────────────────────────────────────────────────────────────
// Per-endpoint and per-category results
// ─────────────────────────────────────────────────────────────────────────────

/// Verdict for a single probed endpoint. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub ip: String,
    pub port: u16,
    /// True when the endpoint answered its protocol check without
    /// presenting credentials.
    pub confirmed: bool,
    /// Literal diagnostic string from the probe.
    pub detail: String,
    pub category: Category,
}

/// One category's slice of the verification report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: Category,
    /// Protocol label from the registry ("MQTT", "RTSP", ...).
    pub protocol_label: String,
    /// Number of endpoints probed. Always equals `results.len()`.
    pub probed: usize,
    /// Number of confirmed-unauthenticated endpoints.
    pub confirmed: usize,
    /// Per-endpoint verdicts, in sample order.
    pub results: Vec<ProbeResult>,
}

impl CategoryReport {
    /// Build a report from a batch of results, deriving the counts.
    pub fn from_results(
        category: Category,
        protocol_label: &str,
        results: Vec<ProbeResult>,
    ) -> Self {
        let confirmed = results.iter().filter(|r| r.confirmed).count();
        Self {
            category,
            protocol_label: protocol_label.to_string(),
            probed: results.len(),
            confirmed,
            results,
        }
    }

    /// Fraction of probed endpoints that confirmed, 0 when nothing was
    /// probed.
    pub fn confirmation_rate(&self) -> f64 {
        if self.probed == 0 {
            0.0
        } else {
            self.confirmed as f64 / self.probed as f64
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Run-level report
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of an orchestrator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStatus {
    /// At least one category was probed.
    Completed,
    /// No candidate endpoints were supplied; nothing was probed.
    NothingToVerify,
}

impl VerifyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::NothingToVerify => "nothing_to_verify",
        }
    }
}

impl std::fmt::Display for VerifyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full verification report: per-category reports in registry order plus
/// grand totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    pub status: VerifyStatus,
    /// Per-category reports, in registry order. Categories with zero
    /// candidates are absent.
    pub categories: Vec<CategoryReport>,
    /// Total endpoints probed across all categories.
    pub grand_probed: usize,
    /// Total confirmed-unauthenticated endpoints across all categories.
    pub grand_confirmed: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
    /// Timestamp when the run completed.
    pub verified_at: DateTime<Utc>,
}

impl VerificationReport {
    /// Report for a run where nothing was probed.
    pub fn empty(status: VerifyStatus) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status,
            categories: Vec::new(),
            grand_probed: 0,
            grand_confirmed: 0,
            duration_ms: 0,
            verified_at: Utc::now(),
        }
    }

    /// Look up one category's report.
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Overall confirmation rate, 0 when nothing was probed.
    pub fn confirmation_rate(&self) -> f64 {
        if self.grand_probed == 0 {
            0.0
        } else {
            self.grand_confirmed as f64 / self.grand_probed as f64
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregation
// ─────────────────────────────────────────────────────────────────────────────

/// Pure fold of per-category reports into a [`VerificationReport`].
///
/// Given the same reports in the same order it always produces the same
/// totals; ordering of `categories` is whatever order `push` was called in
/// (the orchestrator calls it in registry order).
#[derive(Debug, Default)]
pub struct ReportBuilder {
    categories: Vec<CategoryReport>,
    grand_probed: usize,
    grand_confirmed: usize,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one category's report into the totals.
    pub fn push(&mut self, report: CategoryReport) {
        self.grand_probed += report.probed;
        self.grand_confirmed += report.confirmed;
        self.categories.push(report);
    }

    /// Finalize into an immutable report snapshot.
    pub fn finish(self, status: VerifyStatus, duration_ms: u64) -> VerificationReport {
        VerificationReport {
            run_id: Uuid::new_v4(),
            status,
            categories: self.categories,
            grand_probed: self.grand_probed,
            grand_confirmed: self.grand_confirmed,
            duration_ms,
            verified_at: Utc::now(),
        }
    }
}
