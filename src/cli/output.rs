//! Output formatters for verification reports.
//!
//! Supports pretty (per-category sections plus a grand summary) and JSON
//! output formats.

use crate::report::{VerificationReport, VerifyStatus};

/// Format a report as human-readable text.
pub fn format_pretty(report: &VerificationReport) -> String {
    let mut out = String::new();

    let version = env!("CARGO_PKG_VERSION");
    out.push_str(&format!("remora {version} verification report\n"));
    out.push_str(&format!(
        "Run {} at {}\n",
        report.run_id,
        report.verified_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if report.status == VerifyStatus::NothingToVerify {
        out.push_str("\nNothing to verify: no candidate endpoints were supplied.\n");
        return out;
    }

    for cat in &report.categories {
        out.push('\n');
        out.push_str(&format!(
            "[{}] {} — {}/{} confirmed ({:.1}%)\n",
            cat.protocol_label,
            cat.category,
            cat.confirmed,
            cat.probed,
            cat.confirmation_rate() * 100.0
        ));
        for result in &cat.results {
            let tag = if result.confirmed {
                "[CONFIRMED]"
            } else {
                "[protected]"
            };
            out.push_str(&format!(
                "  {tag} {}:{}  {}\n",
                result.ip, result.port, result.detail
            ));
        }
    }

    out.push('\n');
    out.push_str(&format!("Endpoints probed : {}\n", report.grand_probed));
    out.push_str(&format!("Confirmed open   : {}\n", report.grand_confirmed));
    out.push_str(&format!(
        "Auth enforced    : {}\n",
        report.grand_probed - report.grand_confirmed
    ));
    if report.grand_confirmed > 0 {
        out.push_str(&format!(
            "{:.1}% of sampled endpoints answered without authentication.\n",
            report.confirmation_rate() * 100.0
        ));
    } else {
        out.push_str("All sampled endpoints appear to enforce authentication.\n");
    }
    out.push_str(&format!(
        "Completed in {:.2}s\n",
        report.duration_ms as f64 / 1000.0
    ));

    out
}

/// Format a report as JSON.
pub fn format_json(report: &VerificationReport) -> String {
    serde_json::to_string_pretty(report)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}
