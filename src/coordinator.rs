//! Bounded-concurrency probe batch runner.
//!
//! Runs one category's sampled endpoints through its probe under a fixed
//! worker cap: tasks are dispatched in chunks of [`WORKER_CAP`] on a
//! `JoinSet`, so a batch of N endpoints completes in at most ceil(N/cap)
//! timeout-length waves. Each probe's failure or timeout is isolated from
//! its siblings, and the output is exactly one [`ProbeResult`] per input
//! task, in input order, even when tasks share an ip/port.

use std::future::Future;
use std::time::Duration;

use crate::probe::ProbeOutcome;
use crate::registry::Category;
use crate::report::ProbeResult;

/// Maximum probes in flight at any instant within one category batch.
pub const WORKER_CAP: usize = 10;

/// One unit of probing work: where to connect.
#[derive(Debug, Clone)]
pub struct ProbeTask {
    pub ip: String,
    pub port: u16,
}

/// Probe every task in `tasks` with bounded concurrency and collect one
/// result per task.
///
/// `probe` is invoked once per task with the task's own (ip, port, timeout);
/// per-task parameters are passed by value into each spawned future, so no
/// state is shared between in-flight probes. Completion of individual probes
/// is streamed via tracing events; the returned vector is in input order.
pub async fn run_probe_batch<F, Fut>(
    category: Category,
    tasks: Vec<ProbeTask>,
    timeout: Duration,
    probe: F,
) -> Vec<ProbeResult>
where
    F: Fn(String, u16, Duration) -> Fut,
    Fut: Future<Output = ProbeOutcome> + Send + 'static,
{
    let mut results: Vec<ProbeResult> = Vec::with_capacity(tasks.len());

    for chunk in tasks.chunks(WORKER_CAP) {
        let mut wave: Vec<Option<ProbeResult>> = (0..chunk.len()).map(|_| None).collect();
        let mut inflight = tokio::task::JoinSet::new();

        for (slot, task) in chunk.iter().enumerate() {
            if task.ip.is_empty() {
                // Discovery data without an IP cannot be probed at all.
                wave[slot] = Some(ProbeResult {
                    ip: String::new(),
                    port: task.port,
                    confirmed: false,
                    detail: "no IP recorded for endpoint".to_string(),
                    category,
                });
                continue;
            }
            let fut = probe(task.ip.clone(), task.port, timeout);
            let ip = task.ip.clone();
            let port = task.port;
            inflight.spawn(async move {
                let outcome = fut.await;
                (
                    slot,
                    ProbeResult {
                        ip,
                        port,
                        confirmed: outcome.confirmed,
                        detail: outcome.detail,
                        category,
                    },
                )
            });
        }

        while let Some(joined) = inflight.join_next().await {
            match joined {
                Ok((slot, result)) => {
                    if result.confirmed {
                        tracing::info!(
                            category = %category,
                            endpoint = %format!("{}:{}", result.ip, result.port),
                            detail = %result.detail,
                            "endpoint confirmed unauthenticated"
                        );
                    } else {
                        tracing::debug!(
                            category = %category,
                            endpoint = %format!("{}:{}", result.ip, result.port),
                            detail = %result.detail,
                            "endpoint not confirmed"
                        );
                    }
                    wave[slot] = Some(result);
                }
                Err(e) => tracing::warn!(category = %category, error = %e, "probe task aborted"),
            }
        }

        // 1:1 guarantee: a slot can only be empty if its task aborted, and
        // even then the endpoint still gets a recorded verdict.
        for (slot, entry) in wave.into_iter().enumerate() {
            results.push(entry.unwrap_or_else(|| ProbeResult {
                ip: chunk[slot].ip.clone(),
                port: chunk[slot].port,
                confirmed: false,
                detail: "probe task aborted".to_string(),
                category,
            }));
        }
    }

    results
}
