//! Fan-out/fan-in over upstream calls.
//!
//! [`FanOutCoordinator::run`] dispatches every [`UpstreamCallSpec`] as its own
//! tokio task, waits for *all* of them, and returns one [`UpstreamOutcome`]
//! per spec in input order. Subtasks share nothing: each returns its outcome
//! together with its index and only the joining task writes the slot vector.
//!
//! Each call carries the configured deadline. Dropping the `run` future (for
//! instance when the client disconnects) drops the `JoinSet`, which aborts
//! every subtask still in flight. A failing subtask never cancels its
//! siblings.

use crate::sink::{ErrorReport, ErrorSink};
use newsgate_kernel::{CorrelationId, UpstreamCallSpec, UpstreamClient, UpstreamOutcome};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, warn};

#[derive(Clone)]
pub struct FanOutCoordinator {
    client: Arc<dyn UpstreamClient>,
    sink: ErrorSink,
    call_timeout: Duration,
}

impl FanOutCoordinator {
    pub fn new(client: Arc<dyn UpstreamClient>, sink: ErrorSink, call_timeout: Duration) -> Self {
        Self {
            client,
            sink,
            call_timeout,
        }
    }

    /// Run all `specs` concurrently and join on every one of them.
    ///
    /// The returned vector has the same length and order as `specs`. Every
    /// non-`Ok` outcome is reported once to the error sink.
    pub async fn run(
        &self,
        specs: Vec<UpstreamCallSpec>,
        correlation_id: &CorrelationId,
    ) -> Vec<UpstreamOutcome> {
        let mut join_set = JoinSet::new();

        for (index, spec) in specs.iter().cloned().enumerate() {
            let client = Arc::clone(&self.client);
            let correlation_id = correlation_id.clone();
            let deadline = self.call_timeout;

            join_set.spawn(
                async move {
                    let started = Instant::now();
                    let outcome =
                        match tokio::time::timeout(deadline, client.call(&spec, &correlation_id))
                            .await
                        {
                            Ok(outcome) => outcome,
                            Err(_) => UpstreamOutcome::Unavailable(format!(
                                "no answer within {} ms",
                                deadline.as_millis()
                            )),
                        };
                    debug!(
                        request_id = %correlation_id,
                        dependency = %spec.dependency(),
                        operation = spec.name(),
                        ok = outcome.is_ok(),
                        latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "upstream call finished"
                    );
                    (index, outcome)
                }
                .in_current_span(),
            );
        }

        let mut slots: Vec<Option<UpstreamOutcome>> = vec![None; specs.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => warn!(request_id = %correlation_id, error = %e, "upstream subtask panicked"),
            }
        }

        let mut outcomes = Vec::with_capacity(slots.len());
        for (spec, slot) in specs.iter().zip(slots) {
            let outcome = slot.unwrap_or_else(|| {
                UpstreamOutcome::Unavailable("subtask ended without an outcome".to_string())
            });
            if let Some(detail) = outcome.failure_detail() {
                self.sink
                    .report(ErrorReport::new(
                        correlation_id.clone(),
                        spec.dependency().as_str(),
                        format!("{} failed: {detail}", spec.name()),
                    ))
                    .await;
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Single-call convenience over [`run`](Self::run).
    pub async fn run_one(
        &self,
        spec: UpstreamCallSpec,
        correlation_id: &CorrelationId,
    ) -> UpstreamOutcome {
        self.run(vec![spec], correlation_id)
            .await
            .pop()
            .unwrap_or_else(|| UpstreamOutcome::Unavailable("no outcome".to_string()))
    }
}
