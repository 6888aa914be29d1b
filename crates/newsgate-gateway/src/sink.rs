//! Process-wide asynchronous diagnostic sink.
//!
//! Request handlers and fan-out subtasks push [`ErrorReport`]s into a bounded
//! queue; a single background consumer drains it and emits one structured
//! `tracing` event per report. The queue never grows without bound: when it is
//! full the configured [`OverflowPolicy`] decides whether the producer drops
//! the report or waits for room.
//!
//! ```rust,ignore
//! let (sink, worker) = ErrorSink::spawn(ErrorSinkConfig::default());
//! sink.report(ErrorReport::new(id, "content-store", "news 7 not found")).await;
//! // on shutdown:
//! let processed = worker.drain().await;
//! ```

use newsgate_kernel::CorrelationId;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// What a producer does when the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Discard the new report and count it. Producers never wait.
    #[default]
    DropNewest,
    /// Wait until the consumer frees a slot.
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSinkConfig {
    pub capacity: usize,
    pub policy: OverflowPolicy,
}

impl Default for ErrorSinkConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            policy: OverflowPolicy::DropNewest,
        }
    }
}

/// One diagnostic entry, always tagged with the request it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub correlation_id: CorrelationId,
    /// Layer or dependency that produced the error.
    pub origin: String,
    pub message: String,
}

impl ErrorReport {
    pub fn new(
        correlation_id: CorrelationId,
        origin: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            correlation_id,
            origin: origin.into(),
            message: message.into(),
        }
    }
}

/// Producer handle. Cheap to clone; every clone feeds the same consumer.
#[derive(Clone)]
pub struct ErrorSink {
    tx: mpsc::Sender<ErrorReport>,
    policy: OverflowPolicy,
    dropped: Arc<AtomicU64>,
}

/// Owns the consumer task. Call [`drain`](Self::drain) on shutdown.
pub struct ErrorSinkWorker {
    handle: JoinHandle<u64>,
    shutdown: CancellationToken,
}

impl ErrorSink {
    /// Start the consumer task and return the producer handle and the worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: ErrorSinkConfig) -> (Self, ErrorSinkWorker) {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(consume(rx, shutdown.clone()));

        let sink = Self {
            tx,
            policy: config.policy,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (sink, ErrorSinkWorker { handle, shutdown })
    }

    /// Enqueue a report according to the overflow policy.
    ///
    /// Reports sent after the sink was drained are discarded silently.
    pub async fn report(&self, report: ErrorReport) {
        match self.policy {
            OverflowPolicy::DropNewest => match self.tx.try_send(report) {
                Ok(()) | Err(TrySendError::Closed(_)) => {}
                Err(TrySendError::Full(report)) => {
                    let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(
                        request_id = %report.correlation_id,
                        origin = %report.origin,
                        dropped_total = total,
                        "error sink full, report dropped"
                    );
                }
            },
            OverflowPolicy::Block => {
                let _ = self.tx.send(report).await;
            }
        }
    }

    /// Reports discarded so far under [`OverflowPolicy::DropNewest`].
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ErrorSinkWorker {
    /// Stop accepting reports, log everything still queued, and wait for the
    /// consumer to exit. Returns the number of reports processed over the
    /// sink's lifetime.
    pub async fn drain(self) -> u64 {
        self.shutdown.cancel();
        match self.handle.await {
            Ok(processed) => processed,
            Err(e) => {
                error!(error = %e, "error sink consumer task failed");
                0
            }
        }
    }
}

async fn consume(mut rx: mpsc::Receiver<ErrorReport>, shutdown: CancellationToken) -> u64 {
    let mut processed = 0u64;
    loop {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some(report) => {
                    emit(&report);
                    processed += 1;
                }
                // Every producer handle is gone.
                None => break,
            },
            () = shutdown.cancelled() => {
                rx.close();
                while let Some(report) = rx.recv().await {
                    emit(&report);
                    processed += 1;
                }
                break;
            }
        }
    }
    info!(processed, "error sink drained");
    processed
}

fn emit(report: &ErrorReport) {
    error!(
        request_id = %report.correlation_id,
        origin = %report.origin,
        "{}",
        report.message
    );
}
