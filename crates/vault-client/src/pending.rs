//! Correlation registry: outstanding requests awaiting a response.
//!
//! Maps each correlation id to the completion channel of the caller that
//! issued the request. Entries are addressed purely by identity; concurrent
//! outstanding requests are independent and may complete in any order.
//!
//! Flow:
//! 1. The send path calls [`PendingStore::register`] and gets a receiver.
//! 2. The envelope is handed to the frame channel (queued or delivered).
//! 3. The dispatcher routes the matching response to
//!    [`PendingStore::complete`].
//! 4. The caller awaits the receiver under its deadline.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use vault_types::CorrelationId;

/// A request still waiting for its response.
struct Pending {
    /// Channel resolving the caller's future. Consumed on removal, which
    /// makes at-most-once resolution structural.
    sender: oneshot::Sender<Value>,
    /// When the request was registered.
    created_at: Instant,
    /// Method name, for logging.
    method: String,
    /// Deadline for this request.
    timeout: Duration,
}

/// Counters for the registry.
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Requests registered.
    pub total_registered: AtomicU64,
    /// Requests completed by a matching response.
    pub total_completed: AtomicU64,
    /// Requests expired past their deadline.
    pub total_timeouts: AtomicU64,
    /// Requests cancelled before completion.
    pub total_cancelled: AtomicU64,
}

/// Registry of outstanding requests, keyed by correlation id.
pub struct PendingStore {
    pending: DashMap<CorrelationId, Pending>,
    default_timeout: Duration,
    stats: Arc<PendingStats>,
}

impl PendingStore {
    /// Create a registry with the given default deadline.
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            pending: DashMap::new(),
            default_timeout,
            stats: Arc::new(PendingStats::default()),
        }
    }

    /// Register an outstanding request.
    ///
    /// Returns the fresh correlation id and the receiver that resolves
    /// when the matching response arrives.
    pub fn register(
        &self,
        method: &str,
        timeout: Option<Duration>,
    ) -> (CorrelationId, oneshot::Receiver<Value>) {
        let correlation_id = CorrelationId::new();
        let (tx, rx) = oneshot::channel();

        self.pending.insert(
            correlation_id,
            Pending {
                sender: tx,
                created_at: Instant::now(),
                method: method.to_string(),
                timeout: timeout.unwrap_or(self.default_timeout),
            },
        );
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        debug!(
            correlation_id = %correlation_id,
            method = method,
            "Registered outstanding request"
        );

        (correlation_id, rx)
    }

    /// Complete an outstanding request with a response payload.
    ///
    /// Remove-then-resolve is a single atomic step, so each id resolves at
    /// most once; a duplicate response finds no entry. An unknown id is a
    /// routing bug or duplicate delivery and is reported loudly, but never
    /// crashes the dispatcher.
    pub fn complete(&self, correlation_id: CorrelationId, payload: Value) -> bool {
        if let Some((_, pending)) = self.pending.remove(&correlation_id) {
            let elapsed = pending.created_at.elapsed();
            match pending.sender.send(payload) {
                Ok(()) => {
                    self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        correlation_id = %correlation_id,
                        method = pending.method,
                        elapsed_ms = elapsed.as_millis(),
                        "Completed outstanding request"
                    );
                    true
                }
                Err(_) => {
                    // Caller gave up waiting.
                    self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        correlation_id = %correlation_id,
                        method = pending.method,
                        "Completion receiver dropped"
                    );
                    false
                }
            }
        } else {
            warn!(
                correlation_id = %correlation_id,
                "Response for unknown or already-completed correlation id"
            );
            false
        }
    }

    /// Remove a request before completion (send failure or caller timeout).
    pub fn cancel(&self, correlation_id: &CorrelationId) -> bool {
        if self.pending.remove(correlation_id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Remove requests past their deadline, failing their callers.
    ///
    /// Returns the number of entries removed. Dropping the sender wakes
    /// the receiver with an error.
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.pending.retain(|id, pending| {
            let elapsed = now.duration_since(pending.created_at);
            if elapsed > pending.timeout {
                warn!(
                    correlation_id = %id,
                    method = pending.method,
                    elapsed_ms = elapsed.as_millis(),
                    "Removing expired outstanding request"
                );
                self.stats.total_timeouts.fetch_add(1, Ordering::Relaxed);
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }

    /// Number of currently outstanding requests.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether a correlation id is still outstanding.
    pub fn is_pending(&self, correlation_id: &CorrelationId) -> bool {
        self.pending.contains_key(correlation_id)
    }

    /// Registry counters.
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

/// Background task sweeping expired requests.
pub async fn cleanup_task(store: Arc<PendingStore>, interval: Duration) {
    let mut cleanup_interval = tokio::time::interval(interval);
    cleanup_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        cleanup_interval.tick().await;
        let removed = store.remove_expired();
        if removed > 0 {
            debug!(removed = removed, "Swept expired outstanding requests");
        }
    }
}
