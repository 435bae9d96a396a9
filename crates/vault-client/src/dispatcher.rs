//! Dispatcher: routing for every inbound envelope.
//!
//! Classification is per-message: envelopes carrying a `method` are
//! requests sent *to* the host; envelopes without one are responses to
//! something the host sent. Envelopes with a foreign service tag are
//! filtered before classification and never reach either path.
//!
//! Protocol errors (unrecognized method, response with no registered
//! completion, stale flow completion) are logged and dropped; the
//! dispatcher never crashes on them.

use crate::pending::PendingStore;
use crate::session::SessionManager;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use vault_channel::FrameChannel;
use vault_types::{inbound, Envelope, MessageKind};

/// Routes inbound envelopes to the registry, the frame channel, or the
/// session manager.
pub struct Dispatcher {
    frame: Arc<FrameChannel>,
    pending: Arc<PendingStore>,
    session: Arc<SessionManager>,
}

impl Dispatcher {
    pub fn new(
        frame: Arc<FrameChannel>,
        pending: Arc<PendingStore>,
        session: Arc<SessionManager>,
    ) -> Self {
        Self {
            frame,
            pending,
            session,
        }
    }

    /// Handle one inbound envelope.
    pub async fn handle(&self, envelope: Envelope) {
        match envelope.kind() {
            // Foreign namespace: not ours, not an error.
            MessageKind::Foreign => {}
            MessageKind::Request => self.handle_request(envelope).await,
            MessageKind::Response => {
                self.pending.complete(envelope.id, envelope.payload);
            }
        }
    }

    async fn handle_request(&self, envelope: Envelope) {
        let Some(method) = envelope.method.as_deref() else {
            // kind() guarantees a method on requests.
            return;
        };
        debug!(method = method, correlation_id = %envelope.id, "Inbound request");

        match method {
            inbound::BOOTSTRAP_READY => {
                if let Err(e) = self.frame.mark_ready().await {
                    error!(error = %e, "Bootstrap flush failed");
                }
                // Required handshake reply: empty payload, same id.
                let ack = Envelope::reply_to(envelope.id, serde_json::json!({}));
                if let Err(e) = self.frame.send(ack).await {
                    error!(error = %e, "Bootstrap acknowledgement failed");
                }
            }
            inbound::FLOW_COMPLETED => {
                self.session.complete(envelope.payload).await;
            }
            inbound::INFO_PROBE => {
                self.session.ack_probe(envelope.id).await;
            }
            other => {
                warn!(method = other, correlation_id = %envelope.id,
                    "Unrecognized inbound method, dropping");
            }
        }
    }

    /// Consume inbound envelopes until the channel closes.
    ///
    /// Messages are processed strictly in arrival order.
    pub async fn run(self: Arc<Self>, mut inbound: mpsc::Receiver<Envelope>) {
        while let Some(envelope) = inbound.recv().await {
            self.handle(envelope).await;
        }
        debug!("Inbound channel closed, stopping dispatcher");
    }
}
