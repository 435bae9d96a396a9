//! Embedded-frame channel with the bootstrap queue.
//!
//! Until the vault context's embedded frame announces readiness, outbound
//! envelopes are buffered in issue order. The readiness signal arrives
//! exactly once in a well-behaved session; the latch never reverts, and a
//! replayed signal must not re-flush an already-emptied queue.

use crate::transport::{ChannelError, ChannelTransport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;
use vault_types::Envelope;

struct FrameState {
    /// One-way latch; false until the frame confirms it is live.
    ready: bool,
    /// Requests issued before readiness, in enqueue order.
    queue: VecDeque<Envelope>,
}

/// Steady-state message path to the persistently loaded vault context.
pub struct FrameChannel {
    transport: Arc<dyn ChannelTransport>,
    state: Mutex<FrameState>,
}

impl FrameChannel {
    /// Wrap a transport; the channel starts not-ready.
    pub fn new(transport: Arc<dyn ChannelTransport>) -> Self {
        Self {
            transport,
            state: Mutex::new(FrameState {
                ready: false,
                queue: VecDeque::new(),
            }),
        }
    }

    /// Send an envelope, buffering it if the frame is not ready yet.
    ///
    /// Buffered envelopes are owned by the queue until the readiness flush
    /// hands them to the transport. If readiness never arrives they
    /// accumulate indefinitely; deadlines on the caller side bound that.
    pub async fn send(&self, envelope: Envelope) -> Result<(), ChannelError> {
        {
            let mut state = self.state.lock();
            if !state.ready {
                debug!(
                    correlation_id = %envelope.id,
                    queued = state.queue.len() + 1,
                    "Frame not ready, buffering request"
                );
                state.queue.push_back(envelope);
                return Ok(());
            }
        }
        self.transport.deliver(envelope).await
    }

    /// Flip the readiness latch and flush the queue in FIFO order.
    ///
    /// Idempotent: the first call flushes exactly once, subsequent calls
    /// are no-ops.
    pub async fn mark_ready(&self) -> Result<(), ChannelError> {
        let drained: Vec<Envelope> = {
            let mut state = self.state.lock();
            if state.ready {
                debug!("Duplicate readiness signal ignored");
                return Ok(());
            }
            state.ready = true;
            state.queue.drain(..).collect()
        };

        debug!(flushed = drained.len(), "Frame ready, flushing queue");
        for envelope in drained {
            self.transport.deliver(envelope).await?;
        }
        Ok(())
    }

    /// Whether the readiness latch has flipped.
    pub fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    /// Number of envelopes waiting for the readiness flush.
    pub fn queued_len(&self) -> usize {
        self.state.lock().queue.len()
    }
}
