//! Generic channel transport: deliver one envelope across a cross-context
//! boundary.

use async_trait::async_trait;
use tokio::sync::mpsc;
use vault_types::Envelope;

/// Transport-level errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The far side of the channel is gone.
    #[error("channel closed")]
    Closed,

    /// Delivery failed for a transport-specific reason.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The popup surface could not open or address a window.
    #[error("window unavailable: {0}")]
    WindowUnavailable(String),
}

/// One-way delivery of structured messages across a context boundary.
///
/// Implementations are platform bindings (an embedded frame, a test
/// channel); the protocol layer only ever sees this trait.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Deliver an envelope to the far side.
    async fn deliver(&self, envelope: Envelope) -> Result<(), ChannelError>;
}

/// In-memory transport backed by a tokio mpsc channel.
///
/// Used by tests and demos; the receiving half plays the vault context.
pub struct MemoryTransport(mpsc::Sender<Envelope>);

#[async_trait]
impl ChannelTransport for MemoryTransport {
    async fn deliver(&self, envelope: Envelope) -> Result<(), ChannelError> {
        self.0.send(envelope).await.map_err(|_| ChannelError::Closed)
    }
}

/// Create an in-memory transport and the receiver playing the far side.
pub fn memory_transport(buffer: usize) -> (MemoryTransport, mpsc::Receiver<Envelope>) {
    let (tx, rx) = mpsc::channel(buffer);
    (MemoryTransport(tx), rx)
}
