//! Interactive session manager: the single popup slot.
//!
//! At most one interactive flow may be live at a time. The slot is an
//! explicit two-state machine: launching while a session is active fails
//! fast with [`ClientError::SessionActive`] instead of silently
//! overwriting the slot, which would strand the first caller's future.

use crate::error::{ClientError, ClientResult};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use url::Url;
use vault_channel::{PopupSurface, WindowHandle, WindowSpec};
use vault_types::{CorrelationId, Envelope};

/// State of the interactive session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No popup open.
    Idle,
    /// A popup is open and a caller is waiting on its completion.
    SessionActive,
}

struct ActiveSession {
    handle: WindowHandle,
    resolver: oneshot::Sender<Value>,
}

/// Owns the popup surface and the single session slot.
pub struct SessionManager {
    surface: Arc<dyn PopupSurface>,
    slot: Mutex<Option<ActiveSession>>,
}

impl SessionManager {
    /// Create an idle session manager over a popup surface.
    pub fn new(surface: Arc<dyn PopupSurface>) -> Self {
        Self {
            surface,
            slot: Mutex::new(None),
        }
    }

    /// Current slot state.
    pub fn state(&self) -> SessionState {
        if self.slot.lock().is_some() {
            SessionState::SessionActive
        } else {
            SessionState::Idle
        }
    }

    /// Open a popup for `url` and install the session slot.
    ///
    /// Returns the receiver that resolves when the vault context reports
    /// flow completion. Popup flows bypass the embedded-frame bootstrap
    /// queue entirely, so launching before frame readiness works.
    pub async fn launch(
        &self,
        url: &Url,
        spec: &WindowSpec,
    ) -> ClientResult<oneshot::Receiver<Value>> {
        if self.slot.lock().is_some() {
            return Err(ClientError::SessionActive);
        }

        let handle = self.surface.open(url, spec).await?;
        debug!(window = handle.raw(), %url, "Opened interactive session");

        let (tx, rx) = oneshot::channel();
        {
            let mut slot = self.slot.lock();
            if slot.is_none() {
                *slot = Some(ActiveSession {
                    handle,
                    resolver: tx,
                });
                return Ok(rx);
            }
        }

        // Lost the race to another launch; do not strand its caller.
        let _ = self.surface.close(handle).await;
        Err(ClientError::SessionActive)
    }

    /// Resolve the active session with a flow-completion payload.
    ///
    /// Closes the popup, resolves the waiter, and clears the slot so a
    /// subsequent launch can proceed. A completion with no active session
    /// is a stale or duplicate message: logged and dropped.
    pub async fn complete(&self, payload: Value) -> bool {
        let session = self.slot.lock().take();
        match session {
            Some(session) => {
                if let Err(e) = self.surface.close(session.handle).await {
                    warn!(error = %e, "Failed to close completed popup");
                }
                if session.resolver.send(payload).is_err() {
                    debug!("Session completion receiver dropped");
                }
                true
            }
            None => {
                warn!("Flow completion with no active session, dropping");
                false
            }
        }
    }

    /// Abandon the active session without resolving it.
    ///
    /// Used on flow deadline expiry: the popup is closed and the caller's
    /// future fails when its receiver observes the dropped resolver.
    pub async fn abandon(&self) -> bool {
        let session = self.slot.lock().take();
        match session {
            Some(session) => {
                if let Err(e) = self.surface.close(session.handle).await {
                    warn!(error = %e, "Failed to close abandoned popup");
                }
                true
            }
            None => false,
        }
    }

    /// Acknowledge a liveness probe from the active popup.
    ///
    /// Replies with an empty payload tagged with the probe's id. With no
    /// active popup the probe is stale: logged and dropped.
    pub async fn ack_probe(&self, id: CorrelationId) -> bool {
        let handle = self.slot.lock().as_ref().map(|session| session.handle);
        match handle {
            Some(handle) => {
                let reply = Envelope::reply_to(id, serde_json::json!({}));
                if let Err(e) = self.surface.post(handle, reply).await {
                    warn!(error = %e, "Failed to acknowledge popup probe");
                    return false;
                }
                true
            }
            None => {
                warn!(correlation_id = %id, "Probe with no active session, dropping");
                false
            }
        }
    }
}
