//! In-memory vault-context harness.
//!
//! Plays the far side of both delivery surfaces: receives everything the
//! host sends over the embedded frame, and injects inbound traffic through
//! the client's dispatcher pump the way a real message listener would.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use vault_channel::popup::memory::MemoryPopupSurface;
use vault_channel::memory_transport;
use vault_client::{ClientConfig, VaultClient};
use vault_types::{CorrelationId, Envelope, SERVICE_TAG};

pub struct TestVault {
    pub client: Arc<VaultClient>,
    /// Host → vault traffic on the embedded frame.
    pub outbound: mpsc::Receiver<Envelope>,
    /// Vault → host traffic, consumed by the dispatcher pump.
    pub inbound: mpsc::Sender<Envelope>,
    pub surface: Arc<MemoryPopupSurface>,
    pump: JoinHandle<()>,
}

impl TestVault {
    pub fn spawn(config: ClientConfig) -> Self {
        let (transport, outbound) = memory_transport(32);
        let surface = Arc::new(MemoryPopupSurface::default());
        let client = Arc::new(
            VaultClient::new(config, Arc::new(transport), surface.clone())
                .expect("valid test config"),
        );

        let (inbound, inbound_rx) = mpsc::channel(32);
        let pump = tokio::spawn(client.inbound_pump(inbound_rx));

        Self {
            client,
            outbound,
            inbound,
            surface,
            pump,
        }
    }

    /// Inject an inbound request from the vault context.
    pub async fn send_request(&self, method: &str, payload: serde_json::Value) -> CorrelationId {
        let envelope = Envelope {
            id: CorrelationId::new(),
            service: SERVICE_TAG.to_string(),
            method: Some(method.to_string()),
            payload,
        };
        let id = envelope.id;
        self.inbound.send(envelope).await.expect("pump alive");
        id
    }

    /// Inject a response to a host request.
    pub async fn respond(&self, id: CorrelationId, payload: serde_json::Value) {
        self.inbound
            .send(Envelope::reply_to(id, payload))
            .await
            .expect("pump alive");
    }

    /// Announce frame readiness and consume the handshake ack.
    pub async fn bootstrap(&mut self) {
        let id = self
            .send_request("bootstrap-ready", serde_json::json!({}))
            .await;
        // Flushed queue (if any) precedes the ack; skip to it.
        loop {
            let envelope = self.outbound.recv().await.expect("ack");
            if envelope.method.is_none() && envelope.id == id {
                break;
            }
        }
    }

    pub async fn shutdown(self) {
        drop(self.inbound);
        let _ = self.pump.await;
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig {
        service_url: "https://vault.example".to_string(),
        default_timeout: std::time::Duration::from_secs(5),
        ..Default::default()
    }
}
