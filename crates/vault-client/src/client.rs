//! The `VaultClient` facade.
//!
//! An explicitly constructed protocol client owned by the host application;
//! there is no module-level singleton. All vault operations share one
//! outbound send path (fresh id, register completion, hand to the frame
//! channel) and differ only in method name and payload shape. Interactive
//! flows go through the popup surface instead and bypass the bootstrap
//! queue entirely.

use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{ClientError, ClientResult};
use crate::flows::{FlowRequest, LoginOptions, SharedSecretsParams};
use crate::pending::PendingStore;
use crate::session::{SessionManager, SessionState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use vault_channel::{ChannelTransport, FrameChannel, PopupSurface, WindowSpec};
use vault_types::{
    DecryptRequest, EncryptRequest, Envelope, IssueTokenRequest, LoginReceipt, SignRequest,
    VaultMethod,
};

/// Host-side client for the vault custody protocol.
pub struct VaultClient {
    config: ClientConfig,
    frame: Arc<FrameChannel>,
    pending: Arc<PendingStore>,
    session: Arc<SessionManager>,
    surface: Arc<dyn PopupSurface>,
    dispatcher: Arc<Dispatcher>,
}

impl VaultClient {
    /// Construct a client over the embedded-frame transport and the popup
    /// surface. Validates the configuration up front.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn ChannelTransport>,
        surface: Arc<dyn PopupSurface>,
    ) -> ClientResult<Self> {
        config.validate()?;

        let frame = Arc::new(FrameChannel::new(transport));
        let pending = Arc::new(PendingStore::new(config.default_timeout));
        let session = Arc::new(SessionManager::new(surface.clone()));
        let dispatcher = Arc::new(Dispatcher::new(
            frame.clone(),
            pending.clone(),
            session.clone(),
        ));

        Ok(Self {
            config,
            frame,
            pending,
            session,
            surface,
            dispatcher,
        })
    }

    // Inbound plumbing

    /// Handle one inbound envelope from either surface.
    pub async fn handle_message(&self, envelope: Envelope) {
        self.dispatcher.handle(envelope).await;
    }

    /// Future that consumes inbound envelopes until the channel closes.
    ///
    /// Typically spawned: `tokio::spawn(client.inbound_pump(rx))`.
    pub fn inbound_pump(
        &self,
        inbound: mpsc::Receiver<Envelope>,
    ) -> impl std::future::Future<Output = ()> + Send + 'static {
        self.dispatcher.clone().run(inbound)
    }

    // Embedded operations (shared send path)

    /// Sign a transaction inside the vault context.
    pub async fn sign(&self, request: SignRequest) -> ClientResult<Value> {
        self.request(VaultMethod::Sign, serde_json::to_value(request)?, None)
            .await
    }

    /// Encrypt a message for a recipient.
    pub async fn encrypt(&self, request: EncryptRequest) -> ClientResult<Value> {
        self.request(VaultMethod::Encrypt, serde_json::to_value(request)?, None)
            .await
    }

    /// Decrypt a batch of encrypted messages.
    pub async fn decrypt(&self, request: DecryptRequest) -> ClientResult<Value> {
        self.request(VaultMethod::Decrypt, serde_json::to_value(request)?, None)
            .await
    }

    /// Issue a signed JWT proving ownership of the user's public key.
    pub async fn issue_token(&self, request: IssueTokenRequest) -> ClientResult<Value> {
        self.request(VaultMethod::IssueToken, serde_json::to_value(request)?, None)
            .await
    }

    /// Send a raw vault operation and await its response.
    ///
    /// `timeout` overrides the configured default deadline. On expiry the
    /// registry entry is removed and the caller gets
    /// [`ClientError::Timeout`].
    pub async fn request(
        &self,
        method: VaultMethod,
        payload: Value,
        timeout: Option<Duration>,
    ) -> ClientResult<Value> {
        let timeout = timeout.unwrap_or(self.config.default_timeout);
        let (id, rx) = self.pending.register(method.as_str(), Some(timeout));

        let envelope = Envelope::request_with_id(id, method.as_str(), payload);
        if let Err(e) = self.frame.send(envelope).await {
            self.pending.cancel(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(_)) => Err(ClientError::CompletionDropped),
            Err(_) => {
                self.pending.cancel(&id);
                Err(ClientError::Timeout {
                    operation: method.to_string(),
                    after: timeout,
                })
            }
        }
    }

    // Interactive flows (popup path)

    /// Log a user in, resolving to the added key merged with its user
    /// record.
    pub async fn login(&self, options: LoginOptions) -> ClientResult<LoginReceipt> {
        let payload = self.launch_flow(FlowRequest::login(&options)).await?;
        Ok(LoginReceipt::from_completion(&payload)?)
    }

    /// Log a user out, resetting their access level.
    pub async fn logout(&self, public_key: &str) -> ClientResult<Value> {
        self.launch_flow(FlowRequest::logout(public_key)?).await
    }

    /// Approve (sign) a transaction outside the granted access level.
    pub async fn approve_transaction(&self, transaction_hex: &str) -> ClientResult<Value> {
        self.launch_flow(FlowRequest::approve_transaction(transaction_hex)?)
            .await
    }

    /// Generate a derived key.
    pub async fn derive_key(&self, callback_url: Option<&str>) -> ClientResult<Value> {
        self.launch_flow(FlowRequest::derive_key(callback_url)).await
    }

    /// Fetch message shared secrets for a derived key.
    pub async fn get_shared_secrets(&self, params: &SharedSecretsParams) -> ClientResult<Value> {
        self.launch_flow(FlowRequest::get_shared_secrets(params)?)
            .await
    }

    /// Run the KYC flow granting starter funds.
    pub async fn get_free_funds(&self, public_key: &str) -> ClientResult<Value> {
        self.launch_flow(FlowRequest::get_free_funds(public_key)?)
            .await
    }

    /// Run the phone-verification flow granting starter funds.
    pub async fn verify_phone(&self, public_key: &str) -> ClientResult<Value> {
        self.launch_flow(FlowRequest::verify_phone(public_key)?).await
    }

    async fn launch_flow(&self, request: FlowRequest) -> ClientResult<Value> {
        let url = request.to_url(&self.config)?;
        let caller = self.surface.caller_window();
        let spec = WindowSpec::centered(self.config.popup.width, self.config.popup.height, &caller);

        let operation = request.path();
        let rx = self.session.launch(&url, &spec).await?;

        match self.config.flow_timeout {
            Some(deadline) => match tokio::time::timeout(deadline, rx).await {
                Ok(Ok(payload)) => Ok(payload),
                Ok(Err(_)) => Err(ClientError::CompletionDropped),
                Err(_) => {
                    self.session.abandon().await;
                    Err(ClientError::Timeout {
                        operation: operation.to_string(),
                        after: deadline,
                    })
                }
            },
            None => rx.await.map_err(|_| ClientError::CompletionDropped),
        }
    }

    // Observers

    /// Whether the embedded frame has signalled readiness.
    pub fn is_ready(&self) -> bool {
        self.frame.is_ready()
    }

    /// Number of outstanding embedded requests.
    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }

    /// State of the interactive session slot.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The correlation registry, for wiring the expiry sweeper.
    pub fn pending_store(&self) -> Arc<PendingStore> {
        self.pending.clone()
    }
}
