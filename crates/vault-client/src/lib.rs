//! # Vault Client - Custody Protocol Client
//!
//! This crate is the host-side client for delegated key custody: sensitive
//! operations (signing, encryption, decryption, token issuance, login) run
//! inside an isolated vault context that the host never inspects. Host and
//! vault communicate exclusively through an asynchronous, correlation-id
//! message protocol.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        VaultClient                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  sign / encrypt / decrypt / issue_token     login / logout  │
//! │                 │                                │          │
//! │  ┌──────────────┴──────────────┐  ┌──────────────┴───────┐  │
//! │  │        Pending Store        │  │   Session Manager    │  │
//! │  │  (correlation id → oneshot) │  │  (single popup slot) │  │
//! │  └──────────────┬──────────────┘  └──────────────┬───────┘  │
//! │                 │                                │          │
//! │  ┌──────────────┴──────────────┐  ┌──────────────┴───────┐  │
//! │  │        FrameChannel         │  │     PopupSurface     │  │
//! │  │  (bootstrap queue + latch)  │  │  (centered window)   │  │
//! │  └──────────────┬──────────────┘  └──────────────────────┘  │
//! │                 │                                           │
//! │  ┌──────────────┴──────────────────────────────┐            │
//! │  │                 Dispatcher                  │            │
//! │  │  request (has method) / response (no method)│            │
//! │  └─────────────────────────────────────────────┘            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vault_client::{ClientConfig, VaultClient};
//!
//! let client = VaultClient::new(ClientConfig::default(), transport, surface)?;
//! tokio::spawn(client.inbound_pump(inbound_rx));
//! let receipt = client.login(LoginOptions::new(2)).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod flows;
pub mod pending;
pub mod session;

// Re-exports for public API
pub use client::VaultClient;
pub use config::{ClientConfig, ConfigError, PopupConfig};
pub use dispatcher::Dispatcher;
pub use error::{ClientError, ClientResult};
pub use flows::{FlowRequest, LoginOptions, SharedSecretsParams};
pub use pending::{cleanup_task, PendingStats, PendingStore};
pub use session::{SessionManager, SessionState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
