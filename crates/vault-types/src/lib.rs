//! # Vault Types Crate
//!
//! Wire-level types for the vault custody protocol.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses the channel is
//!   defined here, once.
//! - **Opaque Payloads**: the protocol layer never interprets payload
//!   contents; payloads are `serde_json::Value` end to end.
//! - **Service-Tag Filtering**: envelopes carrying a foreign service tag are
//!   filtered before classification, never treated as errors.

pub mod envelope;
pub mod methods;
pub mod payloads;

pub use envelope::{CorrelationId, Envelope, MessageKind, SERVICE_TAG};
pub use methods::{inbound, FlowPath, VaultMethod};
pub use payloads::{
    AccessCredentials, DecryptRequest, EncryptRequest, IssueTokenRequest, LoginReceipt,
    PayloadError, SignRequest,
};
