//! Client error taxonomy.
//!
//! Three families, with different propagation policies:
//!
//! 1. **Caller usage errors** (missing parameters, bad config): raised
//!    synchronously, before any protocol interaction.
//! 2. **Protocol errors** (unknown inbound method, response with no
//!    registered completion, stale flow completion): logged by the
//!    dispatcher and dropped; they never surface here and never crash the
//!    message loop.
//! 3. **Liveness** (channel never ready, popup never completes): bounded
//!    by the configured deadlines, surfacing as [`ClientError::Timeout`].

use crate::config::ConfigError;
use std::time::Duration;
use vault_channel::ChannelError;
use vault_types::PayloadError;

/// Errors surfaced to callers of the vault client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required flow parameter was absent or empty.
    #[error("{0} is required")]
    MissingParameter(&'static str),

    /// A second interactive flow was launched while one is pending.
    #[error("interactive session already active")]
    SessionActive,

    /// No response arrived within the deadline.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// Method or flow that timed out.
        operation: String,
        /// Deadline that expired.
        after: Duration,
    },

    /// The completion channel was dropped before resolving (request
    /// cancelled or expired out of the registry).
    #[error("completion channel closed")]
    CompletionDropped,

    /// The configured service URL cannot serve as a base for flow paths.
    #[error("service url cannot be a base: {0}")]
    ServiceUrlNotBase(String),

    /// Transport failure on one of the delivery surfaces.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Invalid client configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The service URL failed to parse.
    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),

    /// A flow completion payload had an unexpected shape.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Payload serialization failed.
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
