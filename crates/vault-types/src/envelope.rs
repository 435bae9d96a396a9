//! Message envelope for all traffic between the host and the vault context.
//!
//! Every message, in both directions, is an [`Envelope`]:
//!
//! - Requests carry a `method`; responses do not. That single field is the
//!   sole classifier on the inbound path.
//! - The `service` tag namespaces the protocol; envelopes with a foreign tag
//!   are filtered out before any routing happens.
//! - `id` pairs an outbound request with its eventual response.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Constant namespace literal carried by every protocol message.
pub const SERVICE_TAG: &str = "vault";

/// Correlation ID pairing an outbound request with its inbound response.
///
/// Uses UUID v4: entries are addressed purely by identity, so
/// collision-resistant randomness is all that is required (no time
/// ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new random correlation ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-message classification on the inbound path.
///
/// Not a persistent state: each envelope is classified independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Carries a `method`: a request sent *to* the host.
    Request,
    /// No `method`: an answer to something the host sent.
    Response,
    /// Foreign service tag; never reaches either routing path.
    Foreign,
}

/// The universal wire envelope, identical in shape in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Correlation ID. Fresh for requests, echoed for responses.
    pub id: CorrelationId,

    /// Protocol namespace; always [`SERVICE_TAG`] for messages we emit.
    pub service: String,

    /// Present only on requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Opaque structured value; never interpreted by the protocol layer.
    pub payload: serde_json::Value,
}

impl Envelope {
    /// Build an outbound request with a fresh correlation ID.
    pub fn request(method: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: CorrelationId::new(),
            service: SERVICE_TAG.to_string(),
            method: Some(method.into()),
            payload,
        }
    }

    /// Build an outbound request under an already-registered ID.
    pub fn request_with_id(
        id: CorrelationId,
        method: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id,
            service: SERVICE_TAG.to_string(),
            method: Some(method.into()),
            payload,
        }
    }

    /// Build a reply to a received request, echoing its ID.
    ///
    /// Replies carry no method, marking them as responses on the far side.
    pub fn reply_to(id: CorrelationId, payload: serde_json::Value) -> Self {
        Self {
            id,
            service: SERVICE_TAG.to_string(),
            method: None,
            payload,
        }
    }

    /// Classify this envelope for routing.
    pub fn kind(&self) -> MessageKind {
        if self.service != SERVICE_TAG {
            MessageKind::Foreign
        } else if self.method.is_some() {
            MessageKind::Request
        } else {
            MessageKind::Response
        }
    }
}
