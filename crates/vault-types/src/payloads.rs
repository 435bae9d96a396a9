//! Typed payloads for the embedded vault operations, plus the login
//! completion receipt.
//!
//! The protocol layer treats all payloads as opaque; these types exist at
//! the API boundary so callers get field names instead of raw JSON. Wire
//! field names are camelCase, matching the vault context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Access-credential triple shared by every embedded operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCredentials {
    /// Access level granted at login.
    pub access_level: u32,
    /// HMAC proving the access level grant.
    pub access_level_hmac: String,
    /// The user's encrypted seed.
    pub encrypted_seed_hex: String,
}

/// Payload for the `sign` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    #[serde(flatten)]
    pub credentials: AccessCredentials,
    /// Hex of the transaction to sign.
    pub transaction_hex: String,
}

/// Payload for the `encrypt` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    #[serde(flatten)]
    pub credentials: AccessCredentials,
    /// Recipient public key in base58check form.
    pub recipient_public_key: String,
    /// Plaintext message to encrypt.
    pub message: String,
}

/// Payload for the `decrypt` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    #[serde(flatten)]
    pub credentials: AccessCredentials,
    /// Encrypted message objects, passed through opaquely.
    pub encrypted_messages: Vec<Value>,
}

/// Payload for the `issue-token` operation.
///
/// The vault context returns a signed JWT proving ownership of the user's
/// public key; the token itself is opaque here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenRequest {
    #[serde(flatten)]
    pub credentials: AccessCredentials,
}

/// Malformed flow-completion payloads.
#[derive(Debug, Clone, Error)]
pub enum PayloadError {
    /// Completion payload is missing a required field.
    #[error("flow completion missing field: {0}")]
    MissingField(&'static str),

    /// The announced public key has no matching user record.
    #[error("flow completion has no user record for {0}")]
    UnknownUser(String),
}

/// Result of a completed login flow.
///
/// The vault context reports `{ publicKeyAdded, users }`; the receipt is
/// the added public key merged with that user's record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginReceipt {
    /// Public key of the user that logged in.
    #[serde(rename = "publicKey")]
    pub public_key: String,

    /// Remaining fields of the user record, flattened.
    #[serde(flatten)]
    pub user: Map<String, Value>,
}

impl LoginReceipt {
    /// Build a receipt from a raw `flow-completed` payload.
    pub fn from_completion(payload: &Value) -> Result<Self, PayloadError> {
        let public_key = payload
            .get("publicKeyAdded")
            .and_then(Value::as_str)
            .ok_or(PayloadError::MissingField("publicKeyAdded"))?
            .to_string();

        let user = payload
            .get("users")
            .and_then(|users| users.get(&public_key))
            .and_then(Value::as_object)
            .ok_or_else(|| PayloadError::UnknownUser(public_key.clone()))?
            .clone();

        Ok(Self { public_key, user })
    }
}
