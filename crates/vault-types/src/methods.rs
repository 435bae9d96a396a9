//! Method vocabulary: outbound operations, inbound request names, and the
//! popup flow paths.

use std::fmt;

/// Inbound request methods the dispatcher recognizes.
///
/// Anything else arriving with a `method` is a reportable, non-fatal
/// protocol error.
pub mod inbound {
    /// Embedded-frame channel is live; flush the bootstrap queue.
    pub const BOOTSTRAP_READY: &str = "bootstrap-ready";
    /// An interactive popup flow finished; resolve the waiting caller.
    pub const FLOW_COMPLETED: &str = "flow-completed";
    /// Liveness probe from the active popup; expects an empty ack.
    pub const INFO_PROBE: &str = "info-probe";
}

/// Outbound vault operations carried over the embedded-frame channel.
///
/// These differ only in method name and payload shape, never in transport
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultMethod {
    /// Sign a transaction.
    Sign,
    /// Encrypt a message for a recipient.
    Encrypt,
    /// Decrypt a batch of encrypted messages.
    Decrypt,
    /// Issue a signed JWT proving key ownership.
    IssueToken,
}

impl VaultMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sign => "sign",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::IssueToken => "issue-token",
        }
    }
}

impl fmt::Display for VaultMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interactive flows launched in a popup window.
///
/// Flow parameters travel as URL query parameters, not message payloads;
/// these paths are appended to the configured vault service URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPath {
    /// User login / account creation.
    LogIn,
    /// Reset a user's access level.
    LogOut,
    /// Sign a transaction outside the granted access level.
    ApproveTransaction,
    /// Generate a derived key.
    DeriveKey,
    /// Fetch message encryption shared secrets for a derived key.
    GetSharedSecrets,
    /// KYC flow granting starter funds.
    GetFreeFunds,
    /// Phone verification granting starter funds.
    VerifyPhone,
}

impl FlowPath {
    /// URL path segment for this flow.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LogIn => "log-in",
            Self::LogOut => "log-out",
            Self::ApproveTransaction => "approve-transaction",
            Self::DeriveKey => "derive-key",
            Self::GetSharedSecrets => "get-shared-secrets",
            Self::GetFreeFunds => "get-free-funds",
            Self::VerifyPhone => "verify-phone",
        }
    }
}

impl fmt::Display for FlowPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
