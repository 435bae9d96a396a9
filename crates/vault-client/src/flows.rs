//! Interactive flow launch requests.
//!
//! Flow parameters travel as URL query parameters on the popup URL, never
//! as message payloads. Required-parameter violations surface here as
//! synchronous [`ClientError::MissingParameter`] values, before any popup
//! opens.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use url::Url;
use vault_types::FlowPath;

/// Query parameter names on popup URLs.
mod keys {
    pub const ACCESS_LEVEL: &str = "access-level";
    pub const NETWORK_FLAG: &str = "network-flag";
    pub const WEBVIEW: &str = "webview";
    pub const REFERRAL_CODE: &str = "referral-code";
    pub const CALLBACK_URL: &str = "callback-url";
    pub const PUBLIC_KEY: &str = "public-key";
    pub const TRANSACTION_HEX: &str = "transaction-hex";
    pub const FREE_FUNDS_PROMPT: &str = "free-funds";
    pub const HIDE_GOOGLE: &str = "hide-google";
    pub const OWNER_PUBLIC_KEY: &str = "owner-public-key";
    pub const DERIVED_PUBLIC_KEY: &str = "derived-public-key";
    pub const JWT: &str = "jwt";
    pub const MESSAGE_PUBLIC_KEYS: &str = "message-public-keys";
}

/// Options for the login flow.
#[derive(Debug, Clone)]
pub struct LoginOptions {
    /// Requested access level.
    pub access_level: u32,
    /// Offer the free-funds bonus during signup.
    pub free_funds_prompt: bool,
    /// Hide third-party login from the vault UI.
    pub hide_google: bool,
}

impl LoginOptions {
    /// Login options with the given access level and no extras.
    pub fn new(access_level: u32) -> Self {
        Self {
            access_level,
            free_funds_prompt: false,
            hide_google: false,
        }
    }
}

/// Parameters for the get-shared-secrets flow. All fields are required.
#[derive(Debug, Clone)]
pub struct SharedSecretsParams {
    /// Callback URL receiving the secrets payload.
    pub callback_url: String,
    /// Master public key the derived key was issued for.
    pub owner_public_key: String,
    /// The derived public key.
    pub derived_public_key: String,
    /// JWT signed by the derived key.
    pub jwt: String,
    /// Public keys of the users whose shared secrets are requested.
    pub message_public_keys: Vec<String>,
}

/// A validated flow-launch request: path plus query pairs.
#[derive(Debug, Clone)]
pub struct FlowRequest {
    path: FlowPath,
    params: Vec<(&'static str, String)>,
}

fn require(name: &'static str, value: &str) -> ClientResult<String> {
    if value.is_empty() {
        Err(ClientError::MissingParameter(name))
    } else {
        Ok(value.to_string())
    }
}

impl FlowRequest {
    /// User login / account creation.
    pub fn login(options: &LoginOptions) -> Self {
        let mut params = vec![(keys::ACCESS_LEVEL, options.access_level.to_string())];
        if options.free_funds_prompt {
            params.push((keys::FREE_FUNDS_PROMPT, "true".to_string()));
        }
        if options.hide_google {
            params.push((keys::HIDE_GOOGLE, "true".to_string()));
        }
        Self {
            path: FlowPath::LogIn,
            params,
        }
    }

    /// Reset the access level of a user.
    pub fn logout(public_key: &str) -> ClientResult<Self> {
        Ok(Self {
            path: FlowPath::LogOut,
            params: vec![(keys::PUBLIC_KEY, require("publicKey", public_key)?)],
        })
    }

    /// Sign a transaction outside the granted access level.
    pub fn approve_transaction(transaction_hex: &str) -> ClientResult<Self> {
        Ok(Self {
            path: FlowPath::ApproveTransaction,
            params: vec![(
                keys::TRANSACTION_HEX,
                require("transactionHex", transaction_hex)?,
            )],
        })
    }

    /// Generate a derived key, optionally delivering it to a callback.
    pub fn derive_key(callback_url: Option<&str>) -> Self {
        let mut params = Vec::new();
        if let Some(callback_url) = callback_url {
            params.push((keys::CALLBACK_URL, callback_url.to_string()));
        }
        Self {
            path: FlowPath::DeriveKey,
            params,
        }
    }

    /// Fetch shared secrets for a derived key.
    pub fn get_shared_secrets(params: &SharedSecretsParams) -> ClientResult<Self> {
        if params.message_public_keys.is_empty() {
            return Err(ClientError::MissingParameter("messagePublicKeys"));
        }
        Ok(Self {
            path: FlowPath::GetSharedSecrets,
            params: vec![
                (keys::CALLBACK_URL, require("callbackUrl", &params.callback_url)?),
                (
                    keys::OWNER_PUBLIC_KEY,
                    require("ownerPublicKey", &params.owner_public_key)?,
                ),
                (
                    keys::DERIVED_PUBLIC_KEY,
                    require("derivedPublicKey", &params.derived_public_key)?,
                ),
                (keys::JWT, require("jwt", &params.jwt)?),
                (
                    keys::MESSAGE_PUBLIC_KEYS,
                    params.message_public_keys.join(","),
                ),
            ],
        })
    }

    /// KYC flow granting starter funds.
    pub fn get_free_funds(public_key: &str) -> ClientResult<Self> {
        Ok(Self {
            path: FlowPath::GetFreeFunds,
            params: vec![(keys::PUBLIC_KEY, require("publicKey", public_key)?)],
        })
    }

    /// Phone verification granting starter funds.
    pub fn verify_phone(public_key: &str) -> ClientResult<Self> {
        Ok(Self {
            path: FlowPath::VerifyPhone,
            params: vec![(keys::PUBLIC_KEY, require("publicKey", public_key)?)],
        })
    }

    /// Flow path of this request.
    pub fn path(&self) -> FlowPath {
        self.path
    }

    /// Assemble the popup URL: service base, flow path, flow parameters,
    /// then the applicable config-wide parameters.
    pub fn to_url(&self, config: &ClientConfig) -> ClientResult<Url> {
        let mut url = Url::parse(&config.service_url)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::ServiceUrlNotBase(config.service_url.clone()))?
            .pop_if_empty()
            .push(self.path.as_str());

        let mut pairs: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();
        if config.testnet {
            pairs.push((keys::NETWORK_FLAG, "testnet"));
        }
        if config.webview && self.includes_webview() {
            pairs.push((keys::WEBVIEW, "true"));
        }
        if let Some(referral_code) = &config.referral_code {
            if self.includes_referral() {
                pairs.push((keys::REFERRAL_CODE, referral_code.as_str()));
            }
        }

        // Serialize only when there is something to append; opening the
        // query serializer on an empty set would leave a dangling `?`.
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Flows rendered inside a webview carry the webview marker.
    fn includes_webview(&self) -> bool {
        matches!(
            self.path,
            FlowPath::LogIn | FlowPath::LogOut | FlowPath::ApproveTransaction | FlowPath::DeriveKey
        )
    }

    /// Only signup-adjacent flows carry the referral code.
    fn includes_referral(&self) -> bool {
        matches!(self.path, FlowPath::LogIn | FlowPath::GetFreeFunds)
    }
}
