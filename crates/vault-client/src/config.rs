//! Client configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use vault_channel::popup::{DEFAULT_POPUP_HEIGHT, DEFAULT_POPUP_WIDTH};

/// Default base URL of the vault context.
pub const DEFAULT_SERVICE_URL: &str = "https://identity.deso.org";

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Service URL is empty or unparseable.
    #[error("invalid service url: {0}")]
    InvalidServiceUrl(String),

    /// A timeout was configured as zero.
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    /// Popup dimensions must be non-zero.
    #[error("invalid popup geometry: {0}")]
    InvalidPopup(String),
}

/// Popup window dimensions for interactive flows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Popup width.
    pub width: u32,
    /// Popup height.
    pub height: u32,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_POPUP_WIDTH,
            height: DEFAULT_POPUP_HEIGHT,
        }
    }
}

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the vault context.
    pub service_url: String,

    /// Target the test network instead of mainnet.
    pub testnet: bool,

    /// Host is running inside a webview.
    pub webview: bool,

    /// Referral code forwarded to the login and free-funds flows.
    pub referral_code: Option<String>,

    /// Popup window dimensions.
    pub popup: PopupConfig,

    /// Deadline for embedded-channel requests.
    pub default_timeout: Duration,

    /// Optional deadline for interactive popup flows. `None` leaves the
    /// flow pending until the user finishes or abandons the popup.
    pub flow_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            testnet: false,
            webview: false,
            referral_code: None,
            popup: PopupConfig::default(),
            default_timeout: Duration::from_secs(30),
            flow_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_url.is_empty() {
            return Err(ConfigError::InvalidServiceUrl("empty".into()));
        }
        let url = Url::parse(&self.service_url)
            .map_err(|e| ConfigError::InvalidServiceUrl(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidServiceUrl(
                "cannot be a base url".into(),
            ));
        }

        if self.default_timeout.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout(
                "default_timeout cannot be 0".into(),
            ));
        }
        if let Some(flow_timeout) = self.flow_timeout {
            if flow_timeout.as_millis() == 0 {
                return Err(ConfigError::InvalidTimeout(
                    "flow_timeout cannot be 0".into(),
                ));
            }
        }

        if self.popup.width == 0 || self.popup.height == 0 {
            return Err(ConfigError::InvalidPopup(
                "popup dimensions cannot be 0".into(),
            ));
        }

        Ok(())
    }
}
