//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the portal client.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default STB user agent presented to the portal.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (QtEmbedded; U; Linux; C) AppleWebKit/533.3 \
     (KHTML, like Gecko) MAG200 stbapp ver: 2 rev: 250 Safari/533.3";

/// Default client identity string sent as `X-User-Agent`.
const DEFAULT_MODEL: &str = "Model: MAG250; Link: WiFi";

/// Main configuration settings for the portal client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Portal endpoint and device identity
    pub portal: PortalSettings,
    /// Request/retry behaviour
    pub client: ClientSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Portal address and immutable device identity.
///
/// These values identify one end device to the middleware and are read-only
/// for the lifetime of a process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Portal base address including any context path,
    /// e.g. `http://portal.example.com/portal`
    pub base_url: String,
    /// MAC-style device identity, e.g. `00:1A:79:00:00:00`
    pub mac_address: String,
    /// Device serial number, sent as the `SN` header once authenticated
    pub serial_number: String,
    /// Primary device identifier
    pub device_id: String,
    /// Secondary device identifier
    pub device_id_2: String,
    /// Device signature used during session activation
    pub signature: String,
}

/// Request execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Additional attempts after an authorization failure
    pub max_retries: u32,
    /// Consecutive upstream pages merged into one logical listing page
    pub max_page_window: u32,
    /// Override for the persisted session record location
    pub token_path: Option<PathBuf>,
    /// User agent presented to the portal
    pub user_agent: String,
    /// Client identity string sent as `X-User-Agent`
    pub model: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            mac_address: String::new(),
            serial_number: String::new(),
            device_id: String::new(),
            device_id_2: String::new(),
            signature: String::new(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            max_page_window: 2,
            token_path: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            portal: PortalSettings::default(),
            client: ClientSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| crate::Error::config(format!("Invalid configuration file: {}", e)))
    }

    /// Load settings from environment variables on top of defaults
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Apply environment variable overrides to these settings
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(url) = std::env::var("STB_PORTAL_URL") {
            self.portal.base_url = url;
        }
        if let Ok(mac) = std::env::var("STB_PORTAL_MAC") {
            self.portal.mac_address = mac;
        }
        if let Ok(sn) = std::env::var("STB_PORTAL_SN") {
            self.portal.serial_number = sn;
        }
        if let Ok(id) = std::env::var("STB_PORTAL_DEVICE_ID") {
            self.portal.device_id = id;
        }
        if let Ok(id) = std::env::var("STB_PORTAL_DEVICE_ID_2") {
            self.portal.device_id_2 = id;
        }
        if let Ok(sig) = std::env::var("STB_PORTAL_SIGNATURE") {
            self.portal.signature = sig;
        }
        if let Ok(timeout) = std::env::var("STB_PORTAL_TIMEOUT") {
            self.client.timeout_secs = timeout
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid timeout: {}", e)))?;
        }
        if let Ok(retries) = std::env::var("STB_PORTAL_MAX_RETRIES") {
            self.client.max_retries = retries
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid retry count: {}", e)))?;
        }
        if let Ok(window) = std::env::var("STB_PORTAL_PAGE_WINDOW") {
            self.client.max_page_window = window
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid page window: {}", e)))?;
        }
        Ok(self)
    }

    /// Validate that the settings describe a usable portal connection
    pub fn validate(&self) -> crate::Result<()> {
        if self.portal.base_url.is_empty() {
            return Err(crate::Error::config("portal.base_url is required"));
        }
        Url::parse(&self.portal.base_url)
            .map_err(|e| crate::Error::config(format!("Invalid portal.base_url: {}", e)))?;
        if self.portal.mac_address.is_empty() {
            return Err(crate::Error::config("portal.mac_address is required"));
        }
        if self.client.max_page_window == 0 {
            return Err(crate::Error::config("client.max_page_window must be >= 1"));
        }
        Ok(())
    }

    /// The single load endpoint every request goes through
    pub fn endpoint_url(&self) -> String {
        format!("{}/server/load.php", self.portal.base_url.trim_end_matches('/'))
    }

    /// Referrer expected by the portal
    pub fn referrer(&self) -> String {
        format!("{}/c/", self.portal.base_url.trim_end_matches('/'))
    }

    /// Portal origin (`scheme://host[:port]`), used to absolutize
    /// portal-relative artwork and media paths
    pub fn origin(&self) -> crate::Result<String> {
        let url = Url::parse(&self.portal.base_url)?;
        let host = url
            .host_str()
            .ok_or_else(|| crate::Error::config("portal.base_url has no host"))?;
        Ok(match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        })
    }

    /// Cookie value carrying the device identity
    pub fn mac_cookie(&self) -> String {
        format!("mac={}", self.portal.mac_address)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs)
    }

    /// Location of the persisted session record.
    ///
    /// Defaults to `<config dir>/stb-portal-client/session.json` when no
    /// override is configured.
    pub fn token_store_path(&self) -> PathBuf {
        match &self.client.token_path {
            Some(path) => path.clone(),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("stb-portal-client")
                .join("session.json"),
        }
    }
}
