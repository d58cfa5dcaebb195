//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::LocationSets;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Booking session identity and query filters
    #[serde(default)]
    pub session: SessionConfig,

    /// HTTP behavior and retry policy
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling loop settings
    #[serde(default)]
    pub polling: PollingConfig,

    /// Outgoing proxy
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Location IDs per examination type
    #[serde(default)]
    pub locations: LocationSets,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or the defaults when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write configuration as TOML (temp file, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.session.user_agent.trim().is_empty() {
            return Err(AppError::validation("session.user_agent is empty"));
        }
        if !self.session.ssn.is_empty() && !is_valid_ssn(&self.session.ssn) {
            return Err(AppError::validation(
                "session.ssn must look like YYYYMMDD-XXXX",
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.api.max_attempts == 0 {
            return Err(AppError::validation("api.max_attempts must be > 0"));
        }
        if self.api.max_concurrent == 0 {
            return Err(AppError::validation("api.max_concurrent must be > 0"));
        }
        if self.polling.interval_secs == 0 {
            return Err(AppError::validation("polling.interval_secs must be > 0"));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is invalid: {e}")))?;
        if let ProxyConfig::Custom { host, .. } = &self.proxy {
            if host.trim().is_empty() {
                return Err(AppError::validation("proxy.host is empty"));
            }
        }
        Ok(())
    }
}

/// Check the `YYYYMMDD-XXXX` identity number shape.
fn is_valid_ssn(ssn: &str) -> bool {
    Regex::new(r"^\d{8}-\d{4}$")
        .map(|re| re.is_match(ssn))
        .unwrap_or(false)
}

/// Identity and query filters sent with every availability request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Personal identity number of the candidate
    #[serde(default)]
    pub ssn: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Session cookies, supplied from an authenticated browser session
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,

    #[serde(default = "defaults::licence_id")]
    pub licence_id: u32,

    #[serde(default)]
    pub booking_mode_id: u32,

    #[serde(default)]
    pub ignore_debt: bool,

    #[serde(default)]
    pub ignore_booking_hindrance: bool,

    #[serde(default)]
    pub exclude_examination_categories: Vec<u32>,

    #[serde(default)]
    pub reschedule_type_id: u32,

    #[serde(default)]
    pub payment_is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,

    #[serde(default)]
    pub searched_months: u32,

    /// Date range anchor, ISO 8601
    #[serde(default = "defaults::start_date")]
    pub start_date: String,

    #[serde(default)]
    pub nearby_location_ids: Vec<u32>,

    #[serde(default = "defaults::vehicle_type_id")]
    pub vehicle_type_id: u32,

    #[serde(default = "defaults::tachograph_type_id")]
    pub tachograph_type_id: u32,

    #[serde(default = "defaults::occasion_choice_id")]
    pub occasion_choice_id: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ssn: String::new(),
            user_agent: defaults::user_agent(),
            cookies: BTreeMap::new(),
            licence_id: defaults::licence_id(),
            booking_mode_id: 0,
            ignore_debt: false,
            ignore_booking_hindrance: false,
            exclude_examination_categories: Vec::new(),
            reschedule_type_id: 0,
            payment_is_active: false,
            payment_reference: None,
            payment_url: None,
            searched_months: 0,
            start_date: defaults::start_date(),
            nearby_location_ids: Vec::new(),
            vehicle_type_id: defaults::vehicle_type_id(),
            tachograph_type_id: defaults::tachograph_type_id(),
            occasion_choice_id: defaults::occasion_choice_id(),
        }
    }
}

/// HTTP client and retry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the booking site; endpoints are resolved against it
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Attempts per location before giving up for the cycle
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in seconds
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_secs: u64,

    /// Maximum locations queried at once
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Skip TLS verification (needed behind an intercepting proxy)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout(),
            max_attempts: defaults::max_attempts(),
            retry_delay_secs: defaults::retry_delay(),
            max_concurrent: defaults::max_concurrent(),
            accept_invalid_certs: false,
        }
    }
}

/// Polling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between the end of one cycle and the start of the next
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Report every slot of the first cycle as added
    #[serde(default = "defaults::announce_initial")]
    pub announce_initial: bool,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            announce_initial: defaults::announce_initial(),
        }
    }
}

/// Outgoing proxy selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProxyConfig {
    #[default]
    None,
    /// Local Fiddler debugging proxy
    Fiddler,
    /// Local TOR daemon
    Tor,
    Custom {
        #[serde(default = "defaults::proxy_protocol")]
        protocol: String,
        host: String,
        port: u16,
    },
}

impl ProxyConfig {
    /// Proxy URL for both HTTP and HTTPS traffic, if any.
    pub fn url(&self) -> Option<String> {
        match self {
            ProxyConfig::None => None,
            ProxyConfig::Fiddler => Some("http://127.0.0.1:8888".to_string()),
            ProxyConfig::Tor => Some("socks5h://localhost:9050".to_string()),
            ProxyConfig::Custom {
                protocol,
                host,
                port,
            } => Some(format!("{protocol}://{host}:{port}")),
        }
    }

    /// Intercepting proxies re-sign TLS traffic with their own certificate.
    pub fn intercepts_tls(&self) -> bool {
        matches!(self, ProxyConfig::Fiddler)
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
    }
    pub fn licence_id() -> u32 {
        5
    }
    pub fn start_date() -> String {
        "1970-01-01T00:00:00.000Z".into()
    }
    pub fn vehicle_type_id() -> u32 {
        2
    }
    pub fn tachograph_type_id() -> u32 {
        1
    }
    pub fn occasion_choice_id() -> u32 {
        1
    }

    pub fn base_url() -> String {
        "https://fp.trafikverket.se/".into()
    }
    pub fn timeout() -> u64 {
        60
    }
    pub fn max_attempts() -> u32 {
        10
    }
    pub fn retry_delay() -> u64 {
        2
    }
    pub fn max_concurrent() -> usize {
        4
    }

    pub fn interval() -> u64 {
        60
    }
    pub fn announce_initial() -> bool {
        true
    }

    pub fn proxy_protocol() -> String {
        "http".into()
    }
}
