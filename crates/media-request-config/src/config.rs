use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_PORT: u16 = 5055;
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub overseerr: OverseerrConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sensors: SensorConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Connection parameters for the Overseerr instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverseerrConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub ssl: bool,
    /// Path prefix when Overseerr is served below the web root (e.g. "overseerr")
    #[serde(default)]
    pub urlbase: String,
    pub api_key: String,
    // Optional local account, independent of the api key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Path segment of the webhook URL; generated at startup when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensorConfig {
    #[serde(default = "default_scan_interval_seconds")]
    pub scan_interval_seconds: u64,
    #[serde(default = "default_true")]
    pub refresh_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    "0.0.0.0:8099".to_string()
}

fn default_scan_interval_seconds() -> u64 {
    60
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            webhook_id: None,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            scan_interval_seconds: default_scan_interval_seconds(),
            refresh_on_startup: default_true(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl OverseerrConfig {
    /// `http[s]://host:port[/urlbase]`, without a trailing slash
    pub fn base_url(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        let urlbase = self.urlbase.trim_matches('/');
        if urlbase.is_empty() {
            format!("{}://{}:{}", scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}/{}", scheme, self.host, self.port, urlbase)
        }
    }

    /// Root of the v1 REST API
    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.base_url())
    }

    /// Local login is only attempted when both halves are present
    pub fn login(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

impl Config {
    /// Starting point written by `config init`
    pub fn template() -> Self {
        Self {
            overseerr: OverseerrConfig {
                host: default_host(),
                port: default_port(),
                ssl: false,
                urlbase: String::new(),
                api_key: API_KEY_PLACEHOLDER.to_string(),
                username: None,
                password: None,
            },
            server: ServerConfig::default(),
            sensors: SensorConfig::default(),
            http: HttpConfig::default(),
        }
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `OVERSEERR_API_KEY`, `OVERSEERR_HOST` and `OVERSEERR_PORT` from the environment
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("OVERSEERR_API_KEY").filter(|v| !v.is_empty()) {
            debug!("Using api key from OVERSEERR_API_KEY");
            self.overseerr.api_key = api_key;
        }
        if let Some(host) = lookup("OVERSEERR_HOST").filter(|v| !v.is_empty()) {
            debug!(host = %host, "Using host from OVERSEERR_HOST");
            self.overseerr.host = host;
        }
        if let Some(port) = lookup("OVERSEERR_PORT").filter(|v| !v.is_empty()) {
            self.overseerr.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid OVERSEERR_PORT '{}': {}", port, e))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let api_key = self.overseerr.api_key.trim();
        if api_key.is_empty() || api_key == API_KEY_PLACEHOLDER {
            return Err(anyhow::anyhow!("overseerr.api_key is required"));
        }
        if self.overseerr.host.trim().is_empty() {
            return Err(anyhow::anyhow!("overseerr.host cannot be empty"));
        }
        if self.overseerr.port == 0 {
            return Err(anyhow::anyhow!("overseerr.port must be between 1 and 65535"));
        }
        if self.sensors.scan_interval_seconds == 0 {
            return Err(anyhow::anyhow!("sensors.scan_interval_seconds must be greater than zero"));
        }
        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("http.timeout_seconds must be greater than zero"));
        }
        Ok(())
    }

    /// Copy safe to print: api key and password replaced by asterisks
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        masked.overseerr.api_key = mask(&self.overseerr.api_key);
        masked.overseerr.password = self.overseerr.password.as_deref().map(mask);
        masked
    }
}

fn mask(secret: &str) -> String {
    if secret.len() <= 4 {
        return "*".repeat(secret.len());
    }
    let visible: String = secret.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("{}{}", "*".repeat(8), visible)
}
