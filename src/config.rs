//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::mws::regions::Region;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Product looked up when a request carries no query.
pub const DEFAULT_QUERY: &str = "B072X2HHQ3";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// MWS marketplace region
    #[serde(default)]
    pub region: Region,

    /// Base URL override for the MWS endpoint (e.g. a local mock)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Overall timeout for the upstream call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout for the upstream call, in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Query used when a request supplies none
    #[serde(default = "default_query")]
    pub default_query: String,

    /// Map empty/failed lookups to 404/502 instead of 200
    #[serde(default)]
    pub strict_status: bool,

    /// CLI output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Seller credentials
    #[serde(default)]
    pub credentials: Credentials,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::Us,
            endpoint: None,
            proxy: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            default_query: default_query(),
            strict_status: false,
            format: OutputFormat::Json,
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("mws-lookup").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(region) = std::env::var("MWS_REGION") {
            if let Ok(r) = region.parse() {
                self.region = r;
            }
        }

        if let Ok(endpoint) = std::env::var("MWS_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let Ok(proxy) = std::env::var("MWS_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(timeout) = std::env::var("MWS_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        if let Ok(query) = std::env::var("MWS_DEFAULT_QUERY") {
            if !query.is_empty() {
                self.default_query = query;
            }
        }

        if let Ok(strict) = std::env::var("MWS_STRICT_STATUS") {
            if let Ok(s) = strict.parse() {
                self.strict_status = s;
            }
        }

        self.credentials = self.credentials.with_env();
        self
    }

    /// Returns the MWS base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        self.endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/').to_string())
            .unwrap_or_else(|| self.region.base_url())
    }

    /// Returns the configured marketplace id, or the region's default.
    pub fn marketplace_id(&self) -> String {
        self.credentials
            .marketplace_id
            .clone()
            .unwrap_or_else(|| self.region.marketplace_id().to_string())
    }
}

/// Seller credentials for signed MWS calls.
///
/// Built once at startup and handed to the lookup command; never mutated.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub aws_access_key_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default)]
    pub mws_auth_token: String,

    /// Overrides the region's marketplace id
    #[serde(default)]
    pub marketplace_id: Option<String>,

    #[serde(default)]
    pub seller_id: String,
}

impl Credentials {
    /// Applies `MWS_*` environment overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(v) = std::env::var("MWS_ACCESS_KEY_ID") {
            self.aws_access_key_id = v;
        }
        if let Ok(v) = std::env::var("MWS_CLIENT_SECRET") {
            self.client_secret = v;
        }
        if let Ok(v) = std::env::var("MWS_AUTH_TOKEN") {
            self.mws_auth_token = v;
        }
        if let Ok(v) = std::env::var("MWS_MARKETPLACE_ID") {
            self.marketplace_id = Some(v);
        }
        if let Ok(v) = std::env::var("MWS_SELLER_ID") {
            self.seller_id = v;
        }
        self
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.aws_access_key_id.is_empty() {
            missing.push("aws_access_key_id");
        }
        if self.client_secret.is_empty() {
            missing.push("client_secret");
        }
        if self.mws_auth_token.is_empty() {
            missing.push("mws_auth_token");
        }
        if self.seller_id.is_empty() {
            missing.push("seller_id");
        }
        missing
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("client_secret", &"<redacted>")
            .field("mws_auth_token", &"<redacted>")
            .field("marketplace_id", &self.marketplace_id)
            .field("seller_id", &self.seller_id)
            .finish()
    }
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}. Use: json, table, markdown", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}
