//! Configuration for the trip planner.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.
//! A `.env` file in the working directory is loaded before the environment is read.

use crate::error::{Result, TripPlannerError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which text-generation backend serves plan requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Cloud API (Gemini).
    #[default]
    Hosted,
    /// Local inference server speaking the Ollama generate API.
    Local,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Hosted => f.write_str("hosted"),
            Backend::Local => f.write_str("local"),
        }
    }
}

impl FromStr for Backend {
    type Err = TripPlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hosted" | "gemini" => Ok(Backend::Hosted),
            "local" | "ollama" => Ok(Backend::Local),
            other => Err(TripPlannerError::Config(format!(
                "Unknown backend '{}' (expected 'hosted' or 'local')",
                other
            ))),
        }
    }
}

/// Hosted API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedConfig {
    /// Base URL for the API (e.g., "https://generativelanguage.googleapis.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model name (e.g., "gemini-1.5-flash")
    pub model: String,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
        }
    }
}

/// Local inference server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Full URL of the generate endpoint
    pub endpoint: String,

    /// Model name as known to the local server
    pub model: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "llama3".to_string(),
        }
    }
}

/// Sampling and transport settings shared by both backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Temperature for generation
    pub temperature: f32,

    /// Maximum tokens for response
    pub max_tokens: u32,

    /// Upper bound on one generation call, in seconds
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Pass HTML embedded in generated plans through to the page unescaped.
    pub allow_raw_html: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
            allow_raw_html: false,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub hosted: HostedConfig,
    pub local: LocalConfig,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TRIP_BACKEND, GEMINI_API_KEY, LOCAL_LLM_ENDPOINT, ...)
    /// 2. Config file (~/.config/trip-planner/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let path = Self::config_file_path();
        Self::load_layered(path.as_deref(), |key| env::var(key).ok())
    }

    /// Layer defaults, the file at `path` (when it exists) and `lookup` in that order.
    pub fn load_layered<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) if path.exists() => Self::load_from_file(path)?,
            _ => Config::default(),
        };

        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TripPlannerError::io(path, e))?;

        serde_yaml::from_str(&content)
            .map_err(|e| TripPlannerError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Override values from an environment lookup.
    ///
    /// Numeric values that fail to parse are ignored; an unknown backend name is an error.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("TRIP_BACKEND") {
            self.backend = backend.parse()?;
        }

        if let Some(api_key) = lookup("GEMINI_API_KEY") {
            self.hosted.api_key = api_key;
        }

        if let Some(api_base) = lookup("GEMINI_API_BASE") {
            self.hosted.api_base = api_base;
        }

        if let Some(model) = lookup("GEMINI_MODEL") {
            self.hosted.model = model;
        }

        if let Some(endpoint) = lookup("LOCAL_LLM_ENDPOINT") {
            self.local.endpoint = endpoint;
        }

        if let Some(model) = lookup("LOCAL_LLM_MODEL") {
            self.local.model = model;
        }

        if let Some(temp) = lookup("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.generation.temperature = temp;
        }

        if let Some(tokens) = lookup("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.generation.max_tokens = tokens;
        }

        if let Some(secs) = lookup("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.generation.timeout_secs = secs;
        }

        if let Some(addr) = lookup("TRIP_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(allow) = lookup("TRIP_ALLOW_RAW_HTML") {
            self.server.allow_raw_html = matches!(allow.trim(), "1" | "true" | "yes");
        }

        Ok(())
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "trip-planner")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    ///
    /// A missing hosted API key is reported as [`TripPlannerError::Auth`]: no request
    /// can succeed without it, so callers should refuse to start.
    pub fn validate(&self) -> Result<()> {
        match self.backend {
            Backend::Hosted => {
                if self.hosted.api_key.trim().is_empty() {
                    return Err(TripPlannerError::Auth(
                        "GEMINI_API_KEY environment variable not found. Please set it.".to_string(),
                    ));
                }
                if self.hosted.api_base.is_empty() {
                    return Err(TripPlannerError::Config(
                        "Hosted API base URL is required. Set GEMINI_API_BASE or add to config file."
                            .to_string(),
                    ));
                }
                if self.hosted.model.is_empty() {
                    return Err(TripPlannerError::Config(
                        "Hosted model is required. Set GEMINI_MODEL or add to config file."
                            .to_string(),
                    ));
                }
            }
            Backend::Local => {
                url::Url::parse(&self.local.endpoint).map_err(|e| {
                    TripPlannerError::InvalidConfig(format!(
                        "local endpoint '{}' is not a valid URL: {}",
                        self.local.endpoint, e
                    ))
                })?;
                if self.local.model.is_empty() {
                    return Err(TripPlannerError::Config(
                        "Local model is required. Set LOCAL_LLM_MODEL or add to config file."
                            .to_string(),
                    ));
                }
            }
        }

        if self.generation.timeout_secs == 0 {
            return Err(TripPlannerError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed bind address for the web server.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind_addr.parse().map_err(|e| {
            TripPlannerError::InvalidConfig(format!(
                "bind address '{}' is invalid: {}",
                self.server.bind_addr, e
            ))
        })
    }

    /// Create a hosted-backend config from explicit values (useful for testing).
    pub fn with_hosted(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend: Backend::Hosted,
            hosted: HostedConfig {
                api_base: api_base.into(),
                api_key: api_key.into(),
                model: model.into(),
            },
            ..Default::default()
        }
    }

    /// Create a local-backend config from explicit values (useful for testing).
    pub fn with_local(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            backend: Backend::Local,
            local: LocalConfig {
                endpoint: endpoint.into(),
                model: model.into(),
            },
            ..Default::default()
        }
    }
}
