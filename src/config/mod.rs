//! Gateway configuration
//!
//! Configuration comes from a file (TOML, YAML or JSON), from environment
//! variables, or from both with the environment taking precedence. It is
//! built once at startup into a read-only [`GatewayConfig`] that the gateway
//! consumes; nothing deeper in the call path reads the environment.
//!
//! | Key | Meaning |
//! |---|---|
//! | `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GOOGLE_API_KEY`, `GROQ_API_KEY` | vendor credentials |
//! | `<VENDOR>_BASE_URL` | alternate API endpoint |
//! | `<VENDOR>_MODELS` | JSON list of `{id, name, provider}` replacing the default models |
//! | `SWITCHBOARD_DEFAULT_MODEL` | model used when a request names none |
//! | `SWITCHBOARD_TEMPERATURE` | temperature used when a request gives none |
//! | `SWITCHBOARD_MAX_TOKENS` | output bound sent to every vendor |
//! | `SWITCHBOARD_REQUEST_TIMEOUT` | per-call timeout in seconds |
//! | `SWITCHBOARD_GEMINI_SYSTEM_POLICY` | `drop`, `merge_into_first_user` or `system_instruction` |

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};
use thiserror::Error;

use crate::llm::traits::ChatConfig;
use crate::llm::translate::SystemPolicy;
use crate::types::Vendor;
use crate::utils::logging::obscure_credential;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable parsing error: {0}")]
    EnvVarParse(String),
    #[error("File parsing error: {0}")]
    FileParse(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Model id '{model_id}' is registered by both {first} and {second}")]
    DuplicateModelId {
        model_id: String,
        first: Vendor,
        second: Vendor,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main configuration structure for the gateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Per-vendor credentials, endpoints and model overrides
    #[serde(default)]
    pub vendors: VendorsConfig,
    /// Request defaults shared by every vendor
    #[serde(default)]
    pub chat: ChatSettings,
}

/// Settings for each supported vendor
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VendorsConfig {
    #[serde(default)]
    pub openai: VendorSettings,
    #[serde(default)]
    pub anthropic: VendorSettings,
    #[serde(default)]
    pub google: VendorSettings,
    #[serde(default)]
    pub groq: VendorSettings,
}

impl VendorsConfig {
    pub fn get(&self, vendor: Vendor) -> &VendorSettings {
        match vendor {
            Vendor::OpenAI => &self.openai,
            Vendor::Anthropic => &self.anthropic,
            Vendor::Google => &self.google,
            Vendor::Groq => &self.groq,
        }
    }

    pub fn get_mut(&mut self, vendor: Vendor) -> &mut VendorSettings {
        match vendor {
            Vendor::OpenAI => &mut self.openai,
            Vendor::Anthropic => &mut self.anthropic,
            Vendor::Google => &mut self.google,
            Vendor::Groq => &mut self.groq,
        }
    }
}

/// One vendor's configuration
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct VendorSettings {
    /// API key; the vendor is unavailable without one
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Alternate API endpoint (proxies, tests)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model list override: a list of `{id, name, provider}` or its JSON text
    #[serde(default)]
    pub models: Option<serde_json::Value>,
}

impl std::fmt::Debug for VendorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorSettings")
            .field("api_key", &self.api_key.as_deref().map(obscure_credential))
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .finish()
    }
}

/// Request defaults and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Temperature used when a request does not give one
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Output token bound sent to every vendor
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-call timeout for vendor requests, in seconds
    #[serde(with = "duration_seconds", default = "default_request_timeout")]
    pub request_timeout: Duration,
    /// Treatment of system messages for Gemini
    #[serde(default)]
    pub gemini_system_policy: SystemPolicy,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout: default_request_timeout(),
            gemini_system_policy: SystemPolicy::default(),
        }
    }
}

impl ChatSettings {
    /// Sampling parameters for one request
    pub fn chat_config(&self, temperature: f64) -> ChatConfig {
        ChatConfig {
            temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a file (supports TOML, YAML, JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension = path.extension().and_then(|s| s.to_str());

        match extension {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| ConfigError::FileParse(e.to_string()))
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse(e.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| ConfigError::FileParse(e.to_string()))
            }
            _ => Err(ConfigError::FileParse(
                "Unsupported file format. Use .toml, .yaml, .yml, or .json".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Same keys as [`GatewayConfig::from_env`]; lets callers build a
    /// configuration without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().merge_with_lookup(lookup)
    }

    /// Merge configuration with environment variable overrides
    pub fn merge_with_env(self) -> Result<Self, ConfigError> {
        self.merge_with_lookup(|key| env::var(key).ok())
    }

    /// Overlay every key present in `lookup` onto this configuration
    pub fn merge_with_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        for vendor in Vendor::ALL {
            let prefix = vendor.env_prefix();
            let settings = self.vendors.get_mut(vendor);

            if let Some(api_key) = lookup(&format!("{}_API_KEY", prefix)) {
                settings.api_key = Some(api_key);
            }
            if let Some(base_url) = lookup(&format!("{}_BASE_URL", prefix)) {
                settings.base_url = Some(base_url);
            }
            if let Some(models) = lookup(&format!("{}_MODELS", prefix)) {
                settings.models = Some(serde_json::Value::String(models));
            }
        }

        if let Some(model) = lookup("SWITCHBOARD_DEFAULT_MODEL") {
            self.chat.default_model = model;
        }
        if let Some(temperature) = lookup("SWITCHBOARD_TEMPERATURE") {
            self.chat.temperature = temperature.parse().map_err(|e| {
                ConfigError::EnvVarParse(format!("SWITCHBOARD_TEMPERATURE: {}", e))
            })?;
        }
        if let Some(max_tokens) = lookup("SWITCHBOARD_MAX_TOKENS") {
            self.chat.max_tokens = max_tokens.parse().map_err(|e| {
                ConfigError::EnvVarParse(format!("SWITCHBOARD_MAX_TOKENS: {}", e))
            })?;
        }
        if let Some(timeout) = lookup("SWITCHBOARD_REQUEST_TIMEOUT") {
            self.chat.request_timeout = Duration::from_secs(timeout.parse().map_err(|e| {
                ConfigError::EnvVarParse(format!("SWITCHBOARD_REQUEST_TIMEOUT: {}", e))
            })?);
        }
        if let Some(policy) = lookup("SWITCHBOARD_GEMINI_SYSTEM_POLICY") {
            self.chat.gemini_system_policy = policy.parse().map_err(|e| {
                ConfigError::EnvVarParse(format!("SWITCHBOARD_GEMINI_SYSTEM_POLICY: {}", e))
            })?;
        }

        Ok(self)
    }

    /// Validate the configuration
    ///
    /// Model overrides are not checked here; the catalog falls back to the
    /// defaults for any vendor whose override is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.default_model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Default model cannot be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(ConfigError::Validation(
                "Temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.chat.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "Max tokens must be greater than 0".to_string(),
            ));
        }
        if self.chat.request_timeout.as_secs() == 0 {
            return Err(ConfigError::Validation(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        for vendor in Vendor::ALL {
            if let Some(base_url) = &self.vendors.get(vendor).base_url {
                url::Url::parse(base_url).map_err(|e| {
                    ConfigError::Validation(format!(
                        "Invalid {} base_url '{}': {}",
                        vendor, base_url, e
                    ))
                })?;
            }
        }

        Ok(())
    }
}

/// Custom serialization for Duration as seconds
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Default value functions for serde
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}
