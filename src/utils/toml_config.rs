//! TOML-based configuration for MedHub
//!
//! Configuration is read once at startup from `medhub.toml`. Every section is
//! optional; a missing file yields the defaults, which only require the model
//! API key to be present in the environment (and even that is checked lazily,
//! per call). A `[provider]` table, when present, must name its `type`.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! log_level = "info"
//!
//! [provider]
//! type = "gemini"
//! api_key_env = "API_KEY"
//! model = "gemini-2.5-flash"
//!
//! [hub]
//! handoff_delay_ms = 800
//!
//! [roles.billing_insurance]
//! web_search = false
//! ```

use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Root configuration structure loaded from medhub.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub hub: HubSettings,

    /// Per-role overrides keyed by role name (e.g. `medical_records`)
    #[serde(default)]
    pub roles: HashMap<String, RoleOverride>,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Provider Configuration =============

/// Model provider. Selected by the required `type` key of `[provider]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        /// Environment variable containing the API key
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_gemini_base")]
        api_base: String,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Gemini {
            api_key_env: default_api_key_env(),
            api_base: default_gemini_base(),
            model: default_gemini_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn api_key_env(&self) -> &str {
        match self {
            ProviderConfig::Gemini { api_key_env, .. } => api_key_env,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::Gemini { model, .. } => model,
        }
    }
}

// ============= Hub Behaviour =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSettings {
    /// Cosmetic pause between the delegation log and the specialist call
    #[serde(default = "default_handoff_delay_ms")]
    pub handoff_delay_ms: u64,

    /// Seed the transcript with the Navigator greeting
    #[serde(default = "default_true")]
    pub welcome: bool,
}

fn default_handoff_delay_ms() -> u64 {
    800
}

fn default_true() -> bool {
    true
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            handoff_delay_ms: default_handoff_delay_ms(),
            welcome: true,
        }
    }
}

impl HubSettings {
    pub fn handoff_delay(&self) -> Duration {
        Duration::from_millis(self.handoff_delay_ms)
    }
}

// ============= Role Overrides =============

/// Replacement instruction text and/or search flag for one role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleOverride {
    pub instruction: Option<String>,
    pub web_search: Option<bool>,
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown role '{0}' in [roles] section")]
    UnknownRole(String),
}

impl HubConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(p)) => {
                info!("No configuration at {:?}, using defaults", p);
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: HubConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        match &self.provider {
            ProviderConfig::Gemini {
                api_key_env,
                api_base,
                model,
                timeout_secs,
            } => {
                if api_key_env.trim().is_empty() {
                    return Err(ConfigError::ValidationError(
                        "provider.api_key_env must not be empty".to_string(),
                    ));
                }
                if api_base.trim().is_empty() {
                    return Err(ConfigError::ValidationError(
                        "provider.api_base must not be empty".to_string(),
                    ));
                }
                if model.trim().is_empty() {
                    return Err(ConfigError::ValidationError(
                        "provider.model must not be empty".to_string(),
                    ));
                }
                if *timeout_secs == 0 {
                    return Err(ConfigError::ValidationError(
                        "provider.timeout_secs must be greater than zero".to_string(),
                    ));
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for (key, role_override) in &self.roles {
            let Some(role) = Role::from_key(key) else {
                return Err(ConfigError::UnknownRole(key.clone()));
            };
            // "billing" and "billing_insurance" name the same role
            if !seen.insert(role) {
                return Err(ConfigError::ValidationError(format!(
                    "role {} is configured more than once",
                    role
                )));
            }
            if let Some(instruction) = &role_override.instruction {
                if instruction.trim().is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "roles.{}.instruction must not be empty",
                        key
                    )));
                }
            }
        }

        Ok(())
    }

    /// Overrides keyed by parsed role (validated keys only)
    pub fn role_overrides(&self) -> HashMap<Role, RoleOverride> {
        self.roles
            .iter()
            .filter_map(|(key, o)| Role::from_key(key).map(|role| (role, o.clone())))
            .collect()
    }

    /// Read the API key from the environment; `None` when unset or blank
    pub fn api_key(&self) -> Option<String> {
        let env_name = self.provider.api_key_env();
        let key = std::env::var(env_name)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if key.is_none() {
            warn!(
                "API key not found in environment variable {}; model calls will fail",
                env_name
            );
        }
        key
    }
}
