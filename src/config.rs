//! Top-level application configuration.
//!
//! Configuration is stored in `.keepsake/config.yaml` and includes:
//! - The backend API base URL and request timeout
//! - The bearer token used for authentication
//! - Where media paths are resolved against
//! - The lookup debounce window and the display locale

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{KeepsakeError, Result};
use crate::locale::Locale;
use crate::paths::{config_path, ensure_gitignore, format_relative_path};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1/";

/// Keys accepted by `config get` and `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.timeout",
    "auth.token",
    "media.base_url",
    "search.debounce_ms",
    "locale",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,

    #[serde(default, skip_serializing_if = "MediaConfig::is_default")]
    pub media: MediaConfig,

    #[serde(default, skip_serializing_if = "SearchConfig::is_default")]
    pub search: SearchConfig,

    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: default_timeout(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthConfig {
    fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaConfig {
    /// Origin relative media paths are resolved against. Defaults to the
    /// origin of the API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl MediaConfig {
    fn is_default(&self) -> bool {
        self.base_url.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    fn is_default(&self) -> bool {
        self.debounce_ms == default_debounce_ms()
    }
}

fn env_override(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| KeepsakeError::Config(format!("{key} must be a whole number, got '{value}'")))
}

impl Config {
    pub fn config_path() -> PathBuf {
        config_path()
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            KeepsakeError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to read config at {}: {}",
                    format_relative_path(&path),
                    e
                ),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            KeepsakeError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to write config at {}: {}",
                    format_relative_path(&path),
                    e
                ),
            ))
        })?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        if let Err(e) = ensure_gitignore() {
            tracing::warn!("Failed to write .gitignore next to config: {e}");
        }

        Ok(())
    }

    /// API base URL from environment, config, or the local default.
    pub fn api_base_url(&self) -> String {
        if let Some(url) = env_override("KEEPSAKE_API_URL") {
            return url;
        }
        self.api
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Media origin from environment, config, or the origin of the API URL.
    pub fn media_base_url(&self) -> Result<String> {
        if let Some(url) = env_override("KEEPSAKE_MEDIA_URL") {
            return Ok(url);
        }
        if let Some(url) = &self.media.base_url {
            return Ok(url.clone());
        }
        let api = Url::parse(&self.api_base_url())?;
        Ok(api.origin().ascii_serialization())
    }

    /// Bearer token from `KEEPSAKE_TOKEN` or the config file.
    pub fn auth_token(&self) -> Option<SecretString> {
        if let Some(token) = env_override("KEEPSAKE_TOKEN") {
            return Some(SecretString::from(token));
        }
        self.auth.token.clone().map(SecretString::from)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Stored value of a key. The token is masked.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api.base_url" => self.api.base_url.clone(),
            "api.timeout" => Some(self.api.timeout.to_string()),
            "auth.token" => self.auth.token.as_deref().map(mask_token),
            "media.base_url" => self.media.base_url.clone(),
            "search.debounce_ms" => Some(self.search.debounce_ms.to_string()),
            "locale" => Some(self.locale.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a key from its textual form. An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = |value: &str| (!value.trim().is_empty()).then(|| value.trim().to_string());
        match key {
            "api.base_url" => {
                if let Some(url) = optional(value) {
                    Url::parse(&url)?;
                }
                self.api.base_url = optional(value);
            }
            "api.timeout" => match parse_number(key, value)? {
                0 => return Err(KeepsakeError::Config("api.timeout must be positive".into())),
                seconds => self.api.timeout = seconds,
            },
            "auth.token" => self.auth.token = optional(value),
            "media.base_url" => {
                if let Some(url) = optional(value) {
                    Url::parse(&url)?;
                }
                self.media.base_url = optional(value);
            }
            "search.debounce_ms" => self.search.debounce_ms = parse_number(key, value)?,
            "locale" => self.locale = value.parse()?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Every key with its display value, for `config show`.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .map(|key| {
                let value = self.get(key).ok().flatten().unwrap_or_else(|| "-".to_string());
                (*key, value)
            })
            .collect()
    }
}

fn unknown_key(key: &str) -> KeepsakeError {
    KeepsakeError::Config(format!(
        "unknown key '{key}' (expected one of: {})",
        CONFIG_KEYS.join(", ")
    ))
}

/// Show only the last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
