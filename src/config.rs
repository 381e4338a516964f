use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub location: LocationSettings,
    #[serde(default)]
    pub booking: BookingSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Idle lifetime of a per-language conversation context
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            api_key: String::new(),
            model: default_chat_model(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_chat_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_chat_model() -> String {
    "gemini-2.5-pro".to_string()
}
fn default_session_ttl_secs() -> u64 {
    1800
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationSettings {
    #[serde(default = "default_location_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_location_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            endpoint: default_location_endpoint(),
            timeout_secs: default_location_timeout_secs(),
        }
    }
}

fn default_location_endpoint() -> String {
    "http://ip-api.com/json".to_string()
}
fn default_location_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingSettings {
    /// Idle lifetime of an open activation before it is evicted
    #[serde(default = "default_activation_ttl_secs")]
    pub activation_ttl_secs: u64,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            activation_ttl_secs: default_activation_ttl_secs(),
        }
    }
}

fn default_activation_ttl_secs() -> u64 {
    900
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "data/transcript.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with LEGALMATE_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with LEGALMATE_)
            // e.g., LEGALMATE_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LEGALMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LEGALMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply plain environment variable overrides for secrets
///
/// The chat API key can come from API_KEY as well as the prefixed form, so
/// deployments keep working with the conventional variable name.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("API_KEY")
        .or_else(|_| env::var("LEGALMATE_CHAT__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("chat.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ServerSettings::default();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);

        let chat = ChatSettings::default();
        assert_eq!(chat.model, "gemini-2.5-pro");
        assert_eq!(chat.session_ttl_secs, 1800);

        let booking = BookingSettings::default();
        assert_eq!(booking.activation_ttl_secs, 900);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
