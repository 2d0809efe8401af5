use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the brief server.
#[derive(Debug)]
pub struct Config {
    /// API key presented to the Gemini REST endpoints.
    pub gemini_api_key: String,
    /// Base URL of the Gemini API (overridable for testing).
    pub gemini_base_url: String,
    /// Model identifier used for generation calls.
    pub gemini_model: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Interval between polls of a pending upload operation, in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum number of polls before a pending operation is treated as stuck.
    pub poll_max_attempts: u32,
}

/// Default Gemini API endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default generation model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Default poll interval for upload operations (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
/// Default poll attempt cap for upload operations.
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 200;

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gemini_api_key: load_env("GEMINI_API_KEY")?,
            gemini_base_url: load_env_optional("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: load_env_optional("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            poll_interval_ms: load_env_optional("POLL_INTERVAL_MS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("POLL_INTERVAL_MS".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            poll_max_attempts: load_env_optional("POLL_MAX_ATTEMPTS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("POLL_MAX_ATTEMPTS".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_POLL_MAX_ATTEMPTS),
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        base_url = %config.gemini_base_url,
        model = %config.gemini_model,
        server_port = ?config.server_port,
        poll_interval_ms = config.poll_interval_ms,
        poll_max_attempts = config.poll_max_attempts,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
