use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Endpoint
    pub api_mode: ApiMode,
    pub api_base_url: String,
    pub grant_id: String,

    // Remote credentials
    pub api_key: Option<String>,

    // Local impersonation
    pub provider: String,
    pub email_address: Option<String>,

    // Listing
    pub thread_limit: u32,
    pub thread_folder: Option<String>,
    pub max_pages: usize,

    // HTTP
    pub http_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    /// Local server, authenticated through impersonation headers
    Local,
    /// Hosted API, authenticated with a bearer token
    Remote,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Endpoint
            api_mode: parse_api_mode(&env_or_default("API_MODE", "local"))?,
            api_base_url: env_or_default("API_BASE_URL", "http://localhost:6060"),
            grant_id: required_env("GRANT_ID")?,

            // Remote credentials
            api_key: optional_env("API_KEY"),

            // Local impersonation
            provider: env_or_default("PROVIDER", "google"),
            email_address: optional_env("EMAIL_ADDRESS"),

            // Listing
            thread_limit: parse_env_u32("THREAD_LIMIT", 20)?,
            thread_folder: optional_env("THREAD_FOLDER"),
            max_pages: parse_env_usize("MAX_PAGES", 10)?,

            // HTTP
            http_timeout: parse_optional_env_u64("HTTP_TIMEOUT_SECS")?.map(Duration::from_secs),
        })
    }

    /// A local-mode configuration pointed at `base_url`, for tests.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_mode: ApiMode::Local,
            api_base_url: base_url.to_string(),
            grant_id: "test-grant".to_string(),
            api_key: None,
            provider: "google".to_string(),
            email_address: Some("test@example.com".to_string()),
            thread_limit: 20,
            thread_folder: None,
            max_pages: 10,
            http_timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "API_BASE_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.grant_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "GRANT_ID".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_PAGES".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        match self.api_mode {
            ApiMode::Remote if self.api_key.is_none() => {
                return Err(ConfigError::MissingEnvVar("API_KEY".to_string()));
            }
            ApiMode::Local if self.email_address.is_none() => {
                return Err(ConfigError::MissingEnvVar("EMAIL_ADDRESS".to_string()));
            }
            _ => {}
        }
        Ok(())
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_optional_env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::ParseInt {
                name: name.to_string(),
                source: e,
            }),
        _ => Ok(None),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_api_mode(value: &str) -> Result<ApiMode, ConfigError> {
    match value.to_lowercase().as_str() {
        "local" => Ok(ApiMode::Local),
        "remote" => Ok(ApiMode::Remote),
        _ => Err(ConfigError::InvalidValue {
            name: "API_MODE".to_string(),
            message: format!("must be 'local' or 'remote', got '{value}'"),
        }),
    }
}
