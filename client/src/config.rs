use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;

/// Client configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. gtc.yaml file (if exists)
/// 3. Environment variables with GTC_ prefix (always wins)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Server base URL (required, e.g. `http://localhost:8080`).
    #[serde(default)]
    pub base_url: String,

    /// Path of the GraphQL endpoint under `base_url`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl EndpointConfig {
    /// Full URL operations are posted to.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.is_empty() {
            return base.to_string();
        }
        let path = self.path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            path: default_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sent as `Authorization: Bearer <token>` when set.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Extra headers as `Name: value`.
    /// Accepts either an array or comma-separated string.
    #[serde(default, deserialize_with = "deserialize_headers")]
    pub headers: Vec<String>,
}

impl HttpConfig {
    /// Split `headers` into `(name, value)` pairs.
    ///
    /// # Errors
    /// Returns an error naming the first entry without a `:` separator.
    pub fn header_pairs(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.headers
            .iter()
            .map(|raw| {
                raw.split_once(':')
                    .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                    .filter(|(name, _)| !name.is_empty())
                    .ok_or_else(|| {
                        ConfigError::Validation(format!(
                            "http.headers entry '{raw}' must look like 'Name: value'"
                        ))
                    })
            })
            .collect()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            bearer_token: None,
            headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Deserialize headers from comma-separated string or array, filtering empty values.
fn deserialize_headers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let headers: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(headers
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

fn default_path() -> String {
    "/graphql".to_string()
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ClientConfig {
    /// Configuration pointing at `base_url` with every other value defaulted.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.endpoint.base_url = base_url.into();
        config
    }

    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. gtc.yaml file (if exists)
    /// 3. Environment variables with GTC_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("gtc.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("GTC_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.endpoint.base_url;
        if base_url.is_empty() {
            return Err(ConfigError::Validation(
                "endpoint.base_url is required. Set GTC_ENDPOINT__BASE_URL environment variable or configure in gtc.yaml.".into(),
            ));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "endpoint.base_url '{base_url}' must start with http:// or https://"
            )));
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_secs cannot be 0".into(),
            ));
        }

        if matches!(&self.http.bearer_token, Some(token) if token.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "http.bearer_token cannot be blank when set".into(),
            ));
        }

        self.http.header_pairs()?;

        Ok(())
    }
}
