//! Configuration for the chat client and the chatbot endpoint server.
//!
//! Both configs have sensible defaults, builder-style setters and an
//! environment loader. Environment access goes through a lookup closure so
//! the parsing logic can be exercised without touching the process env.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default portfolio owner, used in the greeting and suggestion prompts.
pub const DEFAULT_OWNER_NAME: &str = "Aman Singh Thapa";

/// Default remote resolution endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/chatbot";

/// Default Ollama base URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default model served by Ollama.
pub const DEFAULT_MODEL: &str = "mistral:7b-instruct-q8_0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors raised while reading configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Raw value as found.
        value: String,
    },
}

/// Client-side configuration for a chat surface and its resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotConfig {
    /// Remote resolution endpoint (`POST`, JSON).
    pub endpoint: String,
    /// Whole-request timeout for the remote call.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout for the remote call.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// Name of the portfolio owner, substituted into the greeting, the
    /// suggestions and the fallback replies. The fallback replies' facts
    /// describe the default owner.
    pub owner_name: String,
    /// Greeting seeded as the first bot message. `None` uses the built-in one.
    pub greeting: Option<String>,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            greeting: None,
        }
    }
}

impl ChatbotConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remote endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the greeting seeded into new sessions.
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Set the portfolio owner's name.
    #[must_use]
    pub fn with_owner_name(mut self, name: impl Into<String>) -> Self {
        self.owner_name = name.into();
        self
    }

    /// Load from `PORTFOLIO_*` environment variables on top of the defaults.
    ///
    /// # Errors
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Recognised keys: `PORTFOLIO_CHAT_ENDPOINT`, `PORTFOLIO_CHAT_TIMEOUT_SECS`,
    /// `PORTFOLIO_OWNER_NAME`, `PORTFOLIO_CHAT_GREETING`.
    ///
    /// # Errors
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(endpoint) = lookup("PORTFOLIO_CHAT_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "PORTFOLIO_CHAT_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(name) = lookup("PORTFOLIO_OWNER_NAME") {
            config.owner_name = name;
        }
        if let Some(greeting) = lookup("PORTFOLIO_CHAT_GREETING") {
            config.greeting = Some(greeting);
        }
        Ok(config)
    }
}

/// Configuration for the chatbot endpoint server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening port.
    pub port: u16,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// Model name passed to Ollama.
    pub model: String,
    /// How long Ollama keeps the model resident after a request.
    pub keep_alive: String,
    /// Token budget per generation.
    pub num_predict: u32,
    /// Timeout for a single generation request.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Name of the portfolio owner, used in the persona prompt.
    pub owner_name: String,
    /// Facts the model may use. `None` uses the built-in profile.
    pub profile: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            keep_alive: "5m".to_string(),
            num_predict: 512,
            request_timeout: Duration::from_secs(120),
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            profile: None,
        }
    }
}

impl ServerConfig {
    /// Set the listening port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the Ollama base URL.
    #[must_use]
    pub fn with_ollama_url(mut self, url: impl Into<String>) -> Self {
        self.ollama_url = url.into();
        self
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Load from `PORTFOLIO_*` environment variables on top of the defaults.
    ///
    /// # Errors
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Recognised keys: `PORTFOLIO_PORT`, `PORTFOLIO_OLLAMA_URL`,
    /// `PORTFOLIO_MODEL`, `PORTFOLIO_KEEP_ALIVE`, `PORTFOLIO_NUM_PREDICT`,
    /// `PORTFOLIO_OWNER_NAME`, `PORTFOLIO_PROFILE`.
    ///
    /// # Errors
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(port) = parse_var(&lookup, "PORTFOLIO_PORT")? {
            config.port = port;
        }
        if let Some(url) = lookup("PORTFOLIO_OLLAMA_URL") {
            config.ollama_url = url;
        }
        if let Some(model) = lookup("PORTFOLIO_MODEL") {
            config.model = model;
        }
        if let Some(keep_alive) = lookup("PORTFOLIO_KEEP_ALIVE") {
            config.keep_alive = keep_alive;
        }
        if let Some(num_predict) = parse_var(&lookup, "PORTFOLIO_NUM_PREDICT")? {
            config.num_predict = num_predict;
        }
        if let Some(name) = lookup("PORTFOLIO_OWNER_NAME") {
            config.owner_name = name;
        }
        if let Some(profile) = lookup("PORTFOLIO_PROFILE") {
            config.profile = Some(profile);
        }
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            })
        })
        .transpose()
}

/// Durations are stored as whole seconds.
mod duration_serde {
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

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_chatbot_config() {
        let config = ChatbotConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.greeting.is_none());
    }

    #[test]
    fn test_chatbot_config_builder() {
        let config = ChatbotConfig::new()
            .with_endpoint("http://example.test/api/chatbot")
            .with_timeout(Duration::from_secs(5))
            .with_greeting("hi there");

        assert_eq!(config.endpoint, "http://example.test/api/chatbot");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.greeting.as_deref(), Some("hi there"));
    }

    #[test]
    fn test_chatbot_config_from_lookup() {
        let config = ChatbotConfig::from_lookup(lookup_from(&[
            ("PORTFOLIO_CHAT_ENDPOINT", "http://10.0.0.2:8080/api/chatbot"),
            ("PORTFOLIO_CHAT_TIMEOUT_SECS", " 7 "),
            ("PORTFOLIO_OWNER_NAME", "Jane Doe"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "http://10.0.0.2:8080/api/chatbot");
        assert_eq!(config.request_timeout, Duration::from_secs(7));
        assert_eq!(config.owner_name, "Jane Doe");
    }

    #[test]
    fn test_server_config_from_lookup() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORTFOLIO_PORT", "8081"),
            ("PORTFOLIO_OWNER_NAME", "Jane Doe"),
            ("PORTFOLIO_PROFILE", "Skills: Rust."),
        ]))
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.owner_name, "Jane Doe");
        assert_eq!(config.profile.as_deref(), Some("Skills: Rust."));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORTFOLIO_PORT", "eighty")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "PORTFOLIO_PORT".to_string(),
                value: "eighty".to_string(),
            }
        );
    }

    #[test]
    fn test_server_config_from_empty_lookup_is_default() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"port": 8081, "request_timeout": 15}"#).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
