use std::collections::HashMap;
use std::env;
use std::fmt;

use thiserror::Error;

use crate::registry::DEFAULT_OPTIONS;

const SEED_PREFIX: &str = "OPTIONSYNC_SEED_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub root_token: String,
    /// Initial values replacing the built-in defaults, keyed by option name.
    pub seed: Vec<(String, String)>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seed_keys: Vec<&str> = self.seed.iter().map(|(key, _)| key.as_str()).collect();
        formatter
            .debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("root_token", &"[REDACTED]")
            .field("seed_keys", &seed_keys)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "OPTIONSYNC_API_BIND_ADDR", "127.0.0.1:3000");

        let root_token = required_trimmed(&lookup, "OPTIONSYNC_ROOT_TOKEN")?;
        if root_token.len() < 16 {
            return Err(ConfigError::Invalid(
                "OPTIONSYNC_ROOT_TOKEN must be at least 16 characters".to_string(),
            ));
        }

        // Seeds are taken verbatim so an explicit empty value can clear a default.
        let seed = DEFAULT_OPTIONS
            .iter()
            .filter_map(|(key, _)| {
                lookup(&format!("{SEED_PREFIX}{key}")).map(|value| ((*key).to_string(), value))
            })
            .collect();

        Ok(Self {
            bind_addr,
            root_token,
            seed,
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn required_trimmed(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional_trimmed(lookup, name).ok_or(ConfigError::MissingVar(name))
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
