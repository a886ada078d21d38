//! Startup configuration.
//!
//! Values are layered: command-line flags win over the environment, the
//! environment wins over `config.toml`, and built-in defaults fill the rest.
//! Apart from a zero timeout, nothing is validated here; a bad key or model
//! surfaces as an API error on the first live turn.

pub mod data;
pub mod io;

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::core::constants::{
    DEFAULT_BASE_URL, DEFAULT_CONTEXT_WARN_THRESHOLD, DEFAULT_MODEL, REQUEST_TIMEOUT,
};

pub use data::{path_display, Config};
pub use io::{ConfigError, CONFIG_PATH_ENV};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const MODEL_ENV: &str = "BANKCHAT_MODEL";

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub context_warn_threshold: usize,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings against the process environment.
    pub fn resolve(config: &Config, overrides: &Overrides) -> Settings {
        Self::resolve_with(config, overrides, |name| std::env::var(name).ok())
    }

    /// Resolve settings with an injected environment lookup.
    pub fn resolve_with<F>(config: &Config, overrides: &Overrides, env: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |name: &str| env(name).filter(|value| !value.is_empty());

        let api_key = env_value(API_KEY_ENV).unwrap_or_default();
        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| env_value(BASE_URL_ENV))
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = overrides
            .model
            .clone()
            .or_else(|| env_value(MODEL_ENV))
            .or_else(|| config.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout = match overrides.timeout_secs.or(config.timeout_secs) {
            Some(0) => {
                warn!(
                    fallback_secs = REQUEST_TIMEOUT.as_secs(),
                    "a zero timeout would fail every live turn; using the default"
                );
                REQUEST_TIMEOUT
            }
            Some(secs) => Duration::from_secs(secs),
            None => REQUEST_TIMEOUT,
        };

        Settings {
            api_key,
            base_url,
            model,
            timeout,
            context_warn_threshold: config
                .context_warn_threshold
                .unwrap_or(DEFAULT_CONTEXT_WARN_THRESHOLD),
            log_file: overrides
                .log_file
                .clone()
                .or_else(|| config.log_file.clone()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// The API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.is_empty() {
            return "(not set)".to_string();
        }
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), tail)
    }

    pub fn print_all(&self) {
        println!("model: {}", self.model);
        println!("base_url: {}", self.base_url);
        println!("api_key: {}", self.masked_api_key());
        println!("timeout_secs: {}", self.timeout.as_secs());
        println!("context_warn_threshold: {}", self.context_warn_threshold);
        match &self.log_file {
            Some(path) => println!("log_file: {}", path_display(path)),
            None => println!("log_file: (none)"),
        }
    }
}
