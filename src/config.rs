//! Process configuration read from the environment

use crate::state_machine::ConvContext;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_AGENT_URL: &str = "http://localhost:3000/api/agent";
pub const DEFAULT_AGENT_ID: &str = "6996a33d1503e45bac70e455";
pub const DEFAULT_AGENT_NAME: &str = "India Victory Path Analyst";
pub const DEFAULT_USER_ID: &str = "user_cricket_fan";
pub const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub agent_url: String,
    pub agent_api_key: Option<String>,
    pub agent_id: String,
    pub agent_name: String,
    pub user_id: String,
    pub agent_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            agent_url: DEFAULT_AGENT_URL.to_string(),
            agent_api_key: None,
            agent_id: DEFAULT_AGENT_ID.to_string(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            agent_timeout: Duration::from_secs(DEFAULT_AGENT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("VICTORY_PATH_PORT") {
            Some(value) => parse_number("VICTORY_PATH_PORT", &value)?,
            None => defaults.port,
        };
        let timeout_secs = match get("VICTORY_PATH_AGENT_TIMEOUT_SECS") {
            Some(value) => parse_number("VICTORY_PATH_AGENT_TIMEOUT_SECS", &value)?,
            None => DEFAULT_AGENT_TIMEOUT_SECS,
        };

        Ok(Self {
            port,
            agent_url: get("VICTORY_PATH_AGENT_URL").unwrap_or(defaults.agent_url),
            agent_api_key: get("VICTORY_PATH_AGENT_API_KEY"),
            agent_id: get("VICTORY_PATH_AGENT_ID").unwrap_or(defaults.agent_id),
            agent_name: get("VICTORY_PATH_AGENT_NAME").unwrap_or(defaults.agent_name),
            user_id: get("VICTORY_PATH_USER_ID").unwrap_or(defaults.user_id),
            agent_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn conv_context(&self) -> ConvContext {
        ConvContext::new(&self.agent_id, &self.agent_name, &self.user_id)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}
