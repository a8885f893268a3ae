//! Runtime configuration
//!
//! Process-level settings are read once at startup from the environment
//! (with `.env` support). The upstream credential is not part of that
//! snapshot: it is looked up through [`ApiKeySource`] on every call.

use crate::ai::gemini::DEFAULT_BASE_URL;
use crate::{Error, Result};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_LISTEN_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: IpAddr,
    pub listen_port: u16,
    pub gemini_base_url: String,
    /// Name of the environment variable holding the Gemini API key.
    pub api_key_var: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen_port: DEFAULT_LISTEN_PORT,
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let listen_addr: IpAddr = match std::env::var("RELAY_LISTEN_ADDR") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::Config(format!("RELAY_LISTEN_ADDR is not an IP address: {}", raw))
            })?,
            Err(_) => defaults.listen_addr,
        };

        let listen_port: u16 = match std::env::var("RELAY_LISTEN_PORT") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::Config(format!("RELAY_LISTEN_PORT is not a port number: {}", raw))
            })?,
            Err(_) => defaults.listen_port,
        };

        Ok(Self {
            listen_addr,
            listen_port,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or(defaults.gemini_base_url),
            api_key_var: std::env::var("GEMINI_API_KEY_VAR").unwrap_or(defaults.api_key_var),
        })
    }

    pub fn api_key_source(&self) -> ApiKeySource {
        ApiKeySource::Env(self.api_key_var.clone())
    }
}

/// Where the upstream credential comes from. Empty values count as absent.
#[derive(Clone)]
pub enum ApiKeySource {
    /// Read the named environment variable at call time.
    Env(String),
    /// A value fixed at construction; `None` models an unset credential.
    Static(Option<String>),
}

impl ApiKeySource {
    pub fn resolve(&self) -> Option<String> {
        let key = match self {
            ApiKeySource::Env(var) => std::env::var(var).ok(),
            ApiKeySource::Static(key) => key.clone(),
        };
        key.filter(|k| !k.is_empty())
    }

    /// Variable name reported to callers when the credential is missing.
    pub fn variable_name(&self) -> &str {
        match self {
            ApiKeySource::Env(var) => var,
            ApiKeySource::Static(_) => DEFAULT_API_KEY_VAR,
        }
    }
}

impl fmt::Debug for ApiKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKeySource::Env(var) => f.debug_tuple("Env").field(var).finish(),
            ApiKeySource::Static(key) => f
                .debug_tuple("Static")
                .field(&key.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}
