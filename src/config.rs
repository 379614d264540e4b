use anyhow::{Context, Result};
use std::env;

/// Placeholder tunnel address used when no endpoint is configured.
pub const DEFAULT_GENERATION_ENDPOINT: &str = "https://11f5-35-198-228-94.ngrok-free.app/generate";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub generation_endpoint: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. `GENERATION_ENDPOINT` wins over
    /// the older `FASTAPI_ENDPOINT` name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let generation_endpoint = lookup("GENERATION_ENDPOINT")
            .or_else(|| lookup("FASTAPI_ENDPOINT"))
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GENERATION_ENDPOINT.to_string());

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            generation_endpoint,
            host,
            port,
        })
    }
}
