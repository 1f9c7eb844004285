//! Environment-driven server configuration.

use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// Directory searched for legacy JSON data at startup.
    pub legacy_data_dir: PathBuf,
}

impl Config {
    /// Reads the configuration from the environment, loading `.env` first if present.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bind_address: try_load("BIND_ADDRESS", "0.0.0.0")?,
            port: try_load("PORT", "8000")?,
            database_url: try_load("DATABASE_URL", "sqlite://data/twosevenths.db")?,
            max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5")?,
            legacy_data_dir: try_load("LEGACY_DATA_DIR", "data")?,
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("invalid value for {key}: {e}")
    })
}
