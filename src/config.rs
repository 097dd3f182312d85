use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_OTA_MAX_RETRIES: u64 = 3;

/// Simulator tuning. Only the retry bound is configurable; everything
/// else about the fleet is fixed fixture data.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Attempts at the OTA apply step before the update reports failure.
    pub ota_max_retries: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let ota_max_retries = get_env_var_u64("OTA_MAX_RETRIES", DEFAULT_OTA_MAX_RETRIES);
        Ok(Config { ota_max_retries })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ota_max_retries: DEFAULT_OTA_MAX_RETRIES,
        }
    }
}

fn get_env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}
