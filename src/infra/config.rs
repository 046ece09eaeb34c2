//! Centralized configuration (environment variables + defaults).

use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    /// Directory holding one JSON document per collection.
    pub data_dir: String,
    /// Session lifetime in days (original issued 30-day tokens).
    pub session_days: i64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "3000"),
            data_dir: try_load("DATA_DIR", "data"),
            session_days: try_load("SESSION_DAYS", "30"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    match raw.parse() {
        Ok(v) => v,
        Err(e) => {
            warn!("invalid {key} value {raw:?} ({e}), using default: {default}");
            default
                .parse()
                .unwrap_or_else(|e| panic!("default for {key} must parse: {e}"))
        }
    }
}
