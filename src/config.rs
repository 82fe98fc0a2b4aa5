use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    /// Seconds a cached category tree stays fresh.
    pub tree_cache_ttl_secs: u64,
    /// When set, the tree cache lives in Redis instead of process memory.
    pub redis_url: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("STOREFRONT_PORT", "8080"),
            tree_cache_ttl_secs: try_load("TREE_CACHE_TTL_SECS", "3600"),
            redis_url: env::var("REDIS_URL").ok(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
