use std::env;
use std::time::Duration;

use anyhow::{bail, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub request_timeout: Duration,
    pub shutdown_grace: Duration,
}

const DB_PARTS: [&str; 6] = [
    "DB_USER",
    "DB_PASSWORD",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "DB_SSLMODE",
];

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let mut parts = Vec::with_capacity(DB_PARTS.len());
                for key in DB_PARTS {
                    match get(key) {
                        Some(v) => parts.push(v),
                        None => bail!("DATABASE_URL or {} must be set", key),
                    }
                }
                format!(
                    "postgres://{}:{}@{}:{}/{}?sslmode={}",
                    parts[0], parts[1], parts[2], parts[3], parts[4], parts[5]
                )
            }
        };

        let port = get("SERVER_PORT")
            .or_else(|| get("PORT"))
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("SERVER_PORT must be a valid port number")?;

        let max_connections = get("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DB_MAX_CONNECTIONS must be a positive integer")?;

        let request_timeout_ms: u64 = get("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "2000".to_string()) // 2 seconds
            .parse()
            .context("REQUEST_TIMEOUT_MS must be an integer")?;

        let shutdown_grace_secs: u64 = get("SHUTDOWN_GRACE_SECS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .context("SHUTDOWN_GRACE_SECS must be an integer")?;

        if request_timeout_ms == 0 {
            bail!("REQUEST_TIMEOUT_MS must be greater than zero");
        }

        Ok(Self {
            database_url,
            port,
            max_connections,
            request_timeout: Duration::from_millis(request_timeout_ms),
            shutdown_grace: Duration::from_secs(shutdown_grace_secs),
        })
    }
}
