// src/config.rs

//! Manages client configuration: loading from TOML, defaults, and validation.

use crate::core::client::{ConnectionConfig, PoolConfig};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use tracing::warn;

/// Settings for the connection pool.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PoolSettings {
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// How long a call waits for a free connection.
    #[serde(with = "humantime_serde", default = "default_checkout_timeout")]
    pub checkout_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            checkout_timeout: default_checkout_timeout(),
        }
    }
}

fn default_max_size() -> usize {
    8
}
fn default_checkout_timeout() -> Duration {
    Duration::from_secs(5)
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimeoutSettings {
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect: Duration,
    #[serde(with = "humantime_serde", default = "default_read_timeout")]
    pub read: Duration,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            connect: default_connect_timeout(),
            read: default_read_timeout(),
        }
    }
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(2)
}
fn default_read_timeout() -> Duration {
    Duration::from_secs(2)
}

/// Configuration for TLS encryption. Only honored when built with the `tls` feature.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TlsConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// The complete client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub database: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub pool: PoolSettings,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
    #[serde(default)]
    pub tls: TlsConfig,
}

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    6379
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: None,
            database: 0,
            log_level: default_log_level(),
            pool: PoolSettings::default(),
            timeouts: TimeoutSettings::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.pool.max_size == 0 {
            return Err(anyhow!("pool.max_size cannot be 0"));
        }
        if self.pool.checkout_timeout.is_zero() {
            return Err(anyhow!("pool.checkout_timeout cannot be 0"));
        }
        if self.timeouts.connect.is_zero() {
            return Err(anyhow!("timeouts.connect cannot be 0"));
        }
        if self.timeouts.read.is_zero() {
            return Err(anyhow!("timeouts.read cannot be 0"));
        }
        if let Some(password) = &self.password
            && password.is_empty()
        {
            warn!("password is set but empty; AUTH will be sent with an empty password");
        }
        if self.tls.enabled && cfg!(not(feature = "tls")) {
            return Err(anyhow!(
                "tls.enabled is set but this build lacks the `tls` feature"
            ));
        }
        Ok(())
    }

    pub fn to_connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.clone(),
            port: self.port,
            password: self.password.clone(),
            database: self.database,
            connect_timeout: self.timeouts.connect,
            read_timeout: self.timeouts.read,
            tls: self.tls.enabled,
        }
    }

    pub fn to_pool_config(&self) -> PoolConfig {
        PoolConfig {
            connection: self.to_connection_config(),
            max_size: self.pool.max_size,
            checkout_timeout: self.pool.checkout_timeout,
        }
    }
}
