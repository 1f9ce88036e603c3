use crate::error::ExporterError;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub sonnenbatterie: SonnenConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SonnenConfig {
    /// Base URL of the appliance, e.g. `http://192.168.1.50`
    #[serde(default)]
    pub url: String,
    /// Value sent in the `Auth-Token` header; unlocks the power meter,
    /// latest data and battery module endpoints
    #[serde(default)]
    pub token: Option<SecretString>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9110
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for SonnenConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl SonnenConfig {
    /// Returns the token if one is set and non-empty
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .map(|t| t.expose_secret())
            .filter(|t| !t.is_empty())
    }
}

impl ServerConfig {
    /// Socket address to bind, accepting IPv6 hosts with or without brackets.
    pub fn socket_addr(&self) -> crate::error::Result<SocketAddr> {
        let host = self.addr.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let ip: IpAddr = host.parse().map_err(|_| {
            ExporterError::Config(format!("invalid listen address: {}", self.addr))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Applies a `host:port` listen address. An empty host (`:9110`) binds all interfaces.
    pub fn set_listen_address(&mut self, listen: &str) -> crate::error::Result<()> {
        let invalid = || ExporterError::Config(format!("invalid listen address: {listen}"));

        let (host, port) = listen.rsplit_once(':').ok_or_else(invalid)?;
        let port: u16 = port.parse().map_err(|_| invalid())?;
        self.addr = if host.is_empty() {
            default_addr()
        } else {
            host.to_string()
        };
        self.port = port;

        self.socket_addr().map(|_| ())
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SONNEN_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Checks the settings that must hold before the server starts.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.sonnenbatterie.url.trim().is_empty() {
            return Err(ExporterError::Config(
                "no sonnenbatterie url set".to_string(),
            ));
        }
        if self.sonnenbatterie.timeout_seconds == 0 {
            return Err(ExporterError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }

        self.server.socket_addr()?;

        let path = &self.server.metrics_path;
        if !path.starts_with('/') {
            return Err(ExporterError::Config(format!(
                "metrics path must start with '/': {path}"
            )));
        }
        if path.contains(['{', '}', ':', '*']) {
            return Err(ExporterError::Config(format!(
                "metrics path must be a plain path without captures or wildcards: {path}"
            )));
        }
        if path == "/" || path == "/health" {
            return Err(ExporterError::Config(format!(
                "metrics path {path} collides with a built-in route"
            )));
        }

        Ok(())
    }
}
