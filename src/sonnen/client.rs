//! sonnenBatterie REST API Client
//!
//! This module provides a client for the read side of the sonnenBatterie API v2.
//!
//! # Architecture
//!
//! - **Transport**: plain HTTP GET against `<base>/api/v2/<endpoint>`
//! - **Authentication**: optional static token sent in the `Auth-Token` header
//! - **Decoding**: the body is read in full and decoded with `serde_json`, so a
//!   malformed body is reported separately from transport failures
//!
//! Without a token only `/status` answers; the other endpoints need one. Use
//! [`SonnenClient::supports_authenticated_endpoints`] to check before calling them.
//!
//! # Example
//!
//! ```no_run
//! use sonnenbatterie_exporter::config::SonnenConfig;
//! use sonnenbatterie_exporter::sonnen::SonnenClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SonnenConfig {
//!     url: "http://192.168.1.50".to_string(),
//!     token: Some("your-api-token".into()),
//!     timeout_seconds: 15,
//! };
//!
//! let client = SonnenClient::new(&config)?;
//! let status = client.get_status().await?;
//! println!("charge: {}%", status.rsoc);
//! # Ok(())
//! # }
//! ```

use crate::config::SonnenConfig;
use crate::error::{ExporterError, Result};
use crate::sonnen::types::*;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = concat!("sonnenbatterie-exporter/", env!("CARGO_PKG_VERSION"));

const AUTH_HEADER: &str = "Auth-Token";

/// Read endpoints of the API, relative to `<base>/api/v2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Status,
    PowerMeter,
    LatestData,
    Battery,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Status => "status",
            Endpoint::PowerMeter => "powermeter",
            Endpoint::LatestData => "latestdata",
            Endpoint::Battery => "battery",
        }
    }
}

/// Client for the sonnenBatterie API v2
///
/// Holds only immutable state (base URL, token, HTTP transport), so one instance
/// can be shared behind an `Arc` by any number of concurrent scrapes.
#[derive(Debug, Clone)]
pub struct SonnenClient {
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
    http: Client,
}

impl SonnenClient {
    pub fn new(config: &SonnenConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| ExporterError::Config(format!("Failed to build HTTP client: {e}")))?;

        Self::with_http_client(
            &config.url,
            config.token().map(str::to_owned),
            Duration::from_secs(config.timeout_seconds),
            http,
        )
    }

    /// Builds a client around an existing `reqwest::Client`.
    ///
    /// The caller's client is used as is; the user agent is still set per request.
    pub fn with_http_client(
        url: &str,
        token: Option<String>,
        timeout: Duration,
        http: Client,
    ) -> Result<Self> {
        let mut base_url = Url::parse(url)
            .map_err(|e| ExporterError::Config(format!("invalid sonnenbatterie url {url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ExporterError::Config(format!(
                "sonnenbatterie url cannot be used as a base: {url}"
            )));
        }

        let path = format!("{}/api/v2", base_url.path().trim_end_matches('/'));
        base_url.set_path(&path);

        Ok(Self {
            base_url,
            token: token.filter(|t| !t.is_empty()),
            timeout,
            http,
        })
    }

    /// Whether a token is configured, which the power meter, latest data and
    /// battery endpoints require.
    pub fn supports_authenticated_endpoints(&self) -> bool {
        self.token.is_some()
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}/{}", self.base_url.path(), endpoint.path()));
        url
    }

    /// Current system state
    pub async fn get_status(&self) -> Result<Status> {
        self.get_json(Endpoint::Status).await
    }

    /// Latest power meter measurements, split into production and consumption
    ///
    /// The first meter reported for each direction is used; meters with any other
    /// direction are ignored.
    pub async fn get_power_meters(&self) -> Result<PowerMeters> {
        let meters: Vec<PowerMeter> = self.get_json(Endpoint::PowerMeter).await?;
        select_power_meters(meters)
    }

    pub async fn get_latest_data(&self) -> Result<LatestData> {
        self.get_json(Endpoint::LatestData).await
    }

    pub async fn get_battery_module_data(&self) -> Result<BatteryModuleData> {
        self.get_json(Endpoint::Battery).await
    }

    async fn get_json<T>(&self, endpoint: Endpoint) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        debug!("GET {}", url);

        let mut request = self
            .http
            .get(url)
            .timeout(self.timeout)
            .header(ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header(AUTH_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ExporterError::UnexpectedStatus(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ExporterError::Decode {
            endpoint: endpoint.path(),
            source,
        })
    }
}

/// Picks the production and consumption meters out of a `/powermeter` list.
pub fn select_power_meters(meters: Vec<PowerMeter>) -> Result<PowerMeters> {
    let mut production = None;
    let mut consumption = None;

    for meter in meters {
        match meter.direction.as_str() {
            DIRECTION_CONSUMPTION if consumption.is_none() => consumption = Some(meter),
            DIRECTION_PRODUCTION if production.is_none() => production = Some(meter),
            _ => {}
        }
    }

    let consumption = consumption.ok_or(ExporterError::MissingConsumptionMeter)?;
    let production = production.ok_or(ExporterError::MissingProductionMeter)?;

    Ok(PowerMeters {
        production,
        consumption,
    })
}
