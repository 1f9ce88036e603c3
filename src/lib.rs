//! sonnenBatterie Prometheus Exporter
//!
//! A Prometheus metrics exporter for sonnenBatterie home storage systems.
//!
//! # Overview
//!
//! This exporter polls the sonnenBatterie REST API (v2) on every scrape and exposes
//! the readings in Prometheus format. Nothing is cached between scrapes: each request
//! to the metrics endpoint queries the appliance and renders what it answered.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   HTTP GET /api/v2   ┌──────────────┐
//! │    sonnen    │ ◄──────────────────  │   Exporter   │
//! │   Batterie   │    JSON + token      │              │
//! └──────────────┘                      │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                       │  │ Client │  │ ◄────────────► │ Prometheus │
//!                                       │  └────────┘  │   /metrics     └────────────┘
//!                                       │  ┌────────┐  │
//!                                       │  │Metrics │  │
//!                                       │  └────────┘  │
//!                                       └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`sonnen`] - REST client and API type definitions
//! - [`collectors`] - Per-endpoint mapping from API records to metrics
//! - [`metrics`] - Prometheus metric definitions
//! - [`server`] - HTTP server and scrape handling
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use sonnenbatterie_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - ✅ Grid voltage, frequency and state of charge (no token needed)
//! - ✅ Per-phase consumption and production from the power meters
//! - ✅ Battery module cell and module telemetry
//! - ✅ Time of the last full charge

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod sonnen;
