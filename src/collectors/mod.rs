//! Metrics Collectors
//!
//! This module contains one collector per sonnenBatterie API endpoint. Each collector
//! queries its endpoint and maps the decoded record onto the scrape's metrics.
//!
//! # Architecture
//!
//! Collectors follow a consistent pattern:
//! - Accept a `CollectionContext` holding the client and the scrape's registry
//! - Query the sonnenBatterie API
//! - Apply a static table of [`FieldMapping`]s to the record
//! - Return a [`CollectionStatus`]
//!
//! # Error Handling
//!
//! Individual collector failures are non-fatal: they log a warning, leave their metrics
//! out of the scrape and return `CollectionStatus::Failed`. The remaining groups still run.

use crate::metrics::{MetricSpec, ScrapeRegistry, BUILD_INFO, SCRAPE_COLLECTOR_SUCCESS};
use crate::sonnen::SonnenClient;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Shared context passed to all collectors
///
/// All fields are immutable references or plain values scoped to one scrape.
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// sonnenBatterie API client for querying endpoints
    pub client: &'a SonnenClient,
    /// Registry that receives this scrape's samples
    pub metrics: &'a ScrapeRegistry,
    /// Wall clock time the scrape started at
    pub now: SystemTime,
}

/// Status of a metrics collection operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Metrics were successfully collected and updated
    Success,
    /// Collection failed but is non-fatal (already logged as warning)
    Failed,
}

/// Maps one field of an API record onto one metric series
pub struct FieldMapping<T> {
    pub metric: MetricSpec,
    pub labels: &'static [&'static str],
    pub value: fn(&T) -> f64,
}

/// Writes every mapped field of `record` into the registry.
///
/// A sample that the registry rejects is logged and skipped; the remaining fields
/// are still written. The first rejection is returned so the group is reported as
/// failed.
pub fn record_fields<T>(
    metrics: &ScrapeRegistry,
    mappings: &[FieldMapping<T>],
    record: &T,
) -> crate::error::Result<()> {
    let mut outcome = Ok(());
    for mapping in mappings {
        let value = (mapping.value)(record);
        if let Err(e) = metrics.set(&mapping.metric, mapping.labels, value) {
            warn!(
                "Skipping sample {}{:?}: {}",
                mapping.metric.fq_name(),
                mapping.labels,
                e
            );
            if outcome.is_ok() {
                outcome = Err(e);
            }
        }
    }
    outcome
}

pub(crate) fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Helper to reduce boilerplate in collectors
///
/// Wraps API queries with consistent error handling:
/// - On success: processes data, logs success, returns `CollectionStatus::Success`
/// - On error: logs warning, returns `CollectionStatus::Failed` (non-fatal)
/// - If processing rejects any sample, the group counts as failed even though the
///   accepted samples stay in the output
///
/// Either way the outcome is recorded in `solar_battery_scrape_collector_success`.
pub async fn collect_with_handler<T, F, P, E>(
    ctx: &CollectionContext<'_>,
    name: &str,
    query_future: F,
    process: P,
) -> CollectionStatus
where
    F: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: FnOnce(T) -> crate::error::Result<()>,
{
    let status = match query_future.await {
        Ok(data) => match process(data) {
            Ok(()) => {
                debug!("Updated {} metrics", name);
                CollectionStatus::Success
            }
            Err(e) => {
                warn!("Partially updated {} metrics: {}", name, e);
                CollectionStatus::Failed
            }
        },
        Err(e) => {
            warn!("Failed to get {}: {}", name, e);
            CollectionStatus::Failed
        }
    };

    let value = flag(status == CollectionStatus::Success);
    if let Err(e) = ctx.metrics.set(&SCRAPE_COLLECTOR_SUCCESS, &[name], value) {
        warn!("Failed to record collector status for {}: {}", name, e);
    }

    status
}

/// Outcome of a full scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

/// Runs every collector the client supports, one after another.
///
/// Status is always collected. The power meter, latest data and battery module
/// groups need an auth token and are skipped entirely without one.
pub async fn collect_all(ctx: &CollectionContext<'_>) -> ScrapeSummary {
    if let Err(e) = ctx
        .metrics
        .set(&BUILD_INFO, &[env!("CARGO_PKG_VERSION")], 1.0)
    {
        warn!("Failed to record build info: {}", e);
    }

    let mut results = vec![collect_status_metrics(ctx).await];

    if ctx.client.supports_authenticated_endpoints() {
        results.push(collect_power_meter_metrics(ctx).await);
        results.push(collect_latest_data_metrics(ctx).await);
        results.push(collect_battery_metrics(ctx).await);
    }

    let summary = ScrapeSummary {
        attempted: results.len(),
        succeeded: results
            .iter()
            .filter(|s| **s == CollectionStatus::Success)
            .count(),
    };
    debug!(
        "Scrape finished: {}/{} groups collected",
        summary.succeeded, summary.attempted
    );
    summary
}

// Collector modules
pub mod battery;
pub mod latest_data;
pub mod power_meter;
pub mod status;

// Re-export collector functions for convenient access
pub use battery::collect_battery_metrics;
pub use latest_data::collect_latest_data_metrics;
pub use power_meter::collect_power_meter_metrics;
pub use status::collect_status_metrics;
