//! Latest Data Metrics Collector
//!
//! Collects charge cycle information from `/api/v2/latestdata`. Requires an auth token.
//!
//! # Metrics Produced
//! - `solar_battery_full_charge_capacity` - Full charge capacity in watt hours
//! - `solar_battery_last_fully_charged_unix_timestamp` - Time of the last full charge

use super::{collect_with_handler, record_fields, CollectionContext, CollectionStatus, FieldMapping};
use crate::error::Result;
use crate::metrics::*;
use crate::sonnen::types::LatestData;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

pub static LATEST_DATA_FIELDS: &[FieldMapping<LatestData>] = &[FieldMapping {
    metric: FULL_CHARGE_CAPACITY,
    labels: &[],
    value: |d| d.full_charge_capacity as f64,
}];

/// Converts "seconds since the last full charge" into a Unix timestamp relative to `now`.
pub fn last_fully_charged_timestamp(now: SystemTime, seconds_since_full_charge: i64) -> f64 {
    let now = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    now - seconds_since_full_charge as f64
}

/// Maps latest data onto the scrape's metrics, computing the full charge time from `now`
pub fn record_latest_data(
    metrics: &ScrapeRegistry,
    data: &LatestData,
    now: SystemTime,
) -> Result<()> {
    let fields = record_fields(metrics, LATEST_DATA_FIELDS, data);

    let timestamp =
        last_fully_charged_timestamp(now, data.ic_status.seconds_since_full_charge);
    if let Err(e) = metrics.set(&LAST_FULLY_CHARGED, &[], timestamp) {
        warn!("Skipping last full charge timestamp: {}", e);
        return fields.and(Err(e));
    }

    fields
}

pub async fn collect_latest_data_metrics(ctx: &CollectionContext<'_>) -> CollectionStatus {
    collect_with_handler(
        ctx,
        "latestdata",
        ctx.client.get_latest_data(),
        |data| record_latest_data(ctx.metrics, &data, ctx.now),
    )
    .await
}
