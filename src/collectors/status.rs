//! System Status Metrics Collector
//!
//! Collects instantaneous system state from `/api/v2/status`. This is the only
//! endpoint that answers without an auth token.
//!
//! # Metrics Produced
//! - `solar_battery_grid_voltage{phase=""}` - AC voltage
//! - `solar_battery_grid_frequency` - AC frequency in Hz
//! - `solar_battery_charge_percent` - Relative state of charge
//! - `solar_battery_usable_charge_percent` - Usable state of charge
//! - `solar_battery_consumption_power{phase=""}` - House consumption in watts
//! - `solar_battery_production_power{phase=""}` - PV production in watts
//! - `solar_battery_remaining_charge_capacity` - Remaining capacity in watt hours
//! - `solar_battery_battery_charging` / `solar_battery_battery_discharging` - 0/1 flags
//! - `solar_battery_operating_mode{mode}` - Operating mode (value is always 1)

use super::{
    collect_with_handler, flag, record_fields, CollectionContext, CollectionStatus, FieldMapping,
};
use crate::error::Result;
use crate::metrics::*;
use crate::sonnen::types::Status;
use tracing::warn;

/// Status fields and the series they feed
pub static STATUS_FIELDS: &[FieldMapping<Status>] = &[
    FieldMapping {
        metric: GRID_VOLTAGE,
        labels: &[""],
        value: |s| s.uac,
    },
    FieldMapping {
        metric: GRID_FREQUENCY,
        labels: &[],
        value: |s| s.fac,
    },
    FieldMapping {
        metric: CHARGE_PERCENT,
        labels: &[],
        value: |s| s.rsoc as f64,
    },
    FieldMapping {
        metric: USABLE_CHARGE_PERCENT,
        labels: &[],
        value: |s| s.usoc as f64,
    },
    FieldMapping {
        metric: CONSUMPTION_POWER,
        labels: &[""],
        value: |s| s.consumption_w as f64,
    },
    FieldMapping {
        metric: PRODUCTION_POWER,
        labels: &[""],
        value: |s| s.production_w as f64,
    },
    FieldMapping {
        metric: REMAINING_CHARGE_CAPACITY,
        labels: &[],
        value: |s| s.remaining_capacity_wh as f64,
    },
    FieldMapping {
        metric: BATTERY_CHARGING,
        labels: &[],
        value: |s| flag(s.battery_charging),
    },
    FieldMapping {
        metric: BATTERY_DISCHARGING,
        labels: &[],
        value: |s| flag(s.battery_discharging),
    },
];

/// Maps a decoded status record onto the scrape's metrics
pub fn record_status(metrics: &ScrapeRegistry, status: &Status) -> Result<()> {
    let fields = record_fields(metrics, STATUS_FIELDS, status);

    if !status.operating_mode.is_empty() {
        if let Err(e) = metrics.set(&OPERATING_MODE, &[status.operating_mode.as_str()], 1.0) {
            warn!("Skipping operating mode {}: {}", status.operating_mode, e);
            return fields.and(Err(e));
        }
    }

    fields
}

/// Collects system status metrics from the sonnenBatterie
///
/// # Returns
///
/// * `CollectionStatus::Success` - Successfully collected status metrics
/// * `CollectionStatus::Failed` - Failed to collect metrics (non-fatal, logged as warning)
pub async fn collect_status_metrics(ctx: &CollectionContext<'_>) -> CollectionStatus {
    collect_with_handler(ctx, "status", ctx.client.get_status(), |status| {
        record_status(ctx.metrics, &status)
    })
    .await
}
