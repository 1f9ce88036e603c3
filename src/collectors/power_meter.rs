//! Power Meter Metrics Collector
//!
//! Collects per-phase measurements from the production and consumption meters
//! reported by `/api/v2/powermeter`. Requires an auth token.
//!
//! # Metrics Produced
//! - `solar_battery_grid_voltage` - Grid voltage seen by the consumption meter
//!   - Labels: phase (L1, L2, L3, L1-L2, L2-L3, L3-L1)
//! - `solar_battery_consumption_power` - Consumption per phase in watts
//!   - Labels: phase (L1, L2, L3)
//! - `solar_battery_production_power` - Production per phase in watts
//!   - Labels: phase (L1, L2, L3)
//! - `solar_battery_consumption_energy_total` - Imported energy of the consumption meter in kWh
//! - `solar_battery_production_energy_total` - Imported energy of the production meter in kWh

use super::{collect_with_handler, record_fields, CollectionContext, CollectionStatus, FieldMapping};
use crate::error::Result;
use crate::metrics::*;
use crate::sonnen::types::PowerMeters;

pub static POWER_METER_FIELDS: &[FieldMapping<PowerMeters>] = &[
    // Grid voltage, phase to neutral
    FieldMapping {
        metric: GRID_VOLTAGE,
        labels: &["L1"],
        value: |m| m.consumption.v_l1_n,
    },
    FieldMapping {
        metric: GRID_VOLTAGE,
        labels: &["L2"],
        value: |m| m.consumption.v_l2_n,
    },
    FieldMapping {
        metric: GRID_VOLTAGE,
        labels: &["L3"],
        value: |m| m.consumption.v_l3_n,
    },
    // Grid voltage, phase to phase
    FieldMapping {
        metric: GRID_VOLTAGE,
        labels: &["L1-L2"],
        value: |m| m.consumption.v_l1_l2,
    },
    FieldMapping {
        metric: GRID_VOLTAGE,
        labels: &["L2-L3"],
        value: |m| m.consumption.v_l2_l3,
    },
    FieldMapping {
        metric: GRID_VOLTAGE,
        labels: &["L3-L1"],
        value: |m| m.consumption.v_l3_l1,
    },
    // Consumption
    FieldMapping {
        metric: CONSUMPTION_POWER,
        labels: &["L1"],
        value: |m| m.consumption.w_l1,
    },
    FieldMapping {
        metric: CONSUMPTION_POWER,
        labels: &["L2"],
        value: |m| m.consumption.w_l2,
    },
    FieldMapping {
        metric: CONSUMPTION_POWER,
        labels: &["L3"],
        value: |m| m.consumption.w_l3,
    },
    FieldMapping {
        metric: CONSUMPTION_ENERGY,
        labels: &[],
        value: |m| m.consumption.kwh_imported,
    },
    // Production
    FieldMapping {
        metric: PRODUCTION_POWER,
        labels: &["L1"],
        value: |m| m.production.w_l1,
    },
    FieldMapping {
        metric: PRODUCTION_POWER,
        labels: &["L2"],
        value: |m| m.production.w_l2,
    },
    FieldMapping {
        metric: PRODUCTION_POWER,
        labels: &["L3"],
        value: |m| m.production.w_l3,
    },
    FieldMapping {
        metric: PRODUCTION_ENERGY,
        labels: &[],
        value: |m| m.production.kwh_imported,
    },
];

pub fn record_power_meters(metrics: &ScrapeRegistry, meters: &PowerMeters) -> Result<()> {
    record_fields(metrics, POWER_METER_FIELDS, meters)
}

/// Collects power meter metrics from the sonnenBatterie
///
/// Fails as a whole when either the production or the consumption meter is missing;
/// no per-phase series are emitted in that case.
pub async fn collect_power_meter_metrics(ctx: &CollectionContext<'_>) -> CollectionStatus {
    collect_with_handler(
        ctx,
        "powermeter",
        ctx.client.get_power_meters(),
        |meters| record_power_meters(ctx.metrics, &meters),
    )
    .await
}
