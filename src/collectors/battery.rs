//! Battery Module Metrics Collector
//!
//! Collects battery pack telemetry from `/api/v2/battery`. Requires an auth token.
//!
//! # Metrics Produced
//! - `solar_battery_cycle_count`
//! - `solar_battery_{maximum,minimum}_cell_temperature`
//! - `solar_battery_{maximum,minimum}_cell_voltage`
//! - `solar_battery_{maximum,minimum}_module_current`
//! - `solar_battery_{maximum,minimum}_module_dc_voltage`
//! - `solar_battery_relative_state_of_charge`
//! - `solar_battery_remaining_capacity`
//! - `solar_battery_system_{alarm,current,voltage,dc_voltage,status,warning}`
//!
//! Values are passed through in the units the appliance reports.

use super::{collect_with_handler, record_fields, CollectionContext, CollectionStatus, FieldMapping};
use crate::error::Result;
use crate::metrics::*;
use crate::sonnen::types::BatteryModuleData;

pub static BATTERY_FIELDS: &[FieldMapping<BatteryModuleData>] = &[
    FieldMapping {
        metric: BATTERY_CYCLE_COUNT,
        labels: &[],
        value: |b| b.cycle_count,
    },
    FieldMapping {
        metric: BATTERY_MAXIMUM_CELL_TEMPERATURE,
        labels: &[],
        value: |b| b.maximum_cell_temperature,
    },
    FieldMapping {
        metric: BATTERY_MAXIMUM_CELL_VOLTAGE,
        labels: &[],
        value: |b| b.maximum_cell_voltage,
    },
    FieldMapping {
        metric: BATTERY_MAXIMUM_MODULE_CURRENT,
        labels: &[],
        value: |b| b.maximum_module_current,
    },
    FieldMapping {
        metric: BATTERY_MAXIMUM_MODULE_DC_VOLTAGE,
        labels: &[],
        value: |b| b.maximum_module_dc_voltage,
    },
    FieldMapping {
        metric: BATTERY_MINIMUM_CELL_TEMPERATURE,
        labels: &[],
        value: |b| b.minimum_cell_temperature,
    },
    FieldMapping {
        metric: BATTERY_MINIMUM_CELL_VOLTAGE,
        labels: &[],
        value: |b| b.minimum_cell_voltage,
    },
    FieldMapping {
        metric: BATTERY_MINIMUM_MODULE_CURRENT,
        labels: &[],
        value: |b| b.minimum_module_current,
    },
    FieldMapping {
        metric: BATTERY_MINIMUM_MODULE_DC_VOLTAGE,
        labels: &[],
        value: |b| b.minimum_module_dc_voltage,
    },
    FieldMapping {
        metric: BATTERY_RELATIVE_STATE_OF_CHARGE,
        labels: &[],
        value: |b| b.relative_state_of_charge,
    },
    FieldMapping {
        metric: BATTERY_REMAINING_CAPACITY,
        labels: &[],
        value: |b| b.remaining_capacity,
    },
    FieldMapping {
        metric: BATTERY_SYSTEM_ALARM,
        labels: &[],
        value: |b| b.system_alarm,
    },
    FieldMapping {
        metric: BATTERY_SYSTEM_CURRENT,
        labels: &[],
        value: |b| b.system_current,
    },
    FieldMapping {
        metric: BATTERY_SYSTEM_VOLTAGE,
        labels: &[],
        value: |b| b.system_voltage,
    },
    FieldMapping {
        metric: BATTERY_SYSTEM_DC_VOLTAGE,
        labels: &[],
        value: |b| b.system_dc_voltage,
    },
    FieldMapping {
        metric: BATTERY_SYSTEM_STATUS,
        labels: &[],
        value: |b| b.system_status,
    },
    FieldMapping {
        metric: BATTERY_SYSTEM_WARNING,
        labels: &[],
        value: |b| b.system_warning,
    },
];

pub fn record_battery_module_data(
    metrics: &ScrapeRegistry,
    battery: &BatteryModuleData,
) -> Result<()> {
    record_fields(metrics, BATTERY_FIELDS, battery)
}

pub async fn collect_battery_metrics(ctx: &CollectionContext<'_>) -> CollectionStatus {
    collect_with_handler(
        ctx,
        "battery",
        ctx.client.get_battery_module_data(),
        |battery| record_battery_module_data(ctx.metrics, &battery),
    )
    .await
}
