//! sonnenBatterie API v2 Type Definitions
//!
//! Rust structs for the JSON bodies returned by the appliance's read API.
//! Field documentation follows the community API reference at
//! <https://jlunz.github.io/homeassistant/#/api/getApiV2Status>.
//!
//! # Design Notes
//!
//! - **Completeness**: Structs include all documented fields, even the ones no metric uses yet.
//! - **Serde Defaults**: Every record is `#[serde(default)]` so older firmware that omits a
//!   field still decodes, and every field reads an explicit `null` as its default.
//!   A field with the wrong JSON type is still a decode error.
//!
//! # API Endpoints Covered
//!
//! - `GET /api/v2/status` → [`Status`]
//! - `GET /api/v2/powermeter` → `Vec<`[`PowerMeter`]`>`
//! - `GET /api/v2/latestdata` → [`LatestData`], [`IcStatus`]
//! - `GET /api/v2/battery` → [`BatteryModuleData`]

#![allow(dead_code)] // Allow unused fields in API structs for completeness
use serde::{Deserialize, Deserializer};

/// Reads an explicit JSON `null` as the field's default value.
///
/// Single-phase units report `"Sac2": null`, older firmware leaves other
/// readings null; those must not fail the whole record.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Instantaneous system state from `/status`
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Status {
    /// All AC output of apparent power in VA
    #[serde(rename = "Apparent_output", deserialize_with = "null_as_default")]
    pub apparent_output: i64,
    /// Backup buffer in percent that is set on the system
    #[serde(rename = "BackupBuffer", deserialize_with = "null_as_default")]
    pub backup_buffer: String,
    #[serde(rename = "BatteryCharging", deserialize_with = "null_as_default")]
    pub battery_charging: bool,
    #[serde(rename = "BatteryDischarging", deserialize_with = "null_as_default")]
    pub battery_discharging: bool,
    /// House consumption in watts, average over the last 60s
    #[serde(rename = "Consumption_Avg", deserialize_with = "null_as_default")]
    pub consumption_avg: i64,
    /// House consumption in watts, direct measurement
    #[serde(rename = "Consumption_W", deserialize_with = "null_as_default")]
    pub consumption_w: i64,
    /// AC frequency in hertz
    #[serde(rename = "Fac", deserialize_with = "null_as_default")]
    pub fac: f64,
    #[serde(rename = "FlowConsumptionBattery", deserialize_with = "null_as_default")]
    pub flow_consumption_battery: bool,
    #[serde(rename = "FlowConsumptionGrid", deserialize_with = "null_as_default")]
    pub flow_consumption_grid: bool,
    #[serde(rename = "FlowConsumptionProduction", deserialize_with = "null_as_default")]
    pub flow_consumption_production: bool,
    #[serde(rename = "FlowGridBattery", deserialize_with = "null_as_default")]
    pub flow_grid_battery: bool,
    #[serde(rename = "FlowProductionBattery", deserialize_with = "null_as_default")]
    pub flow_production_battery: bool,
    #[serde(rename = "FlowProductionGrid", deserialize_with = "null_as_default")]
    pub flow_production_grid: bool,
    /// Negative is consumption from the grid, positive is feed in
    #[serde(rename = "GridFeedIn_W", deserialize_with = "null_as_default")]
    pub grid_feed_in_w: f64,
    #[serde(rename = "IsSystemInstalled", deserialize_with = "null_as_default")]
    pub is_system_installed: i64,
    /// `1` = manual charging via API, `2` = automatic self consumption
    #[serde(rename = "OperatingMode", deserialize_with = "null_as_default")]
    pub operating_mode: String,
    /// Greater than zero is discharging, less than zero is charging
    #[serde(rename = "Pac_total_W", deserialize_with = "null_as_default")]
    pub pac_total_w: i64,
    /// PV production in watts
    #[serde(rename = "Production_W", deserialize_with = "null_as_default")]
    pub production_w: i64,
    /// Relative state of charge
    #[serde(rename = "RSOC", deserialize_with = "null_as_default")]
    pub rsoc: i64,
    /// Remaining capacity based on RSOC
    #[serde(rename = "RemainingCapacity_Wh", deserialize_with = "null_as_default")]
    pub remaining_capacity_wh: i64,
    #[serde(rename = "Sac1", deserialize_with = "null_as_default")]
    pub sac1: i64,
    #[serde(rename = "Sac2", deserialize_with = "null_as_default")]
    pub sac2: i64,
    #[serde(rename = "Sac3", deserialize_with = "null_as_default")]
    pub sac3: i64,
    /// `OnGrid` or `OffGrid`
    #[serde(rename = "SystemStatus", deserialize_with = "null_as_default")]
    pub system_status: String,
    /// Local system time
    #[serde(rename = "Timestamp", deserialize_with = "null_as_default")]
    pub timestamp: String,
    /// User state of charge
    #[serde(rename = "USOC", deserialize_with = "null_as_default")]
    pub usoc: i64,
    /// AC voltage in volts
    #[serde(rename = "Uac", deserialize_with = "null_as_default")]
    pub uac: f64,
    /// Battery voltage in volts
    #[serde(rename = "Ubat", deserialize_with = "null_as_default")]
    pub ubat: f64,
    /// True if no discharge is allowed because of battery maintenance
    #[serde(rename = "dischargeNotAllowed", deserialize_with = "null_as_default")]
    pub discharge_not_allowed: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub generator_autostart: bool,
}

/// Which side of the installation a power meter measures
pub const DIRECTION_PRODUCTION: &str = "production";
pub const DIRECTION_CONSUMPTION: &str = "consumption";

/// One entry of the `/powermeter` list
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PowerMeter {
    #[serde(deserialize_with = "null_as_default")]
    pub a_l1: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub a_l2: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub a_l3: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub a_total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub channel: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub deviceid: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub direction: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub frequency: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub kwh_exported: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub kwh_imported: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub v_l1_l2: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub v_l1_n: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub v_l2_l3: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub v_l2_n: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub v_l3_l1: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub v_l3_n: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub va_total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub var_total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub w_l1: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub w_l2: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub w_l3: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub w_total: f64,
}

/// The production and consumption meters picked out of the `/powermeter` list
#[derive(Debug, Clone, PartialEq)]
pub struct PowerMeters {
    pub production: PowerMeter,
    pub consumption: PowerMeter,
}

/// Charge cycle status from `/latestdata`
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LatestData {
    #[serde(rename = "FullChargeCapacity", deserialize_with = "null_as_default")]
    pub full_charge_capacity: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub ic_status: IcStatus,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct IcStatus {
    #[serde(rename = "secondssincefullcharge", deserialize_with = "null_as_default")]
    pub seconds_since_full_charge: i64,
}

/// Battery pack telemetry from `/battery`
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BatteryModuleData {
    #[serde(rename = "cyclecount", deserialize_with = "null_as_default")]
    pub cycle_count: f64,
    #[serde(rename = "fullchargecapacity", deserialize_with = "null_as_default")]
    pub full_charge_capacity: f64,
    #[serde(rename = "maximumcelltemperature", deserialize_with = "null_as_default")]
    pub maximum_cell_temperature: f64,
    #[serde(rename = "maximumcellvoltage", deserialize_with = "null_as_default")]
    pub maximum_cell_voltage: f64,
    #[serde(rename = "maximummodulecurrent", deserialize_with = "null_as_default")]
    pub maximum_module_current: f64,
    #[serde(rename = "maximummoduledcvoltage", deserialize_with = "null_as_default")]
    pub maximum_module_dc_voltage: f64,
    #[serde(rename = "minimumcelltemperature", deserialize_with = "null_as_default")]
    pub minimum_cell_temperature: f64,
    #[serde(rename = "minimumcellvoltage", deserialize_with = "null_as_default")]
    pub minimum_cell_voltage: f64,
    #[serde(rename = "minimummodulecurrent", deserialize_with = "null_as_default")]
    pub minimum_module_current: f64,
    #[serde(rename = "minimummoduledcvoltage", deserialize_with = "null_as_default")]
    pub minimum_module_dc_voltage: f64,
    #[serde(rename = "relativestateofcharge", deserialize_with = "null_as_default")]
    pub relative_state_of_charge: f64,
    #[serde(rename = "remainingcapacity", deserialize_with = "null_as_default")]
    pub remaining_capacity: f64,
    #[serde(rename = "systemalarm", deserialize_with = "null_as_default")]
    pub system_alarm: f64,
    #[serde(rename = "systemcurrent", deserialize_with = "null_as_default")]
    pub system_current: f64,
    #[serde(rename = "systemvoltage", deserialize_with = "null_as_default")]
    pub system_voltage: f64,
    #[serde(rename = "systemdcvoltage", deserialize_with = "null_as_default")]
    pub system_dc_voltage: f64,
    #[serde(rename = "systemstatus", deserialize_with = "null_as_default")]
    pub system_status: f64,
    #[serde(rename = "systemwarning", deserialize_with = "null_as_default")]
    pub system_warning: f64,
}
