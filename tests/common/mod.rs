//! Fixtures shared by the integration tests
//!
//! Bodies are modelled on real API v2 responses of a sonnenBatterie 10.

#![allow(dead_code)]

use mockito::{Mock, ServerGuard};
use serde_json::{json, Value};
use sonnenbatterie_exporter::sonnen::SonnenClient;
use std::time::Duration;

pub const TEST_TOKEN: &str = "1a2b3c4d-5e6f";

pub fn status_json() -> Value {
    json!({
        "Apparent_output": 225,
        "BackupBuffer": "0",
        "BatteryCharging": false,
        "BatteryDischarging": true,
        "Consumption_Avg": 491,
        "Consumption_W": 487,
        "Fac": 50.01,
        "FlowConsumptionBattery": true,
        "FlowConsumptionGrid": false,
        "FlowConsumptionProduction": false,
        "FlowGridBattery": false,
        "FlowProductionBattery": false,
        "FlowProductionGrid": false,
        "GridFeedIn_W": -14,
        "IsSystemInstalled": 1,
        "OperatingMode": "2",
        "Pac_total_W": 466,
        "Production_W": 12,
        "RSOC": 62,
        "RemainingCapacity_Wh": 5980,
        "Sac1": 155,
        "Sac2": 35,
        "Sac3": 35,
        "SystemStatus": "OnGrid",
        "Timestamp": "2023-02-18 11:08:56",
        "USOC": 58,
        "Uac": 230.4,
        "Ubat": 51.2,
        "dischargeNotAllowed": false,
        "generator_autostart": false
    })
}

pub fn power_meter_json(direction: &str, base: f64) -> Value {
    json!({
        "a_l1": 1.5,
        "a_l2": 0.8,
        "a_l3": 0.4,
        "a_total": 2.7,
        "channel": if direction == "production" { 1 } else { 2 },
        "deviceid": 4,
        "direction": direction,
        "error": 0,
        "frequency": 50.0,
        "kwh_exported": 0.0,
        "kwh_imported": base * 1000.0,
        "v_l1_l2": 400.1,
        "v_l1_n": 231.1,
        "v_l2_l3": 400.2,
        "v_l2_n": 231.2,
        "v_l3_l1": 400.3,
        "v_l3_n": 231.3,
        "va_total": 700.0,
        "var_total": -120.0,
        "w_l1": base + 1.0,
        "w_l2": base + 2.0,
        "w_l3": base + 3.0,
        "w_total": 3.0 * base + 6.0
    })
}

pub fn power_meters_json() -> Value {
    json!([
        power_meter_json("production", 100.0),
        power_meter_json("consumption", 200.0)
    ])
}

pub fn latest_data_json(seconds_since_full_charge: i64) -> Value {
    json!({
        "Consumption_W": 487,
        "FullChargeCapacity": 10171,
        "GridFeedIn_W": -14,
        "Pac_total_W": 466,
        "Production_W": 12,
        "RSOC": 62,
        "SetPoint_W": 0,
        "Timestamp": "2023-02-18 11:08:56",
        "USOC": 58,
        "UTC_Offet": 1,
        "ic_status": {
            "DC Shutdown Reason": {},
            "Eclipse Led": {},
            "nrbatterymodules": 4,
            "secondssincefullcharge": seconds_since_full_charge,
            "statebms": "ready",
            "statecorecontrolmodule": "ongrid",
            "stateinverter": "running",
            "timestamp": "Sat Feb 18 11:08:55 2023"
        }
    })
}

pub fn battery_json() -> Value {
    json!({
        "balancechargerequest": 0.0,
        "chargecurrentlimit": 39.97,
        "cyclecount": 412.0,
        "dischargecurrentlimit": 39.97,
        "fullchargecapacity": 201.98,
        "fullchargecapacitywh": 10171.2,
        "maximumcelltemperature": 21.95,
        "maximumcellvoltage": 3.33,
        "maximumcellvoltagenum": 0.0,
        "maximummodulecurrent": -2.5,
        "maximummoduledcvoltage": 53.3,
        "maximummoduletemperature": 0.0,
        "minimumcelltemperature": 19.85,
        "minimumcellvoltage": 3.32,
        "minimumcellvoltagenum": 0.0,
        "minimummodulecurrent": -2.6,
        "minimummoduledcvoltage": 53.2,
        "minimummoduletemperature": 0.0,
        "relativestateofcharge": 62.0,
        "remainingcapacity": 125.8,
        "systemalarm": 0.0,
        "systemcurrent": -10.2,
        "systemdcvoltage": 53.25,
        "systemstatus": 49.0,
        "systemtime": 0.0,
        "systemvoltage": 53.24,
        "systemwarning": 0.0,
        "usableremainingcapacity": 117.1
    })
}

/// Registers a successful JSON response for `/api/v2/<endpoint>`
pub async fn mock_endpoint(server: &mut ServerGuard, endpoint: &str, body: &Value) -> Mock {
    server
        .mock("GET", format!("/api/v2/{endpoint}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Registers a failing response for `/api/v2/<endpoint>`
pub async fn mock_failure(server: &mut ServerGuard, endpoint: &str, status: usize) -> Mock {
    server
        .mock("GET", format!("/api/v2/{endpoint}").as_str())
        .with_status(status)
        .create_async()
        .await
}

pub fn client_for(server: &ServerGuard, token: Option<&str>) -> SonnenClient {
    SonnenClient::with_http_client(
        &server.url(),
        token.map(str::to_owned),
        Duration::from_secs(5),
        reqwest::Client::new(),
    )
    .expect("Failed to create client")
}

/// Value of the first sample line that starts with `series` (name plus optional labels)
pub fn sample_value(rendered: &str, series: &str) -> Option<f64> {
    rendered
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let rest = line.strip_prefix(series)?;
            rest.strip_prefix(' ')?.trim().parse().ok()
        })
}
