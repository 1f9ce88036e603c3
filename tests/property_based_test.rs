//! Property-based tests using proptest
//!
//! Tests that verify properties hold for arbitrary inputs.

use proptest::prelude::*;
use sonnenbatterie_exporter::collectors::latest_data::last_fully_charged_timestamp;
use sonnenbatterie_exporter::collectors::status::record_status;
use sonnenbatterie_exporter::metrics::{MetricsCatalog, ScrapeRegistry};
use sonnenbatterie_exporter::sonnen::client::select_power_meters;
use sonnenbatterie_exporter::sonnen::types::{PowerMeter, Status};
use std::time::{Duration, UNIX_EPOCH};

/// Helper to create a test registry
fn create_test_registry() -> ScrapeRegistry {
    MetricsCatalog::new()
        .expect("Failed to create catalog")
        .registry()
        .expect("Failed to create registry")
}

fn meter(direction: &str, w_total: f64) -> PowerMeter {
    PowerMeter {
        direction: direction.to_string(),
        w_total,
        ..Default::default()
    }
}

fn value_of(rendered: &str, series: &str) -> Option<f64> {
    rendered
        .lines()
        .find_map(|line| line.strip_prefix(series)?.strip_prefix(' ')?.parse().ok())
}

proptest! {
    #[test]
    fn test_power_meters_assigned_regardless_of_order(
        production_first in any::<bool>(),
        noise in prop::collection::vec("[a-z]{1,12}", 0..4),
        production_w in -1e6f64..1e6,
        consumption_w in -1e6f64..1e6,
    ) {
        // Given: One meter per direction plus unrelated meters, in any order
        let mut meters: Vec<PowerMeter> = noise
            .iter()
            .filter(|d| *d != "production" && *d != "consumption")
            .map(|d| meter(d, 0.0))
            .collect();
        let production = meter("production", production_w);
        let consumption = meter("consumption", consumption_w);
        if production_first {
            meters.push(production);
            meters.push(consumption);
        } else {
            meters.push(consumption);
            meters.push(production);
        }

        // When: Selecting the meters
        let selected = select_power_meters(meters).unwrap();

        // Then: Each one is assigned by direction
        prop_assert_eq!(selected.production.w_total, production_w);
        prop_assert_eq!(selected.consumption.w_total, consumption_w);
    }

    #[test]
    fn test_last_fully_charged_is_now_minus_elapsed(
        now in 0u64..4_000_000_000,
        elapsed in 0i64..100_000_000,
    ) {
        let clock = UNIX_EPOCH + Duration::from_secs(now);
        let timestamp = last_fully_charged_timestamp(clock, elapsed);
        prop_assert_eq!(timestamp, now as f64 - elapsed as f64);
    }

    #[test]
    fn test_status_values_pass_through_unchanged(
        rsoc in 0i64..=100,
        usoc in 0i64..=100,
        uac in 0.0f64..500.0,
        fac in 45.0f64..65.0,
        consumption_w in 0i64..50_000,
        remaining in 0i64..100_000,
    ) {
        // Given: Any valid status record
        let status = Status {
            rsoc,
            usoc,
            uac,
            fac,
            consumption_w,
            remaining_capacity_wh: remaining,
            ..Default::default()
        };

        // When: Mapping it onto a fresh registry
        let registry = create_test_registry();
        record_status(&registry, &status).unwrap();
        let rendered = registry.render().unwrap();

        // Then: Every field comes back as the same value
        prop_assert_eq!(value_of(&rendered, "solar_battery_charge_percent"), Some(rsoc as f64));
        prop_assert_eq!(value_of(&rendered, "solar_battery_usable_charge_percent"), Some(usoc as f64));
        prop_assert_eq!(value_of(&rendered, "solar_battery_grid_voltage{phase=\"\"}"), Some(uac));
        prop_assert_eq!(value_of(&rendered, "solar_battery_grid_frequency"), Some(fac));
        prop_assert_eq!(
            value_of(&rendered, "solar_battery_consumption_power{phase=\"\"}"),
            Some(consumption_w as f64)
        );
        prop_assert_eq!(
            value_of(&rendered, "solar_battery_remaining_charge_capacity"),
            Some(remaining as f64)
        );
    }

    #[test]
    fn test_any_operating_mode_renders_without_panic(mode in "\\PC*") {
        // Given: Arbitrary operating mode strings from the appliance
        let status = Status { operating_mode: mode, ..Default::default() };

        // When: Mapping and rendering
        let registry = create_test_registry();
        prop_assert!(record_status(&registry, &status).is_ok());

        // Then: Rendering should not panic
        prop_assert!(registry.render().is_ok());
    }
}
