//! Prometheus Metrics Definitions
//!
//! This module defines every Prometheus metric exposed by the sonnenBatterie exporter.
//!
//! # Metric Categories
//!
//! ## System Status (always collected)
//! - Grid voltage and frequency
//! - Relative and usable state of charge
//! - Consumption and production power
//! - Charging/discharging flags and operating mode
//!
//! ## Power Meters (token required)
//! - Per-phase grid voltage, consumption and production power
//! - Imported energy counters
//!
//! ## Latest Data (token required)
//! - Full charge capacity and time of the last full charge
//!
//! ## Battery Module (token required)
//! - Cycle count, cell/module voltage, current and temperature extremes
//! - System alarm, warning and status codes
//!
//! # Per-Scrape Registries
//!
//! The descriptors live in a fixed table ([`ALL_METRICS`]). Each scrape builds a
//! fresh [`ScrapeRegistry`] from that table, fills it from the appliance responses
//! and renders it. Nothing is carried over between scrapes, so a group that failed
//! to fetch is simply absent and concurrent scrapes never see each other's values.
//!
//! All metrics use the `solar_battery_` namespace prefix.

use crate::error::{ExporterError, Result};
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;

pub const NAMESPACE: &str = "solar_battery";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Instantaneous value that may go up or down
    Gauge,
    /// Monotonically accumulating value
    Counter,
}

/// Static description of one metric family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    /// Name without the namespace prefix
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
    pub kind: MetricKind,
}

impl MetricSpec {
    const fn gauge(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            labels: &[],
            kind: MetricKind::Gauge,
        }
    }

    const fn labeled_gauge(
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            help,
            labels,
            kind: MetricKind::Gauge,
        }
    }

    const fn counter(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            labels: &[],
            kind: MetricKind::Counter,
        }
    }

    /// Fully qualified name as it appears in the exposition output
    pub fn fq_name(&self) -> String {
        format!("{}_{}", NAMESPACE, self.name)
    }

    fn opts(&self) -> Opts {
        Opts::new(self.name, self.help).namespace(NAMESPACE)
    }
}

// Status metrics
pub const GRID_VOLTAGE: MetricSpec =
    MetricSpec::labeled_gauge("grid_voltage", "Solar battery Grid (AC) voltage", &["phase"]);
pub const GRID_FREQUENCY: MetricSpec =
    MetricSpec::gauge("grid_frequency", "Solar battery Grid (AC) frequency in Hz");
pub const CHARGE_PERCENT: MetricSpec =
    MetricSpec::gauge("charge_percent", "Solar battery charge in percent");
pub const USABLE_CHARGE_PERCENT: MetricSpec = MetricSpec::gauge(
    "usable_charge_percent",
    "Solar battery usable charge in percent",
);
pub const CONSUMPTION_POWER: MetricSpec = MetricSpec::labeled_gauge(
    "consumption_power",
    "Solar battery consumption power in watts",
    &["phase"],
);
pub const PRODUCTION_POWER: MetricSpec = MetricSpec::labeled_gauge(
    "production_power",
    "Solar battery production power in watts",
    &["phase"],
);
pub const REMAINING_CHARGE_CAPACITY: MetricSpec = MetricSpec::gauge(
    "remaining_charge_capacity",
    "Remaining charge capacity in watt hours",
);
pub const BATTERY_CHARGING: MetricSpec = MetricSpec::gauge(
    "battery_charging",
    "Whether the battery is charging (1=charging, 0=not charging)",
);
pub const BATTERY_DISCHARGING: MetricSpec = MetricSpec::gauge(
    "battery_discharging",
    "Whether the battery is discharging (1=discharging, 0=not discharging)",
);
pub const OPERATING_MODE: MetricSpec = MetricSpec::labeled_gauge(
    "operating_mode",
    "Operating mode set on the system (value is always 1)",
    &["mode"],
);

// Power meter metrics
pub const CONSUMPTION_ENERGY: MetricSpec = MetricSpec::counter(
    "consumption_energy_total",
    "Total consumption measured in kwH",
);
pub const PRODUCTION_ENERGY: MetricSpec = MetricSpec::counter(
    "production_energy_total",
    "Total production measured in kwH",
);

// Latest data metrics
pub const LAST_FULLY_CHARGED: MetricSpec = MetricSpec::gauge(
    "last_fully_charged_unix_timestamp",
    "Timestamp of last full charge",
);
pub const FULL_CHARGE_CAPACITY: MetricSpec = MetricSpec::gauge(
    "full_charge_capacity",
    "Full charge capacity in watt hours",
);

// Battery module metrics
pub const BATTERY_CYCLE_COUNT: MetricSpec =
    MetricSpec::gauge("cycle_count", "Cycle count of battery module");
pub const BATTERY_MAXIMUM_CELL_TEMPERATURE: MetricSpec = MetricSpec::gauge(
    "maximum_cell_temperature",
    "Maximum cell temperature of battery",
);
pub const BATTERY_MAXIMUM_CELL_VOLTAGE: MetricSpec =
    MetricSpec::gauge("maximum_cell_voltage", "Maximum cell voltage of battery");
pub const BATTERY_MAXIMUM_MODULE_CURRENT: MetricSpec =
    MetricSpec::gauge("maximum_module_current", "Maximum module current of battery");
pub const BATTERY_MAXIMUM_MODULE_DC_VOLTAGE: MetricSpec = MetricSpec::gauge(
    "maximum_module_dc_voltage",
    "Maximum module DC voltage of battery",
);
pub const BATTERY_MINIMUM_CELL_TEMPERATURE: MetricSpec = MetricSpec::gauge(
    "minimum_cell_temperature",
    "Minimum cell temperature of battery",
);
pub const BATTERY_MINIMUM_CELL_VOLTAGE: MetricSpec =
    MetricSpec::gauge("minimum_cell_voltage", "Minimum cell voltage of battery");
pub const BATTERY_MINIMUM_MODULE_CURRENT: MetricSpec =
    MetricSpec::gauge("minimum_module_current", "Minimum module current of battery");
pub const BATTERY_MINIMUM_MODULE_DC_VOLTAGE: MetricSpec = MetricSpec::gauge(
    "minimum_module_dc_voltage",
    "Minimum module DC voltage of battery",
);
pub const BATTERY_RELATIVE_STATE_OF_CHARGE: MetricSpec = MetricSpec::gauge(
    "relative_state_of_charge",
    "Relative state of charge of battery",
);
pub const BATTERY_REMAINING_CAPACITY: MetricSpec =
    MetricSpec::gauge("remaining_capacity", "Remaining capacity of battery");
pub const BATTERY_SYSTEM_ALARM: MetricSpec =
    MetricSpec::gauge("system_alarm", "System alarm status of battery");
pub const BATTERY_SYSTEM_CURRENT: MetricSpec =
    MetricSpec::gauge("system_current", "System current of battery");
pub const BATTERY_SYSTEM_VOLTAGE: MetricSpec =
    MetricSpec::gauge("system_voltage", "System voltage of battery");
pub const BATTERY_SYSTEM_DC_VOLTAGE: MetricSpec =
    MetricSpec::gauge("system_dc_voltage", "System DC voltage of battery");
pub const BATTERY_SYSTEM_STATUS: MetricSpec =
    MetricSpec::gauge("system_status", "System status of battery");
pub const BATTERY_SYSTEM_WARNING: MetricSpec =
    MetricSpec::gauge("system_warning", "System warning status of battery");

// Exporter metrics
pub const SCRAPE_COLLECTOR_SUCCESS: MetricSpec = MetricSpec::labeled_gauge(
    "scrape_collector_success",
    "Whether the last fetch of a metric group succeeded (1=success, 0=failure)",
    &["collector"],
);
pub const BUILD_INFO: MetricSpec = MetricSpec::labeled_gauge(
    "exporter_build_info",
    "Exporter build information (value is always 1)",
    &["version"],
);

/// Every metric the exporter can emit
pub const ALL_METRICS: &[MetricSpec] = &[
    GRID_VOLTAGE,
    GRID_FREQUENCY,
    CHARGE_PERCENT,
    USABLE_CHARGE_PERCENT,
    CONSUMPTION_POWER,
    PRODUCTION_POWER,
    REMAINING_CHARGE_CAPACITY,
    BATTERY_CHARGING,
    BATTERY_DISCHARGING,
    OPERATING_MODE,
    CONSUMPTION_ENERGY,
    PRODUCTION_ENERGY,
    LAST_FULLY_CHARGED,
    FULL_CHARGE_CAPACITY,
    BATTERY_CYCLE_COUNT,
    BATTERY_MAXIMUM_CELL_TEMPERATURE,
    BATTERY_MAXIMUM_CELL_VOLTAGE,
    BATTERY_MAXIMUM_MODULE_CURRENT,
    BATTERY_MAXIMUM_MODULE_DC_VOLTAGE,
    BATTERY_MINIMUM_CELL_TEMPERATURE,
    BATTERY_MINIMUM_CELL_VOLTAGE,
    BATTERY_MINIMUM_MODULE_CURRENT,
    BATTERY_MINIMUM_MODULE_DC_VOLTAGE,
    BATTERY_RELATIVE_STATE_OF_CHARGE,
    BATTERY_REMAINING_CAPACITY,
    BATTERY_SYSTEM_ALARM,
    BATTERY_SYSTEM_CURRENT,
    BATTERY_SYSTEM_VOLTAGE,
    BATTERY_SYSTEM_DC_VOLTAGE,
    BATTERY_SYSTEM_STATUS,
    BATTERY_SYSTEM_WARNING,
    SCRAPE_COLLECTOR_SUCCESS,
    BUILD_INFO,
];

/// Validated set of metric descriptors, built once at startup
#[derive(Debug, Clone, Copy)]
pub struct MetricsCatalog {
    specs: &'static [MetricSpec],
}

impl MetricsCatalog {
    pub fn new() -> Result<Self> {
        Self::from_specs(ALL_METRICS)
    }

    /// Validates the descriptors by registering them once, which rejects invalid
    /// names, invalid label names and duplicates.
    pub fn from_specs(specs: &'static [MetricSpec]) -> Result<Self> {
        let catalog = Self { specs };
        catalog.registry()?;
        Ok(catalog)
    }

    pub fn specs(&self) -> &'static [MetricSpec] {
        self.specs
    }

    /// Creates an empty registry for a single scrape
    pub fn registry(&self) -> Result<ScrapeRegistry> {
        let registry = Registry::new();
        let mut families = HashMap::with_capacity(self.specs.len());

        for spec in self.specs {
            let family = match spec.kind {
                MetricKind::Gauge => {
                    let vec = GaugeVec::new(spec.opts(), spec.labels)?;
                    registry.register(Box::new(vec.clone()))?;
                    Family::Gauge(vec)
                }
                MetricKind::Counter => {
                    let vec = CounterVec::new(spec.opts(), spec.labels)?;
                    registry.register(Box::new(vec.clone()))?;
                    Family::Counter(vec)
                }
            };
            families.insert(spec.name, family);
        }

        Ok(ScrapeRegistry { registry, families })
    }
}

enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

/// Samples gathered during one scrape
pub struct ScrapeRegistry {
    registry: Registry,
    families: HashMap<&'static str, Family>,
}

impl ScrapeRegistry {
    /// Records `value` for the series identified by `spec` and `labels`.
    ///
    /// Counters are set to `value` rather than incremented, since the appliance
    /// already reports the running total. Negative counter values are rejected.
    pub fn set(&self, spec: &MetricSpec, labels: &[&str], value: f64) -> Result<()> {
        let family = self.families.get(spec.name).ok_or_else(|| {
            ExporterError::Metrics(prometheus::Error::Msg(format!(
                "metric {} is not part of the catalog",
                spec.fq_name()
            )))
        })?;

        match family {
            Family::Gauge(vec) => vec.get_metric_with_label_values(labels)?.set(value),
            Family::Counter(vec) => {
                if value < 0.0 {
                    return Err(ExporterError::Metrics(prometheus::Error::Msg(format!(
                        "counter {} cannot take negative value {}",
                        spec.fq_name(),
                        value
                    ))));
                }
                let counter = vec.get_metric_with_label_values(labels)?;
                counter.reset();
                counter.inc_by(value);
            }
        }

        Ok(())
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| ExporterError::Metrics(prometheus::Error::Msg(e.to_string())))
    }
}
