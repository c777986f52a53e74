// ── Devices, transceiver modules, and per-interface status ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use super::interface::{DeviceId, InterfaceId, InterfaceMeta};
use super::sample::{CounterSample, GaugeSample};

// ── Device ──────────────────────────────────────────────────────────

/// A polled network device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub hostname: String,
    /// Management address, when known.
    #[serde(default)]
    pub address: Option<String>,
}

// ── Transceiver thresholds ──────────────────────────────────────────

/// Alarm and warning limits reported by a transceiver module.
///
/// Power limits are in dBm, temperature in °C, voltage in V, bias in mA.
/// A module that does not report a limit leaves it absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleThresholds {
    pub rx_power_high: Option<f64>,
    pub rx_power_low: Option<f64>,
    pub rx_power_high_warning: Option<f64>,
    pub rx_power_low_warning: Option<f64>,
    pub tx_power_high: Option<f64>,
    pub tx_power_low: Option<f64>,
    pub tx_power_high_warning: Option<f64>,
    pub tx_power_low_warning: Option<f64>,
    pub temp_high: Option<f64>,
    pub temp_low: Option<f64>,
    pub volt_high: Option<f64>,
    pub volt_low: Option<f64>,
    pub bias_high: Option<f64>,
    pub bias_low: Option<f64>,
}

/// Where a reading sits relative to its module's limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThresholdLevel {
    Normal,
    Warning,
    Alarm,
}

impl ThresholdLevel {
    /// Classify `value` against alarm and warning bands.
    ///
    /// Limits are exclusive: a reading equal to a limit is still inside it.
    fn classify(
        value: f64,
        high: Option<f64>,
        low: Option<f64>,
        high_warning: Option<f64>,
        low_warning: Option<f64>,
    ) -> Self {
        let above = |limit: Option<f64>| limit.is_some_and(|l| value > l);
        let below = |limit: Option<f64>| limit.is_some_and(|l| value < l);

        if above(high) || below(low) {
            Self::Alarm
        } else if above(high_warning) || below(low_warning) {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

impl ModuleThresholds {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn rx_power_level(&self, dbm: f64) -> ThresholdLevel {
        ThresholdLevel::classify(
            dbm,
            self.rx_power_high,
            self.rx_power_low,
            self.rx_power_high_warning,
            self.rx_power_low_warning,
        )
    }

    pub fn tx_power_level(&self, dbm: f64) -> ThresholdLevel {
        ThresholdLevel::classify(
            dbm,
            self.tx_power_high,
            self.tx_power_low,
            self.tx_power_high_warning,
            self.tx_power_low_warning,
        )
    }

    /// Temperature has alarm limits only.
    pub fn temperature_level(&self, celsius: f64) -> ThresholdLevel {
        ThresholdLevel::classify(celsius, self.temp_high, self.temp_low, None, None)
    }
}

// ── Transceiver module ──────────────────────────────────────────────

/// Inventory record of the optic plugged into an interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransceiverModule {
    pub interface_id: InterfaceId,
    /// When the module was last inventoried.
    pub timestamp: DateTime<Utc>,
    pub vendor_name: Option<String>,
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    #[serde(default)]
    pub thresholds: ModuleThresholds,
}

// ── Status & overview ───────────────────────────────────────────────

/// Most recent observations of one interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceStatus {
    pub latest_sample: Option<CounterSample>,
    pub latest_reading: Option<GaugeSample>,
    pub module: Option<TransceiverModule>,
}

impl InterfaceStatus {
    /// RX power level of the latest reading against the module's limits.
    pub fn rx_power_level(&self) -> Option<ThresholdLevel> {
        let dbm = self.latest_reading.as_ref()?.gauges.rx_power?;
        Some(self.module.as_ref()?.thresholds.rx_power_level(dbm))
    }

    pub fn tx_power_level(&self) -> Option<ThresholdLevel> {
        let dbm = self.latest_reading.as_ref()?.gauges.tx_power?;
        Some(self.module.as_ref()?.thresholds.tx_power_level(dbm))
    }
}

/// Interface metadata joined with its latest status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceOverview {
    pub interface: InterfaceMeta,
    #[serde(flatten)]
    pub status: InterfaceStatus,
}
