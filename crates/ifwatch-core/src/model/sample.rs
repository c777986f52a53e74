// ── Raw telemetry samples ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::interface::InterfaceId;

// ── Counter families ────────────────────────────────────────────────

/// A named cumulative counter reported per interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CounterFamily {
    InErrors,
    OutErrors,
    InOctets,
    OutOctets,
}

impl CounterFamily {
    /// Families ranked by the error-rate dashboard.
    pub const ERRORS: [Self; 2] = [Self::InErrors, Self::OutErrors];

    /// Families charted as bandwidth.
    pub const OCTETS: [Self; 2] = [Self::InOctets, Self::OutOctets];

    /// Multiplier applied to a per-second delta when charting.
    ///
    /// Octet counters are charted in megabits per second; error counters
    /// are charted as-is.
    pub fn series_scale(self) -> f64 {
        match self {
            Self::InErrors | Self::OutErrors => 1.0,
            Self::InOctets | Self::OutOctets => 8.0 / 1_000_000.0,
        }
    }

    /// Unit of the charted rate.
    pub fn series_unit(self) -> &'static str {
        match self {
            Self::InErrors | Self::OutErrors => "errors/s",
            Self::InOctets | Self::OutOctets => "Mbps",
        }
    }
}

// ── Counters & gauges ───────────────────────────────────────────────

/// Cumulative counter values of one sample. Absent when not polled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub in_errors: Option<u64>,
    pub out_errors: Option<u64>,
    pub in_octets: Option<u64>,
    pub out_octets: Option<u64>,
}

impl Counters {
    pub fn get(&self, family: CounterFamily) -> Option<u64> {
        match family {
            CounterFamily::InErrors => self.in_errors,
            CounterFamily::OutErrors => self.out_errors,
            CounterFamily::InOctets => self.in_octets,
            CounterFamily::OutOctets => self.out_octets,
        }
    }

    /// Sum of the given families' raw values, treating absent as zero.
    pub fn total(&self, families: &[CounterFamily]) -> u128 {
        families
            .iter()
            .map(|&family| u128::from(self.get(family).unwrap_or(0)))
            .sum()
    }
}

/// Instantaneous readings. Passed through untouched, never differenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Gauges {
    /// Inbound utilization, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_utilization: Option<f64>,
    /// Outbound utilization, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_utilization: Option<f64>,
    /// Optical receive power, dBm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_power: Option<f64>,
    /// Optical transmit power, dBm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<f64>,
    /// Transceiver temperature, °C.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Transceiver supply voltage, V.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    /// Laser bias current, mA.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_current: Option<f64>,
}

impl Gauges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay every reading present in `other`, keeping ours elsewhere.
    pub fn merge(&mut self, other: &Self) {
        fn overlay(slot: &mut Option<f64>, value: Option<f64>) {
            if value.is_some() {
                *slot = value;
            }
        }

        overlay(&mut self.in_utilization, other.in_utilization);
        overlay(&mut self.out_utilization, other.out_utilization);
        overlay(&mut self.rx_power, other.rx_power);
        overlay(&mut self.tx_power, other.tx_power);
        overlay(&mut self.temperature, other.temperature);
        overlay(&mut self.voltage, other.voltage);
        overlay(&mut self.bias_current, other.bias_current);
    }
}

// ── Samples ─────────────────────────────────────────────────────────

/// One interface-statistics observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSample {
    pub interface_id: InterfaceId,
    pub timestamp: DateTime<Utc>,
    pub counters: Counters,
    #[serde(default)]
    pub gauges: Gauges,
}

/// One transceiver observation, sampled independently of the counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeSample {
    pub interface_id: InterfaceId,
    pub timestamp: DateTime<Utc>,
    pub gauges: Gauges,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn family_names_are_snake_case() {
        let names: Vec<String> = CounterFamily::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, ["in_errors", "out_errors", "in_octets", "out_octets"]);
    }

    #[test]
    fn counters_total_ignores_absent_values() {
        let counters = Counters {
            in_errors: Some(u64::MAX),
            out_errors: Some(u64::MAX),
            in_octets: None,
            out_octets: Some(1),
        };
        assert_eq!(
            counters.total(&CounterFamily::ERRORS),
            u128::from(u64::MAX) * 2
        );
        assert_eq!(counters.total(&CounterFamily::OCTETS), 1);
    }

    #[test]
    fn merge_overlays_present_readings_only() {
        let mut base = Gauges {
            rx_power: Some(-7.0),
            temperature: Some(40.0),
            ..Gauges::default()
        };
        base.merge(&Gauges {
            rx_power: Some(-8.5),
            in_utilization: Some(12.0),
            ..Gauges::default()
        });

        assert_eq!(base.rx_power, Some(-8.5));
        assert_eq!(base.temperature, Some(40.0));
        assert_eq!(base.in_utilization, Some(12.0));
        assert!(base.voltage.is_none());
    }

    #[test]
    fn empty_gauges() {
        assert!(Gauges::default().is_empty());
        assert!(
            !Gauges {
                voltage: Some(3.3),
                ..Gauges::default()
            }
            .is_empty()
        );
    }
}
