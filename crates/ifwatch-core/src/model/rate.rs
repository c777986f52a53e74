// ── Derived rate values ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::interface::{InterfaceId, InterfaceMeta};
use super::sample::{CounterFamily, Counters};

/// One interface's averaged counter rates.
///
/// Rates are per collection interval, not per second: the mean of the
/// strictly positive deltas between consecutive samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub interface_id: InterfaceId,
    /// Average delta per family. A family with no usable delta is `0.0`.
    pub rates: BTreeMap<CounterFamily, f64>,
    /// Sum of the family averages.
    pub combined_rate: f64,
    /// Samples handed to the engine. Below 2 means "no history yet".
    pub sample_count_used: usize,
    /// Raw counters of the newest sample, for display.
    pub latest_counters: Counters,
    pub latest_timestamp: Option<DateTime<Utc>>,
    /// Adjacent samples that shared a timestamp.
    #[serde(default)]
    pub timestamp_anomalies: usize,
}

impl RateRecord {
    /// A zero-rate record for an interface without enough history.
    pub fn empty(interface_id: InterfaceId, families: &[CounterFamily]) -> Self {
        Self {
            interface_id,
            rates: families.iter().map(|&f| (f, 0.0)).collect(),
            combined_rate: 0.0,
            sample_count_used: 0,
            latest_counters: Counters::default(),
            latest_timestamp: None,
            timestamp_anomalies: 0,
        }
    }

    /// Average rate of one family, `0.0` when not computed.
    pub fn rate(&self, family: CounterFamily) -> f64 {
        self.rates.get(&family).copied().unwrap_or(0.0)
    }

    /// Whether at least one delta could be formed.
    pub fn has_history(&self) -> bool {
        self.sample_count_used >= 2
    }
}

/// Latest utilization of one interface. No averaging involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationReading {
    pub interface_id: InterfaceId,
    pub in_utilization: f64,
    pub out_utilization: f64,
    /// `max(in, out)`, the ranking key.
    pub max_utilization: f64,
    pub timestamp: DateTime<Utc>,
}

/// A ranked metric joined with its interface metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry<T> {
    pub interface: InterfaceMeta,
    pub metric: T,
}

/// Entry of the error-rate ranking.
pub type ErrorRateEntry = RankedEntry<RateRecord>;

/// Entry of the utilization ranking.
pub type UtilizationEntry = RankedEntry<UtilizationReading>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_has_zero_rates() {
        let id = InterfaceId::new(1).unwrap();
        let record = RateRecord::empty(id, &CounterFamily::ERRORS);

        assert_eq!(record.rates.len(), 2);
        assert!(record.rate(CounterFamily::InErrors).abs() < f64::EPSILON);
        assert!(record.rate(CounterFamily::InOctets).abs() < f64::EPSILON);
        assert!(!record.has_history());
    }
}
