// ── Charting series ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::interface::InterfaceId;
use super::inventory::ModuleThresholds;
use super::sample::{CounterFamily, Gauges};

/// One point of a charting series.
///
/// `rates` holds per-second rates (octet families in Mbps) and is empty
/// for points that only carry gauge readings. Missing values stay absent;
/// they are never filled with zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedRateSample {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rates: BTreeMap<CounterFamily, f64>,
    #[serde(default)]
    pub gauges: Gauges,
}

impl TimedRateSample {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            rates: BTreeMap::new(),
            gauges: Gauges::default(),
        }
    }

    pub fn rate(&self, family: CounterFamily) -> Option<f64> {
        self.rates.get(&family).copied()
    }
}

/// A finished charting series, ascending by timestamp.
///
/// Recomputed from raw samples on every query; iterate it as often as
/// needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateSeries(Vec<TimedRateSample>);

impl RateSeries {
    pub(crate) fn from_points(points: Vec<TimedRateSample>) -> Self {
        Self(points)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedRateSample> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[TimedRateSample] {
        &self.0
    }

    pub fn into_points(self) -> Vec<TimedRateSample> {
        self.0
    }
}

impl IntoIterator for RateSeries {
    type Item = TimedRateSample;
    type IntoIter = std::vec::IntoIter<TimedRateSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RateSeries {
    type Item = &'a TimedRateSample;
    type IntoIter = std::slice::Iter<'a, TimedRateSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A series together with the window it covers and the limits of the
/// interface's transceiver, for drawing alarm and warning bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub interface_id: InterfaceId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Absent when no module is known for the interface.
    pub thresholds: Option<ModuleThresholds>,
    pub points: RateSeries,
}
