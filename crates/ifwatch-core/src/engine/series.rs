// ── Charting series (clamp policy) ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use strum::IntoEnumIterator;
use tracing::warn;

use crate::model::{CounterFamily, CounterSample, GaugeSample, RateSeries, TimedRateSample};

/// Per-second rates for charting, merged with transceiver readings.
///
/// Both inputs must be ascending by timestamp. Each adjacent pair of
/// counter samples produces a point at the later timestamp; a counter
/// decrease is clamped to a zero rate rather than dropped, so the chart
/// keeps a point across a reset. Pairs whose timestamps do not advance
/// are skipped. Gauge readings pass through untouched and merge with a
/// counter-derived point sharing their timestamp.
pub fn build_series(counters: &[CounterSample], gauges: &[GaugeSample]) -> RateSeries {
    let mut points: BTreeMap<DateTime<Utc>, TimedRateSample> = BTreeMap::new();

    for reading in gauges {
        points
            .entry(reading.timestamp)
            .or_insert_with(|| TimedRateSample::new(reading.timestamp))
            .gauges
            .merge(&reading.gauges);
    }

    for pair in counters.windows(2) {
        let [previous, current] = pair else {
            continue;
        };

        let Some(dt) = elapsed_secs(previous.timestamp, current.timestamp) else {
            warn!(
                interface = %current.interface_id,
                previous = %previous.timestamp,
                current = %current.timestamp,
                "skipping counter pair with non-advancing timestamp"
            );
            continue;
        };

        let point = points
            .entry(current.timestamp)
            .or_insert_with(|| TimedRateSample::new(current.timestamp));

        for family in CounterFamily::iter() {
            let (Some(prev), Some(cur)) =
                (previous.counters.get(family), current.counters.get(family))
            else {
                continue;
            };
            let delta = cur.saturating_sub(prev);
            point
                .rates
                .insert(family, to_f64(delta) * family.series_scale() / dt);
        }
        point.gauges.merge(&current.gauges);
    }

    RateSeries::from_points(points.into_values().collect())
}

/// Seconds from `from` to `to` at millisecond precision, `None` unless
/// strictly positive.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn elapsed_secs(from: DateTime<Utc>, to: DateTime<Utc>) -> Option<f64> {
    let millis = (to - from).num_milliseconds();
    (millis > 0).then(|| millis as f64 / 1000.0)
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn to_f64(delta: u64) -> f64 {
    delta as f64
}
