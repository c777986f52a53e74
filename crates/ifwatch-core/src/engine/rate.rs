// ── Average counter rate (discard policy) ──

use std::collections::BTreeMap;

use tracing::warn;

use crate::model::{CounterFamily, CounterSample, InterfaceId, RateRecord};

/// Running sum of the retained deltas of one family.
#[derive(Debug, Default, Clone, Copy)]
struct DeltaSum {
    sum: u128,
    count: u64,
}

impl DeltaSum {
    fn push(&mut self, delta: u64) {
        self.sum += u128::from(delta);
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn mean(self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

/// Average per-collection rate of `families` over `samples`.
///
/// `samples` must be ordered newest first, as returned by
/// [`SampleStore::fetch_latest`](crate::store::SampleStore::fetch_latest).
/// For each adjacent pair only strictly positive deltas are retained; a
/// decrease is treated as a counter reset and that one delta is dropped
/// for that family alone. An absent counter reads as zero, so a value
/// appearing after a gap counts in full and a value vanishing is a reset.
///
/// Fewer than two samples is not an error: the record comes back with
/// zero rates and `sample_count_used` set to the number of samples seen.
pub fn compute_average_rate(
    interface_id: InterfaceId,
    samples: &[CounterSample],
    families: &[CounterFamily],
) -> RateRecord {
    let mut record = RateRecord::empty(interface_id, families);
    record.sample_count_used = samples.len();

    let Some(newest) = samples.first() else {
        return record;
    };
    record.latest_counters = newest.counters;
    record.latest_timestamp = Some(newest.timestamp);

    if samples.len() < 2 {
        return record;
    }

    let mut sums: BTreeMap<CounterFamily, DeltaSum> =
        families.iter().map(|&f| (f, DeltaSum::default())).collect();

    // Newest first on input, so walk the pairs from the back.
    for pair in samples.windows(2).rev() {
        let [current, previous] = pair else {
            continue;
        };

        if current.timestamp == previous.timestamp {
            record.timestamp_anomalies += 1;
            warn!(
                interface = %interface_id,
                timestamp = %current.timestamp,
                "adjacent samples share a timestamp"
            );
        }

        for (&family, acc) in &mut sums {
            let prev = previous.counters.get(family).unwrap_or(0);
            let cur = current.counters.get(family).unwrap_or(0);
            match cur.checked_sub(prev) {
                Some(delta) if delta > 0 => acc.push(delta),
                _ => {}
            }
        }
    }

    record.rates = sums.iter().map(|(&f, acc)| (f, acc.mean())).collect();
    record.combined_rate = record.rates.values().sum();
    record
}
