// ── Top-K rankings ──
//
// Fetch once, rate every candidate in memory, sort, truncate, and only
// then look up metadata, so lookups scale with K rather than with the
// number of interfaces.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::rate::compute_average_rate;
use crate::error::CoreError;
use crate::model::{
    CounterFamily, ErrorRateEntry, InterfaceId, RankedEntry, UtilizationEntry, UtilizationReading,
};
use crate::store::{MetadataLookup, SampleStore};

/// Parameters of an average-rate ranking pass.
#[derive(Debug, Clone, Copy)]
pub struct RankQuery<'a> {
    /// Families summed into the ranking key.
    pub families: &'a [CounterFamily],
    /// Maximum number of entries returned.
    pub k: usize,
    /// Newest samples per interface fed to the rate engine.
    pub sample_limit: usize,
    /// Samples older than this are ignored.
    pub since: DateTime<Utc>,
}

/// Keep the `k` candidates with the largest strictly positive key.
///
/// Candidates whose key is zero, negative, or NaN are dropped. The sort
/// is stable, so equal keys keep their input order.
pub fn select_top<T, F>(candidates: Vec<T>, k: usize, key: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let mut kept: Vec<T> = candidates.into_iter().filter(|c| key(c) > 0.0).collect();
    kept.sort_by(|a, b| key(b).total_cmp(&key(a)));
    kept.truncate(k);
    kept
}

/// Attach metadata to already-ranked values, one lookup per entry.
///
/// Entries whose interface is unknown to the lookup are dropped.
pub async fn join_metadata<M, T>(
    lookup: &M,
    ranked: Vec<(InterfaceId, T)>,
) -> Result<Vec<RankedEntry<T>>, CoreError>
where
    M: MetadataLookup,
{
    let mut entries = Vec::with_capacity(ranked.len());
    for (id, metric) in ranked {
        match lookup.interface_meta(id).await? {
            Some(interface) => entries.push(RankedEntry { interface, metric }),
            None => warn!(interface = %id, "no metadata for ranked interface, dropping entry"),
        }
    }
    Ok(entries)
}

/// Rank `ids` by combined average rate over `query.families`.
///
/// Interfaces with fewer than two samples, or whose combined rate is not
/// strictly positive, never appear in the output.
pub async fn rank_error_rates<S, M>(
    store: &S,
    lookup: &M,
    ids: &[InterfaceId],
    query: RankQuery<'_>,
) -> Result<Vec<ErrorRateEntry>, CoreError>
where
    S: SampleStore,
    M: MetadataLookup,
{
    let batch = store
        .fetch_latest(ids, query.sample_limit, query.since)
        .await?;

    let candidates: Vec<_> = ids
        .iter()
        .map(|&id| {
            let samples = batch.get(&id).map_or(&[][..], Vec::as_slice);
            compute_average_rate(id, samples, query.families)
        })
        .filter(|record| record.has_history())
        .collect();
    let rated = candidates.len();

    let top = select_top(candidates, query.k, |r| r.combined_rate);
    debug!(
        candidates = ids.len(),
        rated,
        kept = top.len(),
        "ranked average rates"
    );

    join_metadata(lookup, top.into_iter().map(|r| (r.interface_id, r)).collect()).await
}

/// Rank `ids` by `max(in, out)` utilization of their newest sample.
///
/// No rate math: only the single newest sample matters. Absent readings
/// count as zero, so interfaces with no utilization reported are omitted.
pub async fn rank_utilization<S, M>(
    store: &S,
    lookup: &M,
    ids: &[InterfaceId],
    k: usize,
    since: DateTime<Utc>,
) -> Result<Vec<UtilizationEntry>, CoreError>
where
    S: SampleStore,
    M: MetadataLookup,
{
    let batch = store.fetch_latest(ids, 1, since).await?;

    let candidates: Vec<UtilizationReading> = ids
        .iter()
        .filter_map(|id| batch.get(id).and_then(|samples| samples.first()))
        .map(|newest| {
            let in_utilization = newest.gauges.in_utilization.unwrap_or(0.0);
            let out_utilization = newest.gauges.out_utilization.unwrap_or(0.0);
            UtilizationReading {
                interface_id: newest.interface_id,
                in_utilization,
                out_utilization,
                max_utilization: in_utilization.max(out_utilization),
                timestamp: newest.timestamp,
            }
        })
        .collect();

    let top = select_top(candidates, k, |r| r.max_utilization);
    debug!(
        candidates = ids.len(),
        kept = top.len(),
        "ranked utilization"
    );

    join_metadata(lookup, top.into_iter().map(|r| (r.interface_id, r)).collect()).await
}
