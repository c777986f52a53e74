// ── Top-N per group ──

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::LatestSamples;
use crate::model::{CounterSample, InterfaceId};

/// Keep the newest `limit` samples per requested interface.
///
/// Single pass over `rows` in any order: rows outside `ids` or older than
/// `since` are skipped, the rest are grouped by interface, then each group
/// is sorted newest first and truncated. Every requested id appears in
/// the result, possibly with an empty vector.
pub fn latest_per_interface<I>(
    rows: I,
    ids: &[InterfaceId],
    limit: usize,
    since: DateTime<Utc>,
) -> LatestSamples
where
    I: IntoIterator<Item = CounterSample>,
{
    let mut groups: HashMap<InterfaceId, Vec<CounterSample>> =
        ids.iter().map(|&id| (id, Vec::new())).collect();

    for row in rows {
        if row.timestamp < since {
            continue;
        }
        if let Some(group) = groups.get_mut(&row.interface_id) {
            group.push(row);
        }
    }

    for group in groups.values_mut() {
        // Stable sort: rows sharing a timestamp keep their arrival order.
        group.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        group.truncate(limit);
    }

    groups
}
