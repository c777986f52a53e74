// ── Monitor ──
//
// The query facade. Validates arguments, picks defaults from
// `EngineConfig`, and drives the engine against a store. Holds no state
// between calls beyond the store handle and configuration.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::{self, InterfaceQuery, RankQuery};
use crate::error::CoreError;
use crate::model::{
    CounterFamily, Device, ErrorRateEntry, InterfaceId, InterfaceOverview, RateSeries,
    SeriesReport, UtilizationEntry,
};
use crate::store::{InventoryStore, MetadataLookup, SampleStore};

/// Read-only interface telemetry queries over a sample store.
pub struct Monitor<S> {
    store: S,
    config: EngineConfig,
}

impl<S> Monitor<S>
where
    S: SampleStore + MetadataLookup,
{
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Rankings ─────────────────────────────────────────────────────

    /// Interfaces with the highest combined error rate
    /// (`in_errors` + `out_errors`).
    ///
    /// `limit` defaults to `EngineConfig::top_errors_limit`.
    pub async fn top_error_rates(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ErrorRateEntry>, CoreError> {
        self.top_error_rates_as_of(limit, Utc::now()).await
    }

    /// [`top_error_rates`](Self::top_error_rates) with the recency window
    /// anchored at `now`.
    pub async fn top_error_rates_as_of(
        &self,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ErrorRateEntry>, CoreError> {
        let k = positive_limit(limit, self.config.top_errors_limit)?;
        let ids = self.store.interface_ids().await?;
        let query = RankQuery {
            families: &CounterFamily::ERRORS,
            k,
            sample_limit: self.config.sample_limit,
            since: self.window_start(now)?,
        };
        engine::rank_error_rates(&self.store, &self.store, &ids, query).await
    }

    /// Interfaces with the highest utilization in either direction,
    /// judged on their newest sample.
    ///
    /// `limit` defaults to `EngineConfig::top_utilization_limit`.
    pub async fn top_utilization(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<UtilizationEntry>, CoreError> {
        self.top_utilization_as_of(limit, Utc::now()).await
    }

    pub async fn top_utilization_as_of(
        &self,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Vec<UtilizationEntry>, CoreError> {
        let k = positive_limit(limit, self.config.top_utilization_limit)?;
        let ids = self.store.interface_ids().await?;
        let since = self.window_start(now)?;
        engine::rank_utilization(&self.store, &self.store, &ids, k, since).await
    }

    /// Oldest sample timestamp admitted by the recency window.
    fn window_start(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, CoreError> {
        now.checked_sub_signed(self.config.recency_window)
            .ok_or_else(|| {
                CoreError::invalid(
                    "recency window",
                    format!(
                        "{} hours before {now} is out of range",
                        self.config.recency_window.num_hours()
                    ),
                )
            })
    }

    // ── Series ───────────────────────────────────────────────────────

    /// Per-second rate series of one interface over `[start, end]`,
    /// merged with its transceiver readings.
    pub async fn series(
        &self,
        id: InterfaceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<RateSeries, CoreError> {
        if start > end {
            return Err(CoreError::invalid(
                "time range",
                format!("start {start} is after end {end}"),
            ));
        }

        let (counters, gauges) = tokio::try_join!(
            self.store.fetch_window(id, start, end),
            self.store.fetch_gauge_window(id, start, end),
        )?;
        debug!(
            counter_samples = counters.len(),
            gauge_samples = gauges.len(),
            "building series"
        );

        Ok(engine::build_series(&counters, &gauges))
    }
}

fn positive_limit(requested: Option<usize>, default: usize) -> Result<usize, CoreError> {
    match requested.unwrap_or(default) {
        0 => Err(CoreError::invalid("limit", "must be at least 1")),
        k => Ok(k),
    }
}

// ── Inventory ────────────────────────────────────────────────────────

impl<S> Monitor<S>
where
    S: SampleStore + MetadataLookup + InventoryStore,
{
    /// Every known device, by hostname then id.
    pub async fn devices(&self) -> Result<Vec<Device>, CoreError> {
        let mut devices = self.store.devices().await?;
        devices.sort_by(|a, b| a.hostname.cmp(&b.hostname).then(a.id.cmp(&b.id)));
        Ok(devices)
    }

    /// Interfaces joined with their latest status, filtered and sorted.
    ///
    /// A device filter naming an unknown device is an error rather than
    /// an empty listing.
    pub async fn search_interfaces(
        &self,
        query: &InterfaceQuery,
    ) -> Result<Vec<InterfaceOverview>, CoreError> {
        if let Some(device) = query.device {
            let devices = self.store.devices().await?;
            if !devices.iter().any(|d| d.id == device) {
                return Err(CoreError::not_found("device", device));
            }
        }

        let interfaces = self.store.interfaces().await?;
        let ids: Vec<InterfaceId> = interfaces.iter().map(|m| m.id).collect();
        let mut status = self.store.interface_status(&ids).await?;
        debug!(
            interfaces = interfaces.len(),
            with_status = status.len(),
            "joined interface status"
        );

        let rows = interfaces
            .into_iter()
            .map(|interface| InterfaceOverview {
                status: status.remove(&interface.id).unwrap_or_default(),
                interface,
            })
            .collect();
        Ok(engine::filter_interfaces(rows, query))
    }

    /// One interface with its newest sample, reading, and module.
    pub async fn interface(&self, id: InterfaceId) -> Result<InterfaceOverview, CoreError> {
        let interface = self
            .store
            .interface_meta(id)
            .await?
            .ok_or_else(|| CoreError::not_found("interface", id))?;
        let status = self
            .store
            .interface_status(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(InterfaceOverview { interface, status })
    }

    /// [`series`](Self::series) together with the window and the
    /// interface's transceiver limits.
    pub async fn series_report(
        &self,
        id: InterfaceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SeriesReport, CoreError> {
        let ids = [id];
        let (points, mut status) =
            tokio::try_join!(self.series(id, start, end), self.store.interface_status(&ids))?;
        let thresholds = status
            .remove(&id)
            .and_then(|s| s.module)
            .map(|m| m.thresholds);

        Ok(SeriesReport {
            interface_id: id,
            start,
            end,
            thresholds,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_rejects_zero() {
        assert_eq!(positive_limit(None, 20).ok(), Some(20));
        assert_eq!(positive_limit(Some(3), 20).ok(), Some(3));
        assert!(
            positive_limit(Some(0), 20)
                .err()
                .is_some_and(|e| e.is_invalid_argument())
        );
    }
}
