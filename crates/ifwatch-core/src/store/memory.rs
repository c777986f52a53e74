// ── In-memory sample store ──

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use chrono::{DateTime, Utc};

use super::{
    InventoryStore, LatestSamples, MetadataLookup, SampleStore, Snapshot, latest_per_interface,
};
use crate::convert::convert_rows;
use crate::error::CoreError;
use crate::model::{
    CounterSample, Device, DeviceId, GaugeSample, InterfaceId, InterfaceMeta, InterfaceStatus,
    TransceiverModule,
};

/// A [`SampleStore`] over rows held in memory.
///
/// Backs the CLI's `--snapshot` mode and the test suites. Rows may be
/// added in any order; every query sorts what it returns.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    devices: BTreeMap<DeviceId, Device>,
    interfaces: BTreeMap<InterfaceId, InterfaceMeta>,
    samples: Vec<CounterSample>,
    readings: Vec<GaugeSample>,
    modules: Vec<TransceiverModule>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a parsed snapshot.
    ///
    /// A row with an invalid interface id rejects the whole snapshot.
    pub fn from_snapshot(snapshot: Snapshot, origin: &str) -> Result<Self, CoreError> {
        let bad_row = |err: CoreError| CoreError::Snapshot {
            path: origin.to_owned(),
            reason: err.to_string(),
        };

        let devices: Vec<Device> = convert_rows(snapshot.devices).map_err(bad_row)?;
        let interfaces: Vec<InterfaceMeta> = convert_rows(snapshot.interfaces).map_err(bad_row)?;
        Ok(Self {
            devices: devices.into_iter().map(|d| (d.id, d)).collect(),
            interfaces: interfaces.into_iter().map(|m| (m.id, m)).collect(),
            samples: convert_rows(snapshot.samples).map_err(bad_row)?,
            readings: convert_rows(snapshot.readings).map_err(bad_row)?,
            modules: convert_rows(snapshot.modules).map_err(bad_row)?,
        })
    }

    /// Load a JSON snapshot file.
    pub fn load_snapshot(path: &Path) -> Result<Self, CoreError> {
        let snapshot = Snapshot::load(path)?;
        let store = Self::from_snapshot(snapshot, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            devices = store.devices.len(),
            interfaces = store.interfaces.len(),
            samples = store.samples.len(),
            readings = store.readings.len(),
            "loaded snapshot"
        );
        Ok(store)
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_device(mut self, device: Device) -> Self {
        self.devices.insert(device.id, device);
        self
    }

    pub fn with_interface(mut self, meta: InterfaceMeta) -> Self {
        self.interfaces.insert(meta.id, meta);
        self
    }

    pub fn with_sample(mut self, sample: CounterSample) -> Self {
        self.samples.push(sample);
        self
    }

    pub fn with_samples(mut self, samples: impl IntoIterator<Item = CounterSample>) -> Self {
        self.samples.extend(samples);
        self
    }

    pub fn with_readings(mut self, readings: impl IntoIterator<Item = GaugeSample>) -> Self {
        self.readings.extend(readings);
        self
    }

    pub fn with_module(mut self, module: TransceiverModule) -> Self {
        self.modules.push(module);
        self
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl SampleStore for MemoryStore {
    /// Every interface with metadata or at least one sample, ascending.
    async fn interface_ids(&self) -> Result<Vec<InterfaceId>, CoreError> {
        let ids: BTreeSet<InterfaceId> = self
            .interfaces
            .keys()
            .copied()
            .chain(self.samples.iter().map(|s| s.interface_id))
            .collect();
        Ok(ids.into_iter().collect())
    }

    async fn fetch_latest(
        &self,
        ids: &[InterfaceId],
        limit: usize,
        since: DateTime<Utc>,
    ) -> Result<LatestSamples, CoreError> {
        Ok(latest_per_interface(
            self.samples.iter().cloned(),
            ids,
            limit,
            since,
        ))
    }

    async fn fetch_window(
        &self,
        id: InterfaceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CounterSample>, CoreError> {
        let mut rows: Vec<CounterSample> = self
            .samples
            .iter()
            .filter(|s| s.interface_id == id && s.timestamp >= from && s.timestamp <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.timestamp);
        Ok(rows)
    }

    async fn fetch_gauge_window(
        &self,
        id: InterfaceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<GaugeSample>, CoreError> {
        let mut rows: Vec<GaugeSample> = self
            .readings
            .iter()
            .filter(|r| r.interface_id == id && r.timestamp >= from && r.timestamp <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.timestamp);
        Ok(rows)
    }
}

impl MetadataLookup for MemoryStore {
    async fn interface_meta(&self, id: InterfaceId) -> Result<Option<InterfaceMeta>, CoreError> {
        Ok(self.interfaces.get(&id).cloned())
    }
}

impl InventoryStore for MemoryStore {
    async fn devices(&self) -> Result<Vec<Device>, CoreError> {
        Ok(self.devices.values().cloned().collect())
    }

    async fn interfaces(&self) -> Result<Vec<InterfaceMeta>, CoreError> {
        Ok(self.interfaces.values().cloned().collect())
    }

    /// Newest row of each kind. Rows sharing a timestamp resolve to the
    /// one added last.
    async fn interface_status(
        &self,
        ids: &[InterfaceId],
    ) -> Result<HashMap<InterfaceId, InterfaceStatus>, CoreError> {
        fn newer<T>(slot: &mut Option<T>, row: &T, at: impl Fn(&T) -> DateTime<Utc>)
        where
            T: Clone,
        {
            if slot.as_ref().is_none_or(|current| at(current) <= at(row)) {
                *slot = Some(row.clone());
            }
        }

        let mut status: HashMap<InterfaceId, InterfaceStatus> = ids
            .iter()
            .filter(|id| self.interfaces.contains_key(id))
            .map(|&id| (id, InterfaceStatus::default()))
            .collect();

        for sample in &self.samples {
            if let Some(entry) = status.get_mut(&sample.interface_id) {
                newer(&mut entry.latest_sample, sample, |s| s.timestamp);
            }
        }
        for reading in &self.readings {
            if let Some(entry) = status.get_mut(&reading.interface_id) {
                newer(&mut entry.latest_reading, reading, |r| r.timestamp);
            }
        }
        for module in &self.modules {
            if let Some(entry) = status.get_mut(&module.interface_id) {
                newer(&mut entry.module, module, |m| m.timestamp);
            }
        }
        Ok(status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Counters, Gauges};
    use chrono::TimeZone;
    use ifwatch_api::SampleRow;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, minute, 0).unwrap()
    }

    fn id(raw: i64) -> InterfaceId {
        InterfaceId::new(raw).unwrap()
    }

    fn sample(raw: i64, minute: u32) -> CounterSample {
        CounterSample {
            interface_id: id(raw),
            timestamp: at(minute),
            counters: Counters::default(),
            gauges: Gauges::default(),
        }
    }

    #[tokio::test]
    async fn window_is_inclusive_and_ascending() {
        let store = MemoryStore::new().with_samples([
            sample(1, 30),
            sample(1, 10),
            sample(1, 20),
            sample(1, 40),
            sample(2, 20),
        ]);

        let rows = store.fetch_window(id(1), at(10), at(30)).await.unwrap();
        let minutes: Vec<_> = rows.iter().map(|s| s.timestamp).collect();
        assert_eq!(minutes, vec![at(10), at(20), at(30)]);
    }

    #[tokio::test]
    async fn interface_ids_cover_metadata_and_samples() {
        let store = MemoryStore::new()
            .with_interface(InterfaceMeta {
                id: id(5),
                device_id: None,
                name: "et-0/0/0".into(),
                description: None,
                hostname: "core-1".into(),
                address: "10.0.0.5".into(),
                vendor: None,
            })
            .with_sample(sample(2, 0))
            .with_sample(sample(2, 5));

        let ids = store.interface_ids().await.unwrap();
        assert_eq!(ids, vec![id(2), id(5)]);
        assert!(store.interface_meta(id(2)).await.unwrap().is_none());
        assert!(store.interface_meta(id(5)).await.unwrap().is_some());
    }

    #[test]
    fn snapshot_with_bad_id_is_rejected() {
        let snapshot = Snapshot {
            samples: vec![SampleRow {
                interface_id: -1,
                timestamp: at(0),
                in_errors: None,
                out_errors: None,
                in_octets: None,
                out_octets: None,
                in_utilization: None,
                out_utilization: None,
            }],
            ..Snapshot::default()
        };

        let err = MemoryStore::from_snapshot(snapshot, "inline").unwrap_err();
        assert!(matches!(err, CoreError::Snapshot { .. }));
    }

    #[tokio::test]
    async fn status_picks_newest_row_of_each_kind() {
        let meta = InterfaceMeta {
            id: id(1),
            device_id: None,
            name: "xe-0/0/1".into(),
            description: None,
            hostname: "edge-1".into(),
            address: "10.0.0.1".into(),
            vendor: None,
        };
        let module = |minute: u32, serial: &str| TransceiverModule {
            interface_id: id(1),
            timestamp: at(minute),
            vendor_name: Some("FINISAR".into()),
            part_number: None,
            serial_number: Some(serial.into()),
            thresholds: crate::model::ModuleThresholds::default(),
        };
        let store = MemoryStore::new()
            .with_interface(meta)
            .with_samples([sample(1, 10), sample(1, 30), sample(1, 20)])
            .with_module(module(5, "OLD"))
            .with_module(module(25, "NEW"));

        let status = store.interface_status(&[id(1), id(9)]).await.unwrap();
        let entry = &status[&id(1)];

        assert_eq!(entry.latest_sample.as_ref().unwrap().timestamp, at(30));
        assert!(entry.latest_reading.is_none());
        assert_eq!(
            entry.module.as_ref().unwrap().serial_number.as_deref(),
            Some("NEW")
        );
        assert!(!status.contains_key(&id(9)));
    }
}
