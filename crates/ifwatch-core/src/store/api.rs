// ── HTTP-backed sample store ──

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ifwatch_api::{
    InterfaceStatusRequest, LatestSamplesRequest, StoreClient, TlsMode, TransportConfig,
};
use tracing::debug;

use super::{InventoryStore, LatestSamples, MetadataLookup, SampleStore, latest_per_interface};
use crate::config::{StoreConfig, TlsVerification};
use crate::convert::{convert_rows, status_entry};
use crate::error::CoreError;
use crate::model::{
    CounterSample, Device, GaugeSample, InterfaceId, InterfaceMeta, InterfaceStatus,
};

/// A [`SampleStore`] backed by the telemetry sample service.
pub struct ApiStore {
    client: StoreClient,
}

impl ApiStore {
    /// Build the HTTP client described by `config`.
    pub fn connect(config: &StoreConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_mode(&config.tls),
            timeout: config.timeout,
            api_key: config.api_key.clone(),
        };
        let client = StoreClient::new(config.url.clone(), &transport)?;
        debug!(url = %config.url, "sample store client ready");
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: StoreClient) -> Self {
        Self { client }
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

impl SampleStore for ApiStore {
    async fn interface_ids(&self) -> Result<Vec<InterfaceId>, CoreError> {
        let raw = self.client.interface_ids().await?;
        raw.into_iter()
            .map(|id| {
                InterfaceId::new(id).map_err(|_| CoreError::StoreUnavailable {
                    reason: format!("malformed interface id {id} in id listing"),
                    status: None,
                    transient: false,
                })
            })
            .collect()
    }

    async fn fetch_latest(
        &self,
        ids: &[InterfaceId],
        limit: usize,
        since: DateTime<Utc>,
    ) -> Result<LatestSamples, CoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let request = LatestSamplesRequest {
            interface_ids: ids.iter().map(|id| id.get()).collect(),
            limit: u32::try_from(limit)
                .map_err(|_| CoreError::invalid("limit", format!("{limit} is too large")))?,
            since,
        };
        let rows: Vec<CounterSample> = convert_rows(self.client.latest_samples(&request).await?)?;
        debug!(
            interfaces = ids.len(),
            rows = rows.len(),
            "fetched latest samples"
        );

        // The service bounds rows per interface, but its ordering is not
        // guaranteed; regroup and re-trim locally.
        Ok(latest_per_interface(rows, ids, limit, since))
    }

    async fn fetch_window(
        &self,
        id: InterfaceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CounterSample>, CoreError> {
        let rows = self.client.samples_window(id.get(), from, to).await?;
        let mut samples: Vec<CounterSample> = convert_rows(rows)?;
        samples.sort_by_key(|s| s.timestamp);
        Ok(samples)
    }

    async fn fetch_gauge_window(
        &self,
        id: InterfaceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<GaugeSample>, CoreError> {
        let rows = self.client.readings_window(id.get(), from, to).await?;
        let mut readings: Vec<GaugeSample> = convert_rows(rows)?;
        readings.sort_by_key(|r| r.timestamp);
        Ok(readings)
    }
}

impl MetadataLookup for ApiStore {
    async fn interface_meta(&self, id: InterfaceId) -> Result<Option<InterfaceMeta>, CoreError> {
        self.client
            .interface(id.get())
            .await?
            .map(InterfaceMeta::try_from)
            .transpose()
    }
}

impl InventoryStore for ApiStore {
    async fn devices(&self) -> Result<Vec<Device>, CoreError> {
        convert_rows(self.client.devices().await?)
    }

    async fn interfaces(&self) -> Result<Vec<InterfaceMeta>, CoreError> {
        convert_rows(self.client.interfaces().await?)
    }

    async fn interface_status(
        &self,
        ids: &[InterfaceId],
    ) -> Result<HashMap<InterfaceId, InterfaceStatus>, CoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let request = InterfaceStatusRequest {
            interface_ids: ids.iter().map(|id| id.get()).collect(),
        };
        let rows = self.client.interface_status(&request).await?;
        debug!(interfaces = ids.len(), rows = rows.len(), "fetched interface status");

        // Drop anything the service returned that was not asked for.
        let mut status = HashMap::with_capacity(rows.len());
        for row in rows {
            let (id, entry) = status_entry(row)?;
            if ids.contains(&id) {
                status.insert(id, entry);
            }
        }
        Ok(status)
    }
}
