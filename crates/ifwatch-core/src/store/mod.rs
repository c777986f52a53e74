// ── Sample store boundary ──
//
// The engine never reads samples on its own; it asks a `SampleStore`.
// Implementations do pure data access: no rates, no ranking.

mod api;
mod group;
mod memory;
mod snapshot;

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::model::{
    CounterSample, Device, GaugeSample, InterfaceId, InterfaceMeta, InterfaceStatus,
};

pub use api::ApiStore;
pub use group::latest_per_interface;
pub use memory::MemoryStore;
pub use snapshot::Snapshot;

/// Newest-first samples per interface, as returned by a batch fetch.
pub type LatestSamples = HashMap<InterfaceId, Vec<CounterSample>>;

/// Async access to raw interface samples.
///
/// Every failure surfaces as [`CoreError::StoreUnavailable`]; a failed
/// batch fails the whole request.
pub trait SampleStore: Send + Sync {
    /// Every interface that may appear in a ranking.
    fn interface_ids(&self) -> impl Future<Output = Result<Vec<InterfaceId>, CoreError>> + Send;

    /// The newest `limit` samples per interface, no older than `since`.
    ///
    /// One round trip for the whole batch. Each returned sequence is
    /// newest first. Every requested id is present in the result; ids
    /// without rows map to an empty vector.
    fn fetch_latest(
        &self,
        ids: &[InterfaceId],
        limit: usize,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<LatestSamples, CoreError>> + Send;

    /// Counter samples of one interface with `from <= timestamp <= to`,
    /// oldest first.
    fn fetch_window(
        &self,
        id: InterfaceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<CounterSample>, CoreError>> + Send;

    /// Transceiver readings of one interface with `from <= timestamp <= to`,
    /// oldest first.
    fn fetch_gauge_window(
        &self,
        id: InterfaceId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<GaugeSample>, CoreError>> + Send;
}

/// Static interface metadata, joined onto ranked results.
pub trait MetadataLookup: Send + Sync {
    /// `None` when the interface is unknown.
    fn interface_meta(
        &self,
        id: InterfaceId,
    ) -> impl Future<Output = Result<Option<InterfaceMeta>, CoreError>> + Send;
}

/// Device and interface inventory with each interface's latest status.
pub trait InventoryStore: Send + Sync {
    fn devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    /// Metadata of every known interface.
    fn interfaces(&self) -> impl Future<Output = Result<Vec<InterfaceMeta>, CoreError>> + Send;

    /// Newest sample, reading, and module per interface.
    ///
    /// One round trip for the whole batch. Ids the store knows nothing
    /// about are absent from the result.
    fn interface_status(
        &self,
        ids: &[InterfaceId],
    ) -> impl Future<Output = Result<HashMap<InterfaceId, InterfaceStatus>, CoreError>> + Send;
}
