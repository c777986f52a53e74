//! Rate-derivation engine for network interface telemetry.
//!
//! Turns cumulative, occasionally resetting interface counters into
//! per-collection and per-second rates:
//!
//! - **[`SampleStore`] / [`MetadataLookup`]**: async access to raw samples
//!   and static interface metadata. [`MemoryStore`] keeps rows in memory
//!   (tests, JSON snapshots); [`ApiStore`] talks to the sample service
//!   through `ifwatch-api`.
//!
//! - **Rate engine** ([`engine::rate`]): averages strictly positive
//!   counter deltas per family, discarding deltas across a counter reset.
//!
//! - **Ranking** ([`engine::ranking`]): batch fetch, rate every candidate,
//!   keep the top K by combined rate, then join metadata for the survivors
//!   only.
//!
//! - **Series builder** ([`engine::series`]): per-second rates for
//!   charting, clamping resets to zero and merging transceiver gauges onto
//!   the same time axis.
//!
//! - **Inventory** ([`InventoryStore`], [`engine::search`]): devices,
//!   interfaces with their newest sample, reading, and transceiver
//!   module, and the module's alarm and warning limits.
//!
//! - **[`Monitor`]**: the query facade (`top_error_rates`,
//!   `top_utilization`, `series`, `search_interfaces`, `interface`)
//!   consumed by the CLI.

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod model;
pub mod monitor;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{EngineConfig, StoreConfig, TlsVerification};
pub use error::CoreError;
pub use monitor::Monitor;
pub use engine::{InterfaceQuery, InterfaceSort};
pub use store::{ApiStore, InventoryStore, MemoryStore, MetadataLookup, SampleStore, Snapshot};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CounterFamily, CounterSample, Counters, Device, DeviceId, ErrorRateEntry, GaugeSample, Gauges,
    InterfaceId, InterfaceMeta, InterfaceOverview, InterfaceStatus, ModuleThresholds, RankedEntry,
    RateRecord, RateSeries, SeriesReport, ThresholdLevel, TimedRateSample, TransceiverModule,
    UtilizationEntry, UtilizationReading,
};
