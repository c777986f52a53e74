// ── Domain model ──
//
// Raw samples as the engine sees them, and the derived values it hands
// back. Everything derived is recomputed per query; nothing here is
// persisted by the engine.

pub mod interface;
pub mod inventory;
pub mod rate;
pub mod sample;
pub mod series;

// ── Re-exports ──────────────────────────────────────────────────────

pub use interface::{DeviceId, InterfaceId, InterfaceMeta};
pub use inventory::{
    Device, InterfaceOverview, InterfaceStatus, ModuleThresholds, ThresholdLevel, TransceiverModule,
};
pub use rate::{ErrorRateEntry, RankedEntry, RateRecord, UtilizationEntry, UtilizationReading};
pub use sample::{CounterFamily, CounterSample, Counters, GaugeSample, Gauges};
pub use series::{RateSeries, SeriesReport, TimedRateSample};
