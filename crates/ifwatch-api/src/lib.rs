// ifwatch-api: Async Rust client for the telemetry sample service.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::StoreClient;
pub use error::Error;
pub use models::{
    DeviceRecord, InterfaceRecord, InterfaceStatusRequest, InterfaceStatusRow, LatestSamplesRequest,
    ModuleRow, ReadingRow, SampleRow,
};
pub use transport::{TlsMode, TransportConfig};
