// Sample service wire types
//
// Rows mirror the collector's tables: one `SampleRow` per interface
// statistics poll, one `ReadingRow` per transceiver (DDM) poll. Fields use
// `#[serde(default)]` liberally because pollers leave columns empty when a
// device does not report them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Interface statistics ─────────────────────────────────────────────

/// One interface-statistics poll.
///
/// Counters are cumulative since the device's last reset. Exporters that
/// serialize 64-bit counters as decimal strings are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub interface_id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "counter::deserialize")]
    pub in_errors: Option<u64>,
    #[serde(default, deserialize_with = "counter::deserialize")]
    pub out_errors: Option<u64>,
    #[serde(default, deserialize_with = "counter::deserialize")]
    pub in_octets: Option<u64>,
    #[serde(default, deserialize_with = "counter::deserialize")]
    pub out_octets: Option<u64>,
    /// Inbound utilization, percent of link speed.
    #[serde(default, alias = "in_uti")]
    pub in_utilization: Option<f64>,
    /// Outbound utilization, percent of link speed.
    #[serde(default, alias = "out_uti")]
    pub out_utilization: Option<f64>,
}

// ── Transceiver readings ─────────────────────────────────────────────

/// One optical transceiver (DDM) poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRow {
    pub interface_id: i64,
    pub timestamp: DateTime<Utc>,
    /// Receive power, dBm.
    #[serde(default)]
    pub rx_power: Option<f64>,
    /// Transmit power, dBm.
    #[serde(default)]
    pub tx_power: Option<f64>,
    /// Module temperature, °C.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Supply voltage, V.
    #[serde(default)]
    pub voltage: Option<f64>,
    /// Laser bias current, mA.
    #[serde(default)]
    pub bias_current: Option<f64>,
}

// ── Interface metadata ───────────────────────────────────────────────

/// Static interface metadata joined with its owning device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub id: i64,
    /// Owning device, absent in exports that predate the device table.
    #[serde(default)]
    pub device_id: Option<i64>,
    pub interface_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub hostname: String,
    pub ip_address: String,
    #[serde(default)]
    pub vendor: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// One polled network device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: i64,
    pub hostname: String,
    #[serde(default)]
    pub ip_address: Option<String>,
}

// ── Transceiver modules ──────────────────────────────────────────────

/// One transceiver inventory poll: identity plus the module's own DDM
/// alarm and warning thresholds.
///
/// Thresholds are stored as decimals upstream and may arrive as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRow {
    pub interface_id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub vendor_part_number: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub rx_power_high: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub rx_power_low: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub rx_power_high_warning: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub rx_power_low_warning: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub tx_power_high: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub tx_power_low: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub tx_power_high_warning: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub tx_power_low_warning: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub temp_high: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub temp_low: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub volt_high: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub volt_low: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub bias_high: Option<f64>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub bias_low: Option<f64>,
}

/// Newest sample, reading, and module of one interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceStatusRow {
    pub interface_id: i64,
    #[serde(default)]
    pub sample: Option<SampleRow>,
    #[serde(default)]
    pub reading: Option<ReadingRow>,
    #[serde(default)]
    pub module: Option<ModuleRow>,
}

// ── Requests ─────────────────────────────────────────────────────────

/// Body of `POST /api/v1/samples/latest`.
///
/// Asks for the newest `limit` rows per interface, no older than `since`,
/// for every id in `interface_ids`, in a single round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestSamplesRequest {
    pub interface_ids: Vec<i64>,
    pub limit: u32,
    pub since: DateTime<Utc>,
}

/// Body of `POST /api/v1/interfaces/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStatusRequest {
    pub interface_ids: Vec<i64>,
}

// ── Counter decoding ─────────────────────────────────────────────────

mod counter {
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCounter {
        Number(u64),
        Text(String),
    }

    /// Accept `123`, `"123"`, or `null`.
    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawCounter>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawCounter::Number(n)) => Ok(Some(n)),
            Some(RawCounter::Text(s)) => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid counter value {s:?}: {e}"))),
        }
    }
}

mod decimal {
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDecimal {
        Number(f64),
        Text(String),
    }

    /// Accept `-7.5`, `"-7.5"`, or `null`.
    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawDecimal>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawDecimal::Number(n)) => Ok(Some(n)),
            Some(RawDecimal::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid decimal {s:?}: {e}"))),
        }
    }
}
