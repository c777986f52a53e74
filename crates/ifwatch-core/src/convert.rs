// ── Wire-to-domain conversions ──
//
// Sample service rows carry raw `i64` ids. A row whose id is not a valid
// interface id means the service handed back garbage, which is a store
// failure, not a caller error.

use ifwatch_api::{
    DeviceRecord, InterfaceRecord, InterfaceStatusRow, ModuleRow, ReadingRow, SampleRow,
};

use crate::error::CoreError;
use crate::model::{
    CounterSample, Counters, Device, DeviceId, GaugeSample, Gauges, InterfaceId, InterfaceMeta,
    InterfaceStatus, ModuleThresholds, TransceiverModule,
};

fn malformed(what: &str, raw: i64) -> CoreError {
    CoreError::StoreUnavailable {
        reason: format!("malformed row: {what} id {raw} is not positive"),
        status: None,
        transient: false,
    }
}

fn row_id(raw: i64) -> Result<InterfaceId, CoreError> {
    InterfaceId::new(raw).map_err(|_| malformed("interface", raw))
}

fn device_id(raw: i64) -> Result<DeviceId, CoreError> {
    DeviceId::new(raw).map_err(|_| malformed("device", raw))
}

impl TryFrom<SampleRow> for CounterSample {
    type Error = CoreError;

    fn try_from(row: SampleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            interface_id: row_id(row.interface_id)?,
            timestamp: row.timestamp,
            counters: Counters {
                in_errors: row.in_errors,
                out_errors: row.out_errors,
                in_octets: row.in_octets,
                out_octets: row.out_octets,
            },
            gauges: Gauges {
                in_utilization: row.in_utilization,
                out_utilization: row.out_utilization,
                ..Gauges::default()
            },
        })
    }
}

impl TryFrom<ReadingRow> for GaugeSample {
    type Error = CoreError;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            interface_id: row_id(row.interface_id)?,
            timestamp: row.timestamp,
            gauges: Gauges {
                rx_power: row.rx_power,
                tx_power: row.tx_power,
                temperature: row.temperature,
                voltage: row.voltage,
                bias_current: row.bias_current,
                ..Gauges::default()
            },
        })
    }
}

impl TryFrom<InterfaceRecord> for InterfaceMeta {
    type Error = CoreError;

    fn try_from(record: InterfaceRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row_id(record.id)?,
            device_id: record.device_id.map(device_id).transpose()?,
            name: record.interface_name,
            description: record.description.filter(|d| !d.trim().is_empty()),
            hostname: record.hostname,
            address: record.ip_address,
            vendor: record.vendor,
        })
    }
}

impl TryFrom<DeviceRecord> for Device {
    type Error = CoreError;

    fn try_from(record: DeviceRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: device_id(record.id)?,
            hostname: record.hostname,
            address: record.ip_address.filter(|a| !a.trim().is_empty()),
        })
    }
}

impl TryFrom<ModuleRow> for TransceiverModule {
    type Error = CoreError;

    fn try_from(row: ModuleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            interface_id: row_id(row.interface_id)?,
            timestamp: row.timestamp,
            vendor_name: row.vendor_name,
            part_number: row.vendor_part_number,
            serial_number: row.serial_number,
            thresholds: ModuleThresholds {
                rx_power_high: row.rx_power_high,
                rx_power_low: row.rx_power_low,
                rx_power_high_warning: row.rx_power_high_warning,
                rx_power_low_warning: row.rx_power_low_warning,
                tx_power_high: row.tx_power_high,
                tx_power_low: row.tx_power_low,
                tx_power_high_warning: row.tx_power_high_warning,
                tx_power_low_warning: row.tx_power_low_warning,
                temp_high: row.temp_high,
                temp_low: row.temp_low,
                volt_high: row.volt_high,
                volt_low: row.volt_low,
                bias_high: row.bias_high,
                bias_low: row.bias_low,
            },
        })
    }
}

/// Split a status row into its interface id and converted parts.
pub(crate) fn status_entry(
    row: InterfaceStatusRow,
) -> Result<(InterfaceId, InterfaceStatus), CoreError> {
    let status = InterfaceStatus {
        latest_sample: row.sample.map(CounterSample::try_from).transpose()?,
        latest_reading: row.reading.map(GaugeSample::try_from).transpose()?,
        module: row.module.map(TransceiverModule::try_from).transpose()?,
    };
    Ok((row_id(row.interface_id)?, status))
}

/// Convert a batch of rows, failing on the first malformed one.
pub(crate) fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, CoreError>
where
    T: TryFrom<R, Error = CoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}
