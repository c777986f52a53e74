//! Device listing handler.

use tabled::Tabled;

use ifwatch_core::{Device, InventoryStore, MetadataLookup, Monitor, SampleStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Address")]
    address: String,
}

fn to_row(_index: usize, device: &Device) -> DeviceRow {
    DeviceRow {
        id: device.id.get(),
        hostname: device.hostname.clone(),
        address: device.address.clone().unwrap_or_else(|| "-".into()),
    }
}

pub async fn handle<S>(monitor: &Monitor<S>, global: &GlobalOpts) -> Result<(), CliError>
where
    S: SampleStore + MetadataLookup + InventoryStore,
{
    let devices = monitor.devices().await?;

    if devices.is_empty() {
        output::notice(
            "No devices known to the sample store.",
            output::should_color(global.color),
            global.quiet,
        );
    }

    let out = output::render_list(global.output, &devices, to_row, |d| d.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
