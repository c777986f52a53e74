//! Interface listing, search, and detail handlers.

use tabled::Tabled;

use ifwatch_core::{
    DeviceId, InterfaceId, InterfaceOverview, InterfaceQuery, InterfaceSort, InventoryStore,
    MetadataLookup, ModuleThresholds, Monitor, SampleStore, ThresholdLevel,
};

use crate::cli::{GlobalOpts, InterfaceArgs, InterfacesArgs, SortKey};
use crate::error::CliError;
use crate::output::{self, fmt_counter, fmt_opt};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "RX dBm")]
    rx_power: String,
    #[tabled(rename = "RX")]
    rx_level: String,
    #[tabled(rename = "Last sample")]
    last: String,
}

fn level(value: Option<ThresholdLevel>) -> String {
    value.map_or_else(|| "-".into(), |l| l.to_string())
}

fn to_row(_index: usize, row: &InterfaceOverview) -> InterfaceRow {
    let meta = &row.interface;
    let module = row.status.module.as_ref();
    InterfaceRow {
        id: meta.id.get(),
        host: meta.hostname.clone(),
        name: meta.name.clone(),
        description: meta.description.clone().unwrap_or_default(),
        vendor: module
            .and_then(|m| m.vendor_name.clone())
            .unwrap_or_else(|| "-".into()),
        serial: module
            .and_then(|m| m.serial_number.clone())
            .unwrap_or_else(|| "-".into()),
        rx_power: fmt_opt(
            row.status.latest_reading.as_ref().and_then(|r| r.gauges.rx_power),
            2,
        ),
        rx_level: level(row.status.rx_power_level()),
        last: row.status.latest_sample.as_ref().map_or_else(
            || "-".into(),
            |s| s.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
    }
}

// ── Detail view ─────────────────────────────────────────────────────

/// `low .. high`, with `-` for a missing side.
fn band(low: Option<f64>, high: Option<f64>) -> String {
    format!("{} .. {}", fmt_opt(low, 2), fmt_opt(high, 2))
}

pub(super) fn threshold_lines(t: &ModuleThresholds) -> Vec<String> {
    vec![
        format!(
            "RX limits:    alarm {}  warn {}",
            band(t.rx_power_low, t.rx_power_high),
            band(t.rx_power_low_warning, t.rx_power_high_warning)
        ),
        format!(
            "TX limits:    alarm {}  warn {}",
            band(t.tx_power_low, t.tx_power_high),
            band(t.tx_power_low_warning, t.tx_power_high_warning)
        ),
        format!("Temp limits:  {}", band(t.temp_low, t.temp_high)),
        format!("Volt limits:  {}", band(t.volt_low, t.volt_high)),
        format!("Bias limits:  {}", band(t.bias_low, t.bias_high)),
    ]
}

fn detail(row: &InterfaceOverview) -> String {
    let meta = &row.interface;
    let status = &row.status;
    let mut lines = vec![
        format!("ID:           {}", meta.id),
        format!("Interface:    {}", meta.name),
        format!(
            "Description:  {}",
            meta.description.as_deref().unwrap_or("-")
        ),
        format!("Host:         {} ({})", meta.hostname, meta.address),
        format!(
            "Device:       {}",
            meta.device_id.map_or_else(|| "-".into(), |d| d.to_string())
        ),
    ];

    match &status.latest_sample {
        Some(sample) => {
            let c = &sample.counters;
            lines.push(format!(
                "Last sample:  {}",
                sample.timestamp.format("%Y-%m-%d %H:%M:%S")
            ));
            lines.push(format!(
                "Errors:       in {}  out {}",
                fmt_counter(c.in_errors),
                fmt_counter(c.out_errors)
            ));
            lines.push(format!(
                "Utilization:  in {}%  out {}%",
                fmt_opt(sample.gauges.in_utilization, 1),
                fmt_opt(sample.gauges.out_utilization, 1)
            ));
        }
        None => lines.push("Last sample:  -".into()),
    }

    if let Some(reading) = &status.latest_reading {
        let g = &reading.gauges;
        lines.push(format!(
            "RX power:     {} dBm ({})",
            fmt_opt(g.rx_power, 2),
            level(status.rx_power_level())
        ));
        lines.push(format!(
            "TX power:     {} dBm ({})",
            fmt_opt(g.tx_power, 2),
            level(status.tx_power_level())
        ));
        lines.push(format!(
            "Temperature:  {} °C  Voltage: {} V  Bias: {} mA",
            fmt_opt(g.temperature, 1),
            fmt_opt(g.voltage, 2),
            fmt_opt(g.bias_current, 2)
        ));
    }

    match &status.module {
        Some(module) => {
            lines.push(format!(
                "Module:       {} {} (serial {})",
                module.vendor_name.as_deref().unwrap_or("-"),
                module.part_number.as_deref().unwrap_or("-"),
                module.serial_number.as_deref().unwrap_or("-")
            ));
            lines.extend(threshold_lines(&module.thresholds));
        }
        None => lines.push("Module:       -".into()),
    }

    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

fn sort_key(key: SortKey) -> InterfaceSort {
    match key {
        SortKey::Id => InterfaceSort::Id,
        SortKey::Hostname => InterfaceSort::Hostname,
        SortKey::Name => InterfaceSort::Name,
    }
}

pub async fn list<S>(
    monitor: &Monitor<S>,
    args: InterfacesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    S: SampleStore + MetadataLookup + InventoryStore,
{
    let query = InterfaceQuery {
        search: args.search,
        vendor: args.vendor,
        device: args.device.as_deref().map(str::parse::<DeviceId>).transpose()?,
        sort: sort_key(args.sort),
        descending: args.desc,
    };
    let rows = monitor.search_interfaces(&query).await?;

    if rows.is_empty() {
        output::notice(
            "No interfaces match.",
            output::should_color(global.color),
            global.quiet,
        );
    }

    let out = output::render_list(global.output, &rows, to_row, |r| {
        r.interface.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show<S>(
    monitor: &Monitor<S>,
    args: InterfaceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    S: SampleStore + MetadataLookup + InventoryStore,
{
    let id: InterfaceId = args.interface.parse()?;
    let overview = monitor.interface(id).await?;

    let out = output::render_single(global.output, &overview, detail, |r| {
        r.interface.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
