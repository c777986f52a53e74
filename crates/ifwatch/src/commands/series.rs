//! Rate series handler.

use chrono::{SecondsFormat, Utc};
use tabled::Tabled;

use ifwatch_core::{
    CounterFamily, InterfaceId, InventoryStore, MetadataLookup, Monitor, SampleStore,
    SeriesReport, TimedRateSample,
};

use crate::cli::{GlobalOpts, OutputFormat, SeriesArgs};
use crate::error::CliError;
use crate::output::{self, fmt_opt};

use super::{interfaces, util};

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "In Mbps")]
    in_mbps: String,
    #[tabled(rename = "Out Mbps")]
    out_mbps: String,
    #[tabled(rename = "In err/s")]
    in_errors: String,
    #[tabled(rename = "Out err/s")]
    out_errors: String,
    #[tabled(rename = "In %")]
    in_utilization: String,
    #[tabled(rename = "Out %")]
    out_utilization: String,
    #[tabled(rename = "RX dBm")]
    rx_power: String,
    #[tabled(rename = "TX dBm")]
    tx_power: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Volt")]
    voltage: String,
    #[tabled(rename = "Bias mA")]
    bias_current: String,
}

fn to_row(point: &TimedRateSample) -> SeriesRow {
    let g = &point.gauges;
    SeriesRow {
        time: point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        in_mbps: fmt_opt(point.rate(CounterFamily::InOctets), 3),
        out_mbps: fmt_opt(point.rate(CounterFamily::OutOctets), 3),
        in_errors: fmt_opt(point.rate(CounterFamily::InErrors), 3),
        out_errors: fmt_opt(point.rate(CounterFamily::OutErrors), 3),
        in_utilization: fmt_opt(g.in_utilization, 1),
        out_utilization: fmt_opt(g.out_utilization, 1),
        rx_power: fmt_opt(g.rx_power, 2),
        tx_power: fmt_opt(g.tx_power, 2),
        temperature: fmt_opt(g.temperature, 1),
        voltage: fmt_opt(g.voltage, 2),
        bias_current: fmt_opt(g.bias_current, 2),
    }
}

/// Point table, followed by the module limits when known.
fn detail(report: &SeriesReport) -> String {
    if report.points.is_empty() {
        return String::new();
    }
    let rows: Vec<SeriesRow> = report.points.iter().map(to_row).collect();
    let mut out = output::render_table(&rows);
    if let Some(thresholds) = report.thresholds.as_ref().filter(|t| !t.is_empty()) {
        out.push('\n');
        out.push_str(&interfaces::threshold_lines(thresholds).join("\n"));
    }
    out
}

fn timestamps(report: &SeriesReport) -> String {
    report
        .points
        .iter()
        .map(|p| p.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle<S>(
    monitor: &Monitor<S>,
    args: SeriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    S: SampleStore + MetadataLookup + InventoryStore,
{
    let id: InterfaceId = args.interface.parse()?;
    let (start, end) = util::resolve_window(
        args.start.as_deref(),
        args.end.as_deref(),
        args.last.as_deref(),
        Utc::now(),
    )?;

    let report = monitor.series_report(id, start, end).await?;

    if report.points.is_empty() && global.output == OutputFormat::Table {
        output::notice(
            &format!("No samples for interface {id} between {start} and {end}."),
            output::should_color(global.color),
            global.quiet,
        );
    }

    let out = output::render_single(global.output, &report, detail, timestamps)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
