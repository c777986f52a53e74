//! Error-rate ranking handler.

use chrono::Utc;
use tabled::Tabled;

use ifwatch_core::{CounterFamily, ErrorRateEntry, MetadataLookup, Monitor, SampleStore};

use crate::cli::{GlobalOpts, RankArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ErrorRateRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "In/poll")]
    in_rate: String,
    #[tabled(rename = "Out/poll")]
    out_rate: String,
    #[tabled(rename = "Combined")]
    combined: String,
    #[tabled(rename = "In errors")]
    in_total: String,
    #[tabled(rename = "Out errors")]
    out_total: String,
    #[tabled(rename = "Last sample")]
    last: String,
}

fn to_row(index: usize, entry: &ErrorRateEntry) -> ErrorRateRow {
    let record = &entry.metric;
    ErrorRateRow {
        rank: index + 1,
        id: entry.interface.id.get(),
        name: entry.interface.name.clone(),
        host: entry.interface.hostname.clone(),
        address: entry.interface.address.clone(),
        in_rate: format!("{:.2}", record.rate(CounterFamily::InErrors)),
        out_rate: format!("{:.2}", record.rate(CounterFamily::OutErrors)),
        combined: format!("{:.2}", record.combined_rate),
        in_total: output::fmt_counter(record.latest_counters.in_errors),
        out_total: output::fmt_counter(record.latest_counters.out_errors),
        last: record
            .latest_timestamp
            .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<S>(
    monitor: &Monitor<S>,
    args: RankArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    S: SampleStore + MetadataLookup,
{
    let now = match args.as_of.as_deref() {
        Some(t) => util::parse_time(t, "as-of")?,
        None => Utc::now(),
    };
    let entries = monitor.top_error_rates_as_of(args.limit, now).await?;

    if entries.is_empty() {
        output::notice(
            "No interfaces with a positive error rate in the recency window.",
            output::should_color(global.color),
            global.quiet,
        );
    }

    let out = output::render_list(global.output, &entries, to_row, |e| {
        e.interface.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
