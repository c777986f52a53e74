//! Utilization ranking handler.

use chrono::Utc;
use tabled::Tabled;

use ifwatch_core::{MetadataLookup, Monitor, SampleStore, UtilizationEntry};

use crate::cli::{GlobalOpts, RankArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UtilizationRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "In %")]
    inbound: String,
    #[tabled(rename = "Out %")]
    outbound: String,
    #[tabled(rename = "Max %")]
    max: String,
    #[tabled(rename = "Sampled")]
    sampled: String,
}

fn to_row(index: usize, entry: &UtilizationEntry) -> UtilizationRow {
    let reading = &entry.metric;
    UtilizationRow {
        rank: index + 1,
        id: entry.interface.id.get(),
        name: entry.interface.name.clone(),
        description: entry.interface.description.clone().unwrap_or_default(),
        host: entry.interface.hostname.clone(),
        inbound: format!("{:.1}", reading.in_utilization),
        outbound: format!("{:.1}", reading.out_utilization),
        max: format!("{:.1}", reading.max_utilization),
        sampled: reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

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
    let entries = monitor.top_utilization_as_of(args.limit, now).await?;

    if entries.is_empty() {
        output::notice(
            "No interfaces reporting utilization in the recency window.",
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
