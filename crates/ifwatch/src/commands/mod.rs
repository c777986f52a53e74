//! Command dispatch: bridges CLI args -> `Monitor` queries -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod errors;
pub mod interfaces;
pub mod series;
pub mod util;
pub mod utilization;

use ifwatch_core::{InventoryStore, MetadataLookup, Monitor, SampleStore};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
pub async fn dispatch<S>(
    cmd: Command,
    monitor: &Monitor<S>,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    S: SampleStore + MetadataLookup + InventoryStore,
{
    match cmd {
        Command::Errors(args) => errors::handle(monitor, args, global).await,
        Command::Utilization(args) => utilization::handle(monitor, args, global).await,
        Command::Series(args) => series::handle(monitor, args, global).await,
        Command::Devices => devices::handle(monitor, global).await,
        Command::Interfaces(args) => interfaces::list(monitor, args, global).await,
        Command::Interface(args) => interfaces::show(monitor, args, global).await,
        // Config and Completions are handled before a store is opened
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not use the sample store".into(),
        )),
    }
}
