//! `get` subcommands for displaying team settings.

use std::io::Write;

use anyhow::Result;
use clap::Subcommand;
use owo_colors::{OwoColorize, Stream::Stdout};

use crate::environment::{get_quickstart_locations, EnvironmentStore};
use crate::progress;

#[derive(Subcommand)]
pub enum GetCommands {
    /// List the quickstart locations configured for the team
    #[command(name = "quickstartlocations", visible_aliases = ["quickstartlocation", "qsloc"])]
    QuickstartLocations,
}

pub fn run(
    store: &dyn EnvironmentStore,
    out: &mut dyn Write,
    namespace: &str,
    command: GetCommands,
) -> Result<()> {
    match command {
        GetCommands::QuickstartLocations => cmd_quickstart_locations(store, out, namespace),
    }
}

fn cmd_quickstart_locations(
    store: &dyn EnvironmentStore,
    out: &mut dyn Write,
    namespace: &str,
) -> Result<()> {
    store.ensure_registered()?;

    let status = progress::fetching("quickstart locations");
    let locations = get_quickstart_locations(store, namespace)?;
    status.finish_and_clear();

    if locations.is_empty() {
        writeln!(out, "No quickstart locations configured for the team.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<45} {}",
        "GIT URL".if_supports_color(Stdout, |text| text.dimmed()),
        "OWNER".if_supports_color(Stdout, |text| text.dimmed())
    )?;
    for location in &locations {
        writeln!(
            out,
            "{:<45} {}",
            location.git_url,
            location.owner.if_supports_color(Stdout, |text| text.bold())
        )?;
    }

    Ok(())
}
