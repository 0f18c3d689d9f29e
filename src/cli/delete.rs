//! `delete` subcommands for removing team settings.

use std::collections::HashMap;
use std::io::Write;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use owo_colors::{OwoColorize, Stream::Stdout};

use crate::cli::common::pick_name;
use crate::environment::{
    get_quickstart_locations, modify_dev_environment, remove_quickstart_location,
    EnvironmentStore,
};
use crate::git::url_join;
use crate::progress;

#[derive(Subcommand)]
pub enum DeleteCommands {
    /// Delete a quickstart location from the team settings
    #[command(name = "quickstartlocation", visible_aliases = ["qsloc", "quickstartloc"])]
    QuickstartLocation(QuickstartLocationArgs),
}

#[derive(Args)]
pub struct QuickstartLocationArgs {
    /// The URL of the git host
    #[arg(short = 'u', long = "url")]
    pub git_url: Option<String>,

    /// The owner (user or organisation) on the git host
    #[arg(short, long)]
    pub owner: Option<String>,
}

pub fn run(
    store: &dyn EnvironmentStore,
    out: &mut dyn Write,
    namespace: &str,
    batch: bool,
    command: DeleteCommands,
) -> Result<()> {
    match command {
        DeleteCommands::QuickstartLocation(args) => {
            cmd_quickstart_location(store, out, namespace, batch, &args)
        }
    }
}

/// Delete one quickstart location from the team settings.
fn cmd_quickstart_location(
    store: &dyn EnvironmentStore,
    out: &mut dyn Write,
    namespace: &str,
    batch: bool,
    args: &QuickstartLocationArgs,
) -> Result<()> {
    store.ensure_registered()?;

    let status = progress::fetching("quickstart locations");
    let locations = get_quickstart_locations(store, namespace)?;
    status.finish_and_clear();

    // An explicitly empty flag counts as absent.
    let git_url = args.git_url.as_deref().filter(|url| !url.is_empty());
    let owner = args.owner.as_deref().filter(|owner| !owner.is_empty());

    let (git_url, owner) = match (git_url, owner) {
        (Some(git_url), Some(owner)) => (git_url.to_string(), owner.to_string()),
        (git_url, _) if batch => {
            if git_url.is_none() {
                bail!("Missing option: --url");
            }
            bail!("Missing option: --owner");
        }
        _ => {
            let mut by_key = HashMap::new();
            let mut names = Vec::new();
            for location in &locations {
                let key = url_join(&[&location.git_url, &location.owner]);
                names.push(key.clone());
                by_key.insert(key, location.clone());
            }

            let picked = pick_name(
                &names,
                "Pick the quickstart git owner to remove from the team settings:",
            )?;
            match picked.and_then(|name| by_key.remove(&name)) {
                Some(location) => (location.git_url, location.owner),
                None => bail!("No owner name chosen"),
            }
        }
    };

    let status = progress::updating("team settings");
    let result = modify_dev_environment(store, namespace, |env| {
        remove_quickstart_location(&mut env.spec.team_settings, &git_url, &owner)
    });
    status.finish_and_clear();
    result?;

    writeln!(
        out,
        "Removing quickstart git owner {}",
        url_join(&[&git_url, &owner]).if_supports_color(Stdout, |text| text.cyan())
    )?;

    Ok(())
}
