//! `create` subcommands for adding team settings.

use std::io::Write;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use owo_colors::{OwoColorize, Stream::Stdout};

use crate::cli::common::prompt_value;
use crate::environment::{
    add_quickstart_location, modify_dev_environment, EnvironmentStore, QuickstartLocation,
};
use crate::git::{url_join, GITHUB_URL};
use crate::progress;

#[derive(Subcommand)]
pub enum CreateCommands {
    /// Add a quickstart location to the team settings
    #[command(name = "quickstartlocation", visible_aliases = ["qsloc", "quickstartloc"])]
    QuickstartLocation(QuickstartLocationArgs),
}

#[derive(Args)]
pub struct QuickstartLocationArgs {
    /// The URL of the git host
    #[arg(short = 'u', long = "url", default_value = GITHUB_URL)]
    pub git_url: String,

    /// The owner (user or organisation) on the git host
    #[arg(short, long)]
    pub owner: Option<String>,
}

pub fn run(
    store: &dyn EnvironmentStore,
    out: &mut dyn Write,
    namespace: &str,
    batch: bool,
    command: CreateCommands,
) -> Result<()> {
    match command {
        CreateCommands::QuickstartLocation(args) => {
            cmd_quickstart_location(store, out, namespace, batch, &args)
        }
    }
}

/// Add one quickstart location to the team settings, replacing any
/// existing entry for the same pair.
fn cmd_quickstart_location(
    store: &dyn EnvironmentStore,
    out: &mut dyn Write,
    namespace: &str,
    batch: bool,
    args: &QuickstartLocationArgs,
) -> Result<()> {
    store.ensure_registered()?;

    if args.git_url.is_empty() {
        bail!("Missing option: --url");
    }

    let owner = match args.owner.as_deref().filter(|owner| !owner.is_empty()) {
        Some(owner) => owner.to_string(),
        None if batch => bail!("Missing option: --owner"),
        None => match prompt_value("Enter the git owner (user or organisation) to add:")? {
            Some(owner) => owner,
            None => bail!("No owner name chosen"),
        },
    };

    let location = QuickstartLocation {
        git_url: args.git_url.clone(),
        owner,
    };

    let status = progress::updating("team settings");
    let result = modify_dev_environment(store, namespace, |env| {
        add_quickstart_location(&mut env.spec.team_settings, location.clone());
        Ok(())
    });
    status.finish_and_clear();
    result?;

    writeln!(
        out,
        "Added quickstart git owner {}",
        url_join(&[&location.git_url, &location.owner])
            .if_supports_color(Stdout, |text| text.green())
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::testing::MemoryStore;

    fn args(git_url: &str, owner: Option<&str>) -> QuickstartLocationArgs {
        QuickstartLocationArgs {
            git_url: git_url.to_string(),
            owner: owner.map(str::to_string),
        }
    }

    #[test]
    fn test_batch_missing_owner() {
        let store = MemoryStore::new();
        let mut out = Vec::new();

        let err = cmd_quickstart_location(&store, &mut out, "default", true, &args(GITHUB_URL, None))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing option: --owner");
    }

    #[test]
    fn test_explicit_empty_url_is_missing() {
        let store = MemoryStore::new();
        let mut out = Vec::new();

        let err = cmd_quickstart_location(&store, &mut out, "default", true, &args("", Some("acme")))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing option: --url");
    }

    #[test]
    fn test_creates_dev_environment_and_adds_location() {
        let store = MemoryStore::new();
        let mut out = Vec::new();

        cmd_quickstart_location(&store, &mut out, "my-team", true, &args(GITHUB_URL, Some("acme")))
            .unwrap();

        let env = store.environment.borrow().clone().unwrap();
        assert_eq!(env.metadata.namespace, "my-team");
        assert_eq!(
            store.locations(),
            vec![QuickstartLocation {
                git_url: GITHUB_URL.to_string(),
                owner: "acme".to_string(),
            }]
        );

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Added quickstart git owner"), "{}", output);
        assert!(output.contains("https://github.com/acme"), "{}", output);
    }

    #[test]
    fn test_adding_existing_pair_does_not_grow_list() {
        let store = MemoryStore::with_locations(vec![QuickstartLocation {
            git_url: GITHUB_URL.to_string(),
            owner: "acme".to_string(),
        }]);
        let mut out = Vec::new();

        cmd_quickstart_location(&store, &mut out, "default", true, &args(GITHUB_URL, Some("acme")))
            .unwrap();

        assert_eq!(store.locations().len(), 1);
    }
}
