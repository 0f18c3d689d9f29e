//! Team environment resources.
//!
//! A team's settings are persisted in an `Environment` custom resource
//! stored by the cluster API. The team-wide settings live on the
//! environment named `dev`; quickstart locations are an ordered list of
//! (git URL, owner) pairs inside those settings.
//!
//! Writes go through [`modify_dev_environment`], an optimistic
//! read-modify-write loop: fetch the latest copy, apply a callback, write
//! it back, and refetch on a version conflict up to a bounded number of
//! attempts.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// API group of the environment custom resource.
pub const API_GROUP: &str = "teamctl.dev";

/// API version of the environment custom resource.
pub const API_VERSION: &str = "v1";

/// Resource kind.
pub const ENVIRONMENT_KIND: &str = "Environment";

/// Plural resource name used in API paths.
pub const ENVIRONMENT_PLURAL: &str = "environments";

/// Name of the environment that carries the team settings.
pub const DEV_ENVIRONMENT: &str = "dev";

/// Write attempts before giving up on a conflicted update.
const UPDATE_ATTEMPTS: u32 = 5;

/// A source of project templates: an owner (user or organisation) on a
/// git host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickstartLocation {
    pub git_url: String,
    pub owner: String,
}

/// Persisted team-wide settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamSettings {
    pub use_git_ops: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub branch_patterns: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quickstart_locations: Vec<QuickstartLocation>,
}

/// Standard object metadata, reduced to the fields this tool touches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentSpec {
    pub team_settings: TeamSettings,
}

/// An environment custom resource as stored by the cluster API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: EnvironmentSpec,
}

/// Result of a write against the cluster API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// The stored resource version moved underneath us.
    Conflict,
}

/// Access to environment resources.
///
/// Implemented by the HTTP client in [`crate::client`]; tests use an
/// in-memory store.
pub trait EnvironmentStore {
    /// Make sure the environment resource type is registered with the
    /// cluster.
    fn ensure_registered(&self) -> Result<()>;

    fn get_environment(&self, namespace: &str, name: &str) -> Result<Option<Environment>>;

    fn create_environment(&self, namespace: &str, env: &Environment) -> Result<UpdateOutcome>;

    fn update_environment(&self, namespace: &str, env: &Environment) -> Result<UpdateOutcome>;
}

/// A fresh dev environment for a team that has none yet.
pub fn dev_environment(namespace: &str) -> Environment {
    Environment {
        api_version: format!("{}/{}", API_GROUP, API_VERSION),
        kind: ENVIRONMENT_KIND.to_string(),
        metadata: ObjectMeta {
            name: DEV_ENVIRONMENT.to_string(),
            namespace: namespace.to_string(),
            resource_version: None,
        },
        spec: EnvironmentSpec::default(),
    }
}

/// The quickstart locations currently configured for the team.
///
/// A team without a dev environment has no locations.
pub fn get_quickstart_locations(
    store: &dyn EnvironmentStore,
    namespace: &str,
) -> Result<Vec<QuickstartLocation>> {
    Ok(store
        .get_environment(namespace, DEV_ENVIRONMENT)?
        .map(|env| env.spec.team_settings.quickstart_locations)
        .unwrap_or_default())
}

/// Remove the location matching the exact (git URL, owner) pair.
///
/// The first match is spliced out; the relative order of the remaining
/// entries is preserved.
pub fn remove_quickstart_location(
    settings: &mut TeamSettings,
    git_url: &str,
    owner: &str,
) -> Result<()> {
    let found = settings
        .quickstart_locations
        .iter()
        .position(|loc| loc.git_url == git_url && loc.owner == owner);

    match found {
        Some(index) => {
            settings.quickstart_locations.remove(index);
            Ok(())
        }
        None => bail!(
            "No quickstart location found for git URL: {} and owner: {}",
            git_url,
            owner
        ),
    }
}

/// Add a location, replacing any existing entry for the same pair.
pub fn add_quickstart_location(settings: &mut TeamSettings, location: QuickstartLocation) {
    settings
        .quickstart_locations
        .retain(|loc| !(loc.git_url == location.git_url && loc.owner == location.owner));
    settings.quickstart_locations.push(location);
}

/// Apply `callback` to the team's dev environment and write it back.
///
/// Reads the latest stored copy (or starts a fresh one when the team has
/// no dev environment yet), lets the callback mutate it, then creates or
/// updates the resource. A write conflict triggers a refetch and reapply,
/// bounded at a few attempts. A callback error aborts immediately with
/// nothing written.
pub fn modify_dev_environment<F>(
    store: &dyn EnvironmentStore,
    namespace: &str,
    mut callback: F,
) -> Result<()>
where
    F: FnMut(&mut Environment) -> Result<()>,
{
    for attempt in 1..=UPDATE_ATTEMPTS {
        let existing = store.get_environment(namespace, DEV_ENVIRONMENT)?;
        let is_new = existing.is_none();
        let mut env = existing.unwrap_or_else(|| dev_environment(namespace));

        callback(&mut env)?;

        let outcome = if is_new {
            store.create_environment(namespace, &env)?
        } else {
            store.update_environment(namespace, &env)?
        };

        match outcome {
            UpdateOutcome::Applied => return Ok(()),
            UpdateOutcome::Conflict => {
                tracing::debug!(
                    "write conflict on environment '{}' (attempt {}/{}), refetching",
                    DEV_ENVIRONMENT,
                    attempt,
                    UPDATE_ATTEMPTS
                );
            }
        }
    }

    bail!(
        "Giving up updating environment '{}' after {} write conflicts",
        DEV_ENVIRONMENT,
        UPDATE_ATTEMPTS
    )
}
