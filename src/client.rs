//! Cluster API access.
//!
//! Talks to the Kubernetes-style REST API that stores environment
//! resources. Client settings are resolved from (most specific first):
//! - the `--namespace` flag,
//! - `TEAMCTL_SERVER` / `TEAMCTL_NAMESPACE` / `TEAMCTL_TOKEN` /
//!   `TEAMCTL_TOKEN_FILE` environment variables,
//! - a config file (`$TEAMCTL_CONFIG`, else `~/.config/teamctl/config.json`),
//! - defaults: the local API proxy on 127.0.0.1:8001, namespace `default`.

use anyhow::{bail, Context, Result};
use reqwest::blocking::RequestBuilder;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::environment::{
    Environment, EnvironmentStore, UpdateOutcome, API_GROUP, API_VERSION, ENVIRONMENT_KIND,
    ENVIRONMENT_PLURAL,
};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8001";
const DEFAULT_NAMESPACE: &str = "default";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// On-disk client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_file: Option<String>,
}

/// Get the client config file path.
fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("TEAMCTL_CONFIG") {
        return PathBuf::from(shellexpand::tilde(&path).to_string());
    }

    let config_home = env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".config").display().to_string())
            .unwrap_or_else(|| "~/.config".to_string())
    });
    PathBuf::from(config_home).join("teamctl").join("config.json")
}

/// Load the config file, returning empty config if not found.
fn load_client_config(path: &Path) -> ClientConfig {
    if !path.exists() {
        return ClientConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => ClientConfig::default(),
    }
}

/// Resolve the bearer token, if any.
///
/// `TEAMCTL_TOKEN` wins over a token file (`TEAMCTL_TOKEN_FILE`, else the
/// config file's `token_file`), which wins over an inline config token.
fn resolve_token(config: &ClientConfig) -> Result<Option<String>> {
    if let Ok(token) = env::var("TEAMCTL_TOKEN") {
        if !token.is_empty() {
            return Ok(Some(token));
        }
    }

    let token_file = env::var("TEAMCTL_TOKEN_FILE")
        .ok()
        .filter(|path| !path.is_empty())
        .or_else(|| config.token_file.clone());
    if let Some(path) = token_file {
        let path = shellexpand::tilde(&path).to_string();
        let token = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read token file {}", path))?;
        return Ok(Some(token.trim().to_string()));
    }

    Ok(config.token.clone())
}

/// The CRD manifest registering the environment resource type.
fn environment_crd() -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "apiextensions.k8s.io/v1",
        "kind": "CustomResourceDefinition",
        "metadata": {
            "name": format!("{}.{}", ENVIRONMENT_PLURAL, API_GROUP),
        },
        "spec": {
            "group": API_GROUP,
            "scope": "Namespaced",
            "names": {
                "plural": ENVIRONMENT_PLURAL,
                "singular": "environment",
                "kind": ENVIRONMENT_KIND,
                "shortNames": ["env"],
            },
            "versions": [{
                "name": API_VERSION,
                "served": true,
                "storage": true,
                "schema": {
                    "openAPIV3Schema": {
                        "type": "object",
                        "x-kubernetes-preserve-unknown-fields": true,
                    },
                },
            }],
        },
    })
}

/// Blocking HTTP client for environment resources.
pub struct ClusterClient {
    http: reqwest::blocking::Client,
    server: String,
    namespace: String,
    token: Option<String>,
}

impl ClusterClient {
    /// Build a client from the resolved configuration.
    pub fn connect(namespace_override: Option<&str>) -> Result<Self> {
        let config = load_client_config(&config_file_path());

        let server = env::var("TEAMCTL_SERVER")
            .ok()
            .filter(|server| !server.is_empty())
            .or_else(|| config.server.clone())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let server = server.trim_end_matches('/').to_string();

        let namespace = namespace_override
            .map(str::to_string)
            .or_else(|| env::var("TEAMCTL_NAMESPACE").ok().filter(|ns| !ns.is_empty()))
            .or_else(|| config.namespace.clone())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let token = resolve_token(&config)?;

        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            server,
            namespace,
            token,
        })
    }

    /// The team namespace this client operates on.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn environments_url(&self, namespace: &str) -> String {
        format!(
            "{}/apis/{}/{}/namespaces/{}/{}",
            self.server, API_GROUP, API_VERSION, namespace, ENVIRONMENT_PLURAL
        )
    }

    fn environment_url(&self, namespace: &str, name: &str) -> String {
        format!("{}/{}", self.environments_url(namespace), name)
    }

    fn crd_url(&self) -> String {
        format!(
            "{}/apis/apiextensions.k8s.io/v1/customresourcedefinitions/{}.{}",
            self.server, ENVIRONMENT_PLURAL, API_GROUP
        )
    }

    fn register_crd(&self) -> Result<()> {
        let url = format!(
            "{}/apis/apiextensions.k8s.io/v1/customresourcedefinitions",
            self.server
        );
        tracing::debug!("POST {}", url);

        let response = self
            .request(Method::POST, &url)
            .json(&environment_crd())
            .send()
            .context("Failed to contact the cluster API")?;

        match response.status() {
            // Another client registered the type first.
            StatusCode::CONFLICT => Ok(()),
            status if status.is_success() => Ok(()),
            status => bail!(
                "Failed to register the environment resource type: {}: {}",
                status,
                response.text().unwrap_or_default()
            ),
        }
    }
}

impl EnvironmentStore for ClusterClient {
    fn ensure_registered(&self) -> Result<()> {
        let url = self.crd_url();
        tracing::debug!("GET {}", url);

        let response = self
            .request(Method::GET, &url)
            .send()
            .context("Failed to contact the cluster API")?;

        match response.status() {
            StatusCode::NOT_FOUND => self.register_crd(),
            status if status.is_success() => Ok(()),
            status => bail!("Failed to look up the environment resource type: {}", status),
        }
    }

    fn get_environment(&self, namespace: &str, name: &str) -> Result<Option<Environment>> {
        let url = self.environment_url(namespace, name);
        tracing::debug!("GET {}", url);

        let response = self
            .request(Method::GET, &url)
            .send()
            .context("Failed to contact the cluster API")?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(
                response
                    .json()
                    .with_context(|| format!("Failed to parse environment '{}'", name))?,
            )),
            status => bail!("Failed to fetch environment '{}': {}", name, status),
        }
    }

    fn create_environment(&self, namespace: &str, env: &Environment) -> Result<UpdateOutcome> {
        let url = self.environments_url(namespace);
        tracing::debug!("POST {}", url);

        let response = self
            .request(Method::POST, &url)
            .json(env)
            .send()
            .context("Failed to contact the cluster API")?;

        match response.status() {
            StatusCode::CONFLICT => Ok(UpdateOutcome::Conflict),
            status if status.is_success() => Ok(UpdateOutcome::Applied),
            status => bail!(
                "Failed to create environment '{}': {}: {}",
                env.metadata.name,
                status,
                response.text().unwrap_or_default()
            ),
        }
    }

    fn update_environment(&self, namespace: &str, env: &Environment) -> Result<UpdateOutcome> {
        let url = self.environment_url(namespace, &env.metadata.name);
        tracing::debug!("PUT {}", url);

        let response = self
            .request(Method::PUT, &url)
            .json(env)
            .send()
            .context("Failed to contact the cluster API")?;

        match response.status() {
            StatusCode::CONFLICT => Ok(UpdateOutcome::Conflict),
            status if status.is_success() => Ok(UpdateOutcome::Applied),
            status => bail!(
                "Failed to update environment '{}': {}: {}",
                env.metadata.name,
                status,
                response.text().unwrap_or_default()
            ),
        }
    }
}
