/// `load_config` module: turns action inputs (CLI flags, `INPUT_*` environment
/// variables and an optional YAML file) into a resolved [`DiscoveryConfig`].
///
/// # Responsibilities
/// - Parse the optional YAML file into [`ActionInputs`]
/// - Overlay command line / environment inputs on top of the file values
/// - Derive the data source location from the GitHub server URL and repository
/// - Decide files vs folders mode and parse the boolean inputs
///
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::auth::DEFAULT_REALM;
use crate::config::{DiscoveryConfig, DEFAULT_PLATFORM_API_PREFIX};

pub const DEFAULT_GITHUB_SERVER_URL: &str = "https://github.com";

/// YAML may spell boolean inputs as `true` or as `"true"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Text(String),
}

fn flag_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<FlagValue>::deserialize(deserializer)?.map(|value| match value {
        FlagValue::Bool(flag) => flag.to_string(),
        FlagValue::Text(text) => text,
    }))
}

/// Raw, unresolved action inputs. Every field is optional so that file,
/// environment and command line can each supply a subset.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionInputs {
    pub api_host: Option<String>,
    pub api_key: Option<String>,
    pub provider_org: Option<String>,
    #[serde(default, deserialize_with = "flag_as_string")]
    pub resync_check: Option<String>,
    pub api_files: Option<String>,
    pub api_folders: Option<String>,
    pub git_diff: Option<String>,
    pub platform_api_prefix: Option<String>,
    #[serde(default, deserialize_with = "flag_as_string")]
    pub insecure_skip_tls_verify: Option<String>,
    pub realm: Option<String>,
    pub github_server_url: Option<String>,
    pub github_repository: Option<String>,
    pub workspace: Option<PathBuf>,
}

/// A fully resolved run: the discovery config plus the changed-files list.
#[derive(Debug, Clone)]
pub struct PublishRun {
    pub config: DiscoveryConfig,
    pub git_diff: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts `true`/`false`, `yes`/`no`, `1`/`0` in any case.
pub fn parse_flag(name: &str, value: Option<&str>) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Ok(false),
        Some("true") | Some("yes") | Some("1") => Ok(true),
        Some("false") | Some("no") | Some("0") => Ok(false),
        Some(other) => {
            error!(input = name, value = other, "Input is not a boolean");
            anyhow::bail!("input {name} must be true or false, got {other:?}")
        }
    }
}

/// `<host of server url>/<repository>`
pub fn data_source_location(server_url: &str, repository: &str) -> Result<String> {
    let url = reqwest::Url::parse(server_url)
        .with_context(|| format!("invalid GitHub server URL {server_url:?}"))?;
    let host = url
        .host_str()
        .with_context(|| format!("GitHub server URL {server_url:?} has no host"))?;
    if repository.is_empty() {
        warn!("GITHUB_REPOSITORY not set, data source is identified by host only");
        return Ok(host.to_string());
    }
    Ok(format!("{host}/{repository}"))
}

impl ActionInputs {
    /// Fills every unset field from `fallback`.
    pub fn overlay(self, fallback: ActionInputs) -> ActionInputs {
        ActionInputs {
            api_host: non_empty(self.api_host).or(fallback.api_host),
            api_key: non_empty(self.api_key).or(fallback.api_key),
            provider_org: non_empty(self.provider_org).or(fallback.provider_org),
            resync_check: non_empty(self.resync_check).or(fallback.resync_check),
            api_files: non_empty(self.api_files).or(fallback.api_files),
            api_folders: non_empty(self.api_folders).or(fallback.api_folders),
            git_diff: non_empty(self.git_diff).or(fallback.git_diff),
            platform_api_prefix: non_empty(self.platform_api_prefix)
                .or(fallback.platform_api_prefix),
            insecure_skip_tls_verify: non_empty(self.insecure_skip_tls_verify)
                .or(fallback.insecure_skip_tls_verify),
            realm: non_empty(self.realm).or(fallback.realm),
            github_server_url: non_empty(self.github_server_url).or(fallback.github_server_url),
            github_repository: non_empty(self.github_repository).or(fallback.github_repository),
            workspace: self.workspace.or(fallback.workspace),
        }
    }

    /// Resolves defaults and derived values.
    ///
    /// API files take precedence over API folders when both are given.
    pub fn resolve(self) -> Result<PublishRun> {
        let api_files = non_empty(self.api_files);
        let api_folders = non_empty(self.api_folders);
        let is_folder = api_files.is_none() && api_folders.is_some();
        let apis_location = api_files.or(api_folders);

        let server_url = non_empty(self.github_server_url)
            .unwrap_or_else(|| DEFAULT_GITHUB_SERVER_URL.to_string());
        let repository = non_empty(self.github_repository).unwrap_or_default();

        let config = DiscoveryConfig {
            api_host: non_empty(self.api_host).unwrap_or_default(),
            platform_api_prefix: non_empty(self.platform_api_prefix)
                .unwrap_or_else(|| DEFAULT_PLATFORM_API_PREFIX.to_string()),
            api_key: non_empty(self.api_key),
            provider_org: non_empty(self.provider_org).unwrap_or_default(),
            apis_location,
            is_folder,
            data_source_location: data_source_location(&server_url, &repository)?,
            resync_check: parse_flag("resync_check", self.resync_check.as_deref())?,
            workspace: self.workspace.unwrap_or_else(|| PathBuf::from(".")),
            realm: non_empty(self.realm).unwrap_or_else(|| DEFAULT_REALM.to_string()),
            insecure_skip_tls_verify: parse_flag(
                "insecure_skip_tls_verify",
                self.insecure_skip_tls_verify.as_deref(),
            )?,
        };

        Ok(PublishRun {
            config,
            git_diff: self.git_diff.unwrap_or_default(),
        })
    }
}

/// Loads a YAML file of action inputs.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ActionInputs> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    match serde_yaml::from_str::<Option<ActionInputs>>(&config_content) {
        Ok(inputs) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(inputs.unwrap_or_default())
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
