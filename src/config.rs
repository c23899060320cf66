use std::path::PathBuf;

use tracing::{debug, info};

use crate::auth::DEFAULT_REALM;
use crate::endpoints::DiscoveryEndpoints;

pub const DEFAULT_PLATFORM_API_PREFIX: &str = "platform-api";

/// Everything one publishing run needs, already resolved from CLI, env and file.
#[derive(Clone)]
pub struct DiscoveryConfig {
    pub api_host: String,
    pub platform_api_prefix: String,
    pub api_key: Option<String>,
    pub provider_org: String,
    /// Comma separated files or folders, relative to `workspace`.
    pub apis_location: Option<String>,
    pub is_folder: bool,
    /// `<server host>/<repository>`, the identity of the data source.
    pub data_source_location: String,
    pub resync_check: bool,
    pub workspace: PathBuf,
    pub realm: String,
    pub insecure_skip_tls_verify: bool,
}

impl DiscoveryConfig {
    pub fn new(api_host: impl Into<String>, provider_org: impl Into<String>) -> Self {
        DiscoveryConfig {
            api_host: api_host.into(),
            platform_api_prefix: DEFAULT_PLATFORM_API_PREFIX.to_string(),
            api_key: None,
            provider_org: provider_org.into(),
            apis_location: None,
            is_folder: false,
            data_source_location: String::new(),
            resync_check: false,
            workspace: PathBuf::from("."),
            realm: DEFAULT_REALM.to_string(),
            insecure_skip_tls_verify: false,
        }
    }

    pub fn endpoints(&self) -> DiscoveryEndpoints {
        DiscoveryEndpoints::new(&self.platform_api_prefix, &self.api_host)
    }

    pub fn trace_loaded(&self) {
        info!(
            api_host = %self.api_host,
            provider_org = %self.provider_org,
            api_key_set = self.api_key.as_deref().is_some_and(|key| !key.is_empty()),
            "Loaded discovery config"
        );
        if self.is_folder {
            info!(apifolders = self.apis_location.as_deref().unwrap_or(""), "Publishing API folders");
        } else {
            info!(apifiles = self.apis_location.as_deref().unwrap_or(""), "Publishing API files");
        }
        info!(datasource_check = self.resync_check, "Data source resync check");
        debug!(config = ?self, "Config loaded (full debug)");
    }
}

impl std::fmt::Debug for DiscoveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryConfig")
            .field("api_host", &self.api_host)
            .field("platform_api_prefix", &self.platform_api_prefix)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("provider_org", &self.provider_org)
            .field("apis_location", &self.apis_location)
            .field("is_folder", &self.is_folder)
            .field("data_source_location", &self.data_source_location)
            .field("resync_check", &self.resync_check)
            .field("workspace", &self.workspace)
            .field("realm", &self.realm)
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .finish()
    }
}
