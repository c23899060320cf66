//! URL construction for the discovery service.

/// Replaces every `/` in a data source identifier so it fits one path segment.
pub fn sanitize_data_source_id(id: &str) -> String {
    id.replace('/', "-")
}

/// Base URL of the discovery service plus the paths hanging off it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEndpoints {
    base: String,
}

impl DiscoveryEndpoints {
    /// `https://{prefix}.{host}/discovery`
    pub fn new(platform_api_prefix: &str, api_host: &str) -> Self {
        DiscoveryEndpoints {
            base: format!("https://{platform_api_prefix}.{api_host}/discovery"),
        }
    }

    /// Points at an arbitrary service root, e.g. a local mock server.
    pub fn with_base(base: impl Into<String>) -> Self {
        DiscoveryEndpoints {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn token(&self) -> String {
        format!("{}/token", self.base)
    }

    pub fn data_sources(&self, org: &str) -> String {
        format!("{}/orgs/{org}/data-sources", self.base)
    }

    /// The identifier is sanitized before it is placed in the path.
    pub fn data_source(&self, org: &str, data_source_id: &str) -> String {
        format!(
            "{}/{}",
            self.data_sources(org),
            sanitize_data_source_id(data_source_id)
        )
    }

    pub fn discovered_apis(&self, org: &str) -> String {
        format!("{}/orgs/{org}/discovered-apis", self.base)
    }

    pub fn discovered_api(&self, org: &str, id: &str) -> String {
        format!("{}/{id}", self.discovered_apis(org))
    }

    pub fn bulk(&self, org: &str) -> String {
        format!("{}/bulk", self.discovered_apis(org))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_from_prefix_and_host() {
        let endpoints = DiscoveryEndpoints::new("platform-api", "example.com");
        assert_eq!(
            endpoints.token(),
            "https://platform-api.example.com/discovery/token"
        );
        assert_eq!(
            endpoints.bulk("porg"),
            "https://platform-api.example.com/discovery/orgs/porg/discovered-apis/bulk"
        );
    }

    #[test]
    fn data_source_path_replaces_slashes() {
        let endpoints = DiscoveryEndpoints::with_base("http://localhost:8080/discovery/");
        assert_eq!(
            endpoints.data_source("porg", "github.com/acme/apis"),
            "http://localhost:8080/discovery/orgs/porg/data-sources/github.com-acme-apis"
        );
    }
}
