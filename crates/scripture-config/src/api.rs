use std::time::Duration;

use serde::Deserialize;

/// Verse API configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Endpoint the verse reference is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Hosts the fetcher may reach
    #[serde(default = "default_network_domains")]
    pub network_domains: Vec<String>,
    /// Request timeout, e.g. "30s"
    #[serde(default)]
    pub timeout: Option<String>,
    /// User-Agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ApiConfig {
    /// Parsed request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a valid duration
    pub fn timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|raw| duration_str::parse(raw).map_err(|e| anyhow::anyhow!("invalid api.timeout '{raw}': {e}")))
            .transpose()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            network_domains: default_network_domains(),
            timeout: None,
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    scripture_client::DEFAULT_BASE_URL.to_owned()
}

fn default_network_domains() -> Vec<String> {
    vec![scripture_client::NETWORK_DOMAIN.to_owned()]
}
