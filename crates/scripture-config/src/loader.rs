use std::path::Path;

use url::Url;

use crate::Config;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "scripture.toml";

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Load `path`, or [`DEFAULT_CONFIG_PATH`] if it exists, or built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is found but cannot be loaded
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_PATH);
        if fallback.is_file() {
            return Self::load(fallback);
        }

        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unusable or its host is not
    /// among the allowed network domains
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_base_url()?;
        self.api.timeout()?;
        Ok(())
    }

    fn validate_base_url(&self) -> anyhow::Result<()> {
        let api = &self.api;

        if api.network_domains.is_empty() {
            anyhow::bail!("api.network_domains must list at least one host");
        }

        let parsed = Url::parse(&api.base_url)
            .map_err(|e| anyhow::anyhow!("invalid api.base_url '{}': {e}", api.base_url))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("api.base_url must use http or https; got '{}://'", parsed.scheme());
        }

        // The verse reference is appended verbatim
        if !api.base_url.ends_with('/') {
            anyhow::bail!("api.base_url must end with '/'");
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("api.base_url must include a host"))?;

        if !scripture_client::is_allowed_host(host, &api.network_domains) {
            anyhow::bail!(
                "api.base_url host '{host}' is not in api.network_domains {:?}",
                api.network_domains
            );
        }

        Ok(())
    }
}
