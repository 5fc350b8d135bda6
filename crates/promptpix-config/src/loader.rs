use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// expanded, the TOML is invalid, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::from_toml_str(&raw)?;

        tracing::debug!(
            config_path = %path.display(),
            endpoint = %config.imagegen.endpoint,
            model = %config.imagegen.model,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus the file access
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration can drive a request
    ///
    /// # Errors
    ///
    /// Returns an error if the credential or model is empty, or the
    /// endpoint is not an http(s) URL
    pub fn validate(&self) -> anyhow::Result<()> {
        self.imagegen.validate()
    }
}
