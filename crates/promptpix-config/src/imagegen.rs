use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Endpoint the generate-image call is posted to when none is configured
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/images/generations/dalle-2";

/// Model sent with every request when none is configured
pub const DEFAULT_MODEL: &str = "image-alpha-001";

/// Upstream image generation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGenConfig {
    /// Bearer token for the upstream API
    pub api_key: SecretString,
    /// Full URL of the generation endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
}

impl ImageGenConfig {
    /// Configuration with the default endpoint and model
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: default_endpoint(),
            model: default_model(),
        }
    }

    /// Replace the endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Replace the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Check that these settings can drive a request
    ///
    /// # Errors
    ///
    /// Returns an error if the credential or model is empty, or the
    /// endpoint is not an http(s) URL
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("imagegen.api_key must not be empty");
        }

        if !matches!(self.endpoint.scheme(), "http" | "https") {
            anyhow::bail!(
                "imagegen.endpoint must use http or https, got '{}'",
                self.endpoint.scheme()
            );
        }

        if self.model.trim().is_empty() {
            anyhow::bail!("imagegen.model must not be empty");
        }

        Ok(())
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint must be a valid URL")
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
