//! Programmatic configuration for integration tests

use promptpix_config::ImageGenConfig;
use secrecy::SecretString;
use url::Url;

/// Credential every test controller sends
pub const TEST_API_KEY: &str = "test-key";

/// Builder for `[imagegen]` settings pointed at a mock upstream
pub struct ConfigBuilder {
    config: ImageGenConfig,
}

impl ConfigBuilder {
    /// Start from defaults with the test credential and the given endpoint
    pub fn new(endpoint: Url) -> Self {
        Self {
            config: ImageGenConfig::new(SecretString::from(TEST_API_KEY)).with_endpoint(endpoint),
        }
    }

    /// Override the model
    pub fn with_model(mut self, model: &str) -> Self {
        self.config = self.config.with_model(model);
        self
    }

    /// Finalize the configuration
    pub fn build(self) -> ImageGenConfig {
        self.config
    }
}

/// An endpoint on a local port nothing listens on
pub async fn unreachable_endpoint() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    Url::parse(&format!("http://{addr}/v1/images/generations/dalle-2")).unwrap()
}
