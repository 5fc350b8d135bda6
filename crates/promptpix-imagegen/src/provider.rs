pub(crate) mod openai;

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{GenerationRequest, GenerationResult},
};

/// Trait for image generation backends
#[async_trait]
pub trait ImageGenProvider: Send + Sync {
    /// Generate one image for the given request
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    /// Get the provider name
    fn name(&self) -> &str;
}
