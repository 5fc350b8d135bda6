use serde::{Deserialize, Serialize};

/// Number of images requested per call
pub const NUM_IMAGES: u32 = 1;

/// Dimensions of the generated image
pub const IMAGE_SIZE: &str = "256x256";

/// The upstream returns a hosted URL rather than inline image data
pub const RESPONSE_FORMAT: &str = "url";

/// A single prompt submitted for generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text description of the desired image
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into() }
    }
}

/// Outcome of a successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Hosted URL of the first generated image
    pub image_url: String,
}
