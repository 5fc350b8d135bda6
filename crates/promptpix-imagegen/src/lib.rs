#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod provider;
mod types;

pub use error::{ImageGenError, Result};
pub use provider::{ImageGenProvider, openai::OpenAiImageGenProvider};
pub use types::{GenerationRequest, GenerationResult, IMAGE_SIZE, NUM_IMAGES, RESPONSE_FORMAT};
