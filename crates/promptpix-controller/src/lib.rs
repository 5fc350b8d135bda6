//! Request/response controller for prompt-to-image generation
//!
//! Owns the displayed image URL and the loading state, and drives each
//! submission through `Idle -> Loading -> Idle | Failed`.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod controller;
mod error;
mod state;

pub use controller::Controller;
pub use error::SubmitError;
pub use promptpix_imagegen::ImageGenError;
pub use state::{Failure, RequestId, Snapshot, Status};
