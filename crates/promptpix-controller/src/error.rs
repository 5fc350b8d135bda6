use thiserror::Error;

use crate::state::RequestId;

/// Reasons a submission is refused before any request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The prompt is empty or only whitespace
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Another request is still in flight
    #[error("request {0} is still in flight")]
    Busy(RequestId),

    /// `submit` was called outside a Tokio runtime
    #[error("no Tokio runtime available to run the request")]
    NoRuntime,
}
