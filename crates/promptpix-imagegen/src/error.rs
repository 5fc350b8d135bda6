use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Image generation errors
///
/// Cloneable so a failure can be published to every observer of the
/// controller state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageGenError {
    /// Upstream rejected the request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream rejected the credential (HTTP 401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Upstream answered with any other non-success status
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// The request never produced a response
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Success status but the body did not carry an image URL
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Provider settings cannot drive a request
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The request task ended without producing an outcome
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImageGenError {
    /// HTTP status returned by the upstream, if it answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::InvalidRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::ProviderApiError { status, .. } => Some(*status),
            Self::ConnectionError(_) | Self::MalformedResponse(_) | Self::ConfigError(_) | Self::Internal(_) => None,
        }
    }

    /// Short message suitable for showing next to the prompt form
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationFailed(_) => "The image service rejected the API key".to_string(),
            Self::ConnectionError(_) => "Could not reach the image service".to_string(),
            Self::MalformedResponse(_) => "The image service returned no image".to_string(),
            Self::ConfigError(_) => "Image generation is not configured".to_string(),
            Self::Internal(_) => "Image generation stopped unexpectedly".to_string(),
            Self::InvalidRequest(message) | Self::ProviderApiError { message, .. } => {
                format!("Image generation failed: {message}")
            }
        }
    }
}
