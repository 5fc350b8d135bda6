use async_trait::async_trait;
use promptpix_config::ImageGenConfig;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use super::ImageGenProvider;
use crate::{
    error::{ImageGenError, Result},
    types::{GenerationRequest, GenerationResult, IMAGE_SIZE, NUM_IMAGES, RESPONSE_FORMAT},
};

/// `OpenAI`-style image generation provider
pub struct OpenAiImageGenProvider {
    name: String,
    client: Client,
    api_key: SecretString,
    endpoint: Url,
    model: String,
}

impl OpenAiImageGenProvider {
    /// Create a provider posting to `endpoint` with the given credential
    pub fn new(name: impl Into<String>, api_key: SecretString, endpoint: Url, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client: Client::new(),
            api_key,
            endpoint,
            model: model.into(),
        }
    }

    /// Create a provider from the `[imagegen]` configuration section
    ///
    /// Settings are validated here as well as at load time, since a config
    /// built in code never passes through the loader.
    pub fn from_config(config: &ImageGenConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ImageGenError::ConfigError(e.to_string()))?;

        Ok(Self::new(
            "openai",
            config.api_key.clone(),
            config.endpoint.clone(),
            config.model.clone(),
        ))
    }

    fn wire_request<'a>(&'a self, request: &'a GenerationRequest) -> OpenAiImageRequest<'a> {
        OpenAiImageRequest {
            model: &self.model,
            prompt: &request.prompt,
            num_images: NUM_IMAGES,
            size: IMAGE_SIZE,
            response_format: RESPONSE_FORMAT,
        }
    }
}

/// Wire format for the generation request
#[derive(Serialize)]
struct OpenAiImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    num_images: u32,
    size: &'static str,
    response_format: &'static str,
}

/// Wire format for the generation response; only the first URL is read
#[derive(Deserialize)]
struct OpenAiImageResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    #[serde(default)]
    url: Option<String>,
}

/// Error envelope returned by `OpenAI`-compatible APIs
#[derive(Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetails,
}

#[derive(Deserialize)]
struct OpenAiErrorDetails {
    message: String,
}

/// Extract `data[0].url` from a success body
fn first_image_url(body: &[u8]) -> Result<String> {
    let response: OpenAiImageResponse = serde_json::from_slice(body)
        .map_err(|e| ImageGenError::MalformedResponse(format!("unexpected response body: {e}")))?;

    let first = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ImageGenError::MalformedResponse("response contained no images".to_string()))?;

    match first.url {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(ImageGenError::MalformedResponse(
            "first image has no URL".to_string(),
        )),
    }
}

/// Map a non-success status and its body to an error
fn status_error(status: StatusCode, body: &str) -> ImageGenError {
    let message = serde_json::from_str::<OpenAiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body.to_string()
            }
        });

    match status.as_u16() {
        400 => ImageGenError::InvalidRequest(message),
        401 => ImageGenError::AuthenticationFailed(message),
        code => ImageGenError::ProviderApiError { status: code, message },
    }
}

#[async_trait]
impl ImageGenProvider for OpenAiImageGenProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        tracing::debug!(
            provider = %self.name,
            model = %self.model,
            endpoint = %self.endpoint,
            "sending image generation request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.wire_request(request))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = %self.name, error = %e, "image generation request failed");
                ImageGenError::ConnectionError(format!("failed to send image generation request: {e}"))
            })?;

        let status = response.status();

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(provider = %self.name, error = %e, "failed to read image generation response");
            ImageGenError::ConnectionError(format!("failed to read image generation response: {e}"))
        })?;

        if !status.is_success() {
            tracing::error!(
                provider = %self.name,
                status = %status,
                "image generation API error"
            );

            return Err(status_error(status, &String::from_utf8_lossy(&body)));
        }

        let image_url = first_image_url(&body).inspect_err(|e| {
            tracing::error!(provider = %self.name, error = %e, "unusable image generation response");
        })?;

        tracing::debug!(provider = %self.name, "image generation request complete");

        Ok(GenerationResult { image_url })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
