use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header::CONTENT_TYPE, Client};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    models::dto::image::{ImageEnvelope, ImageRequest},
    services::http_helpers::error_body,
};

/// Turns an image prompt into encoded image bytes. Called once, never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> AppResult<Vec<u8>>;
}

/// Cloudflare Workers AI text-to-image client.
pub struct CloudflareImageClient {
    http: Client,
    endpoint: String,
    api_token: SecretString,
}

impl CloudflareImageClient {
    pub fn new(
        http: Client,
        base_url: &str,
        account_id: &str,
        model: &str,
        api_token: SecretString,
    ) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}/client/v4/accounts/{}/ai/run/{}",
                base_url.trim_end_matches('/'),
                account_id,
                model
            ),
            api_token,
        }
    }
}

/// Extracts image bytes from either a raw `image/*` body or a JSON envelope.
pub fn decode_image_payload(content_type: Option<&str>, body: &[u8]) -> AppResult<Vec<u8>> {
    if content_type.is_some_and(|ct| ct.starts_with("image/")) {
        if body.is_empty() {
            return Err(AppError::ImageGenerationError("Empty image body".to_string()));
        }
        return Ok(body.to_vec());
    }

    let envelope: ImageEnvelope = serde_json::from_slice(body).map_err(|e| {
        AppError::ImageGenerationError(format!(
            "Unexpected image payload ({}): {}",
            content_type.unwrap_or("no content type"),
            e
        ))
    })?;

    let encoded = envelope.image_base64().ok_or_else(|| {
        AppError::ImageGenerationError(format!(
            "Image envelope carries no image (errors: {:?})",
            envelope.errors
        ))
    })?;

    STANDARD
        .decode(encoded)
        .map_err(|e| AppError::ImageGenerationError(format!("Invalid base64 image: {}", e)))
}

#[async_trait]
impl ImageGenerator for CloudflareImageClient {
    async fn generate_image(&self, prompt: &str) -> AppResult<Vec<u8>> {
        log::info!("Requesting image for prompt: {}", prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_token.expose_secret())
            .json(&ImageRequest { prompt })
            .send()
            .await
            .map_err(|e| AppError::ImageGenerationError(format!("Image request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ImageGenerationError(error_body(response).await));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::ImageGenerationError(format!("Failed to read image: {}", e)))?;

        let image = decode_image_payload(content_type.as_deref(), &body)?;
        log::info!("Received image of {} bytes", image.len());
        Ok(image)
    }
}
