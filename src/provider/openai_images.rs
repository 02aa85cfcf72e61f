//! OpenAI image generation provider (`/images/generations`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http::{bearer_headers, shared_client, status_to_error, trim_trailing_slash};
use super::openai::DEFAULT_BASE_URL;
use super::ImageProvider;
use crate::error::AtelierError;
use crate::types::{GeneratedImage, ImageGenerationRequest, ImageResponseFormat};
use crate::util::retry::RetryPolicy;
use crate::util::timeout::with_timeout;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const B64_MIME_TYPE: &str = "image/png";

/// DALL-E style image generation against the OpenAI Images API.
#[derive(Debug, Clone)]
pub struct OpenAiImageProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl OpenAiImageProvider {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    fn validate_request(&self, request: &ImageGenerationRequest) -> Result<(), AtelierError> {
        if self.api_key.trim().is_empty() {
            return Err(AtelierError::Authentication(
                "Missing OpenAI API key for image generation".to_string(),
            ));
        }
        if request.prompt.trim().is_empty() {
            return Err(AtelierError::InvalidArgument(
                "Image prompt cannot be empty".to_string(),
            ));
        }
        if request.options.count == 0 {
            return Err(AtelierError::InvalidArgument(
                "Image count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    async fn generate_once(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, AtelierError> {
        let options = &request.options;
        let payload = serde_json::json!({
            "model": options.model,
            "prompt": request.prompt,
            "n": options.count,
            "size": options.size.to_string(),
            "style": options.style.to_string(),
            "quality": options.quality.to_string(),
            "response_format": options.response_format.to_string(),
        });
        let url = format!("{}/images/generations", trim_trailing_slash(&self.base_url));

        debug!(model = %options.model, size = %options.size, "OpenAI generate_images");

        with_timeout(self.timeout, async {
            let response = shared_client()
                .post(url)
                .headers(bearer_headers(&self.api_key))
                .json(&payload)
                .send()
                .await?;

            parse_images_response(response, &request.prompt, options.response_format).await
        })
        .await
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, AtelierError> {
        self.validate_request(request)?;
        self.retry_policy
            .execute(|| self.generate_once(request))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiImagesResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiImageData {
    url: Option<String>,
    b64_json: Option<String>,
    revised_prompt: Option<String>,
}

async fn parse_images_response(
    response: reqwest::Response,
    prompt: &str,
    format: ImageResponseFormat,
) -> Result<Vec<GeneratedImage>, AtelierError> {
    let status = response.status().as_u16();
    if status != 200 {
        let body = response.text().await.unwrap_or_default();
        return Err(status_to_error(status, &body));
    }

    let body = response.text().await?;
    let parsed: OpenAiImagesResponse = serde_json::from_str(&body)?;

    let images: Vec<GeneratedImage> = parsed
        .data
        .into_iter()
        .filter_map(|item| {
            let url = match format {
                ImageResponseFormat::Url => item.url,
                ImageResponseFormat::B64Json => item
                    .b64_json
                    .map(|data| format!("data:{B64_MIME_TYPE};base64,{data}")),
            }?;
            Some(GeneratedImage {
                prompt: prompt.to_string(),
                url,
                revised_prompt: item.revised_prompt,
            })
        })
        .collect();

    if images.is_empty() {
        return Err(AtelierError::InvalidState(
            "Image generation response contained no images".to_string(),
        ));
    }
    Ok(images)
}
