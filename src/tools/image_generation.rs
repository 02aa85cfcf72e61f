//! The `generate_image` function exposed to the generator's model.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::types::AgentToolParameters;
use crate::error::AtelierError;
use crate::provider::ImageProvider;
use crate::types::{GeneratedImage, ImageGenerationRequest, ImageOptions};

/// Function name advertised to the model.
pub const GENERATE_IMAGE_TOOL: &str = "generate_image";

#[derive(Debug, Deserialize)]
struct GenerateImageArgs {
    prompt: String,
}

/// Calls the image endpoint and returns a [`GeneratedImage`] as JSON.
pub struct ImageGenerationTool {
    provider: Arc<dyn ImageProvider>,
    options: ImageOptions,
    parameters: AgentToolParameters,
}

impl ImageGenerationTool {
    pub fn new(provider: Arc<dyn ImageProvider>, options: ImageOptions) -> Self {
        Self {
            provider,
            options,
            parameters: AgentToolParameters::object()
                .string("prompt", "prompt with feedback", true)
                .build(),
        }
    }

    /// Decode this tool's JSON result back into the typed image.
    pub fn parse_result(value: &serde_json::Value) -> Result<GeneratedImage, AtelierError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[async_trait]
impl Tool for ImageGenerationTool {
    fn name(&self) -> &str {
        GENERATE_IMAGE_TOOL
    }

    fn description(&self) -> &str {
        "Generate image from prompt using DALL-E."
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, AtelierError> {
        let GenerateImageArgs { prompt } = args.deserialize()?;
        let request = ImageGenerationRequest::new(prompt.as_str(), self.options.clone());
        let image = self
            .provider
            .generate_images(&request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AtelierError::ToolExecution {
                tool_name: GENERATE_IMAGE_TOOL.to_string(),
                message: "no image returned".to_string(),
            })?;

        info!(%prompt, url = %image.url, "Image generated");
        Ok(serde_json::to_value(image)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedImages {
        seen: Mutex<Vec<ImageGenerationRequest>>,
    }

    #[async_trait]
    impl ImageProvider for FixedImages {
        async fn generate_images(
            &self,
            request: &ImageGenerationRequest,
        ) -> Result<Vec<GeneratedImage>, AtelierError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(vec![GeneratedImage {
                prompt: request.prompt.clone(),
                url: "https://images.test/1.png".into(),
                revised_prompt: Some("a blue cat".into()),
            }])
        }
    }

    #[tokio::test]
    async fn returns_typed_image_payload() {
        let provider = Arc::new(FixedImages {
            seen: Mutex::new(Vec::new()),
        });
        let tool = ImageGenerationTool::new(provider.clone(), ImageOptions::default());

        let value = tool
            .execute(
                &ToolArguments::new(serde_json::json!({"prompt": "blue cat"})),
                &ToolExecutionContext::default(),
            )
            .await
            .unwrap();

        let image = ImageGenerationTool::parse_result(&value).unwrap();
        assert_eq!(image.prompt, "blue cat");
        assert_eq!(image.url, "https://images.test/1.png");
        assert_eq!(provider.seen.lock().unwrap()[0].options.model, "dall-e-3");
    }

    #[test]
    fn contract_requires_prompt() {
        let tool = ImageGenerationTool::new(
            Arc::new(FixedImages {
                seen: Mutex::new(Vec::new()),
            }),
            ImageOptions::default(),
        );
        let def = tool.definition();
        assert_eq!(def.name, "generate_image");
        assert_eq!(def.parameters["required"][0], "prompt");
    }
}
