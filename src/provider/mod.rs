//! Model provider traits and the OpenAI implementations.

pub mod format;
pub mod http;
pub mod openai;
pub mod openai_images;
pub mod sanitize;

pub use openai::OpenAiProvider;
pub use openai_images::OpenAiImageProvider;

use async_trait::async_trait;

use crate::error::AtelierError;
use crate::models::ModelCapabilities;
use crate::types::{
    AgentToolCall, GeneratedImage, GenerationSettings, ImageGenerationRequest,
    ModelMessage, Usage,
};

/// A request sent to a chat model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Function contract sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a chat provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
}

/// Chat completion backend for an agent.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Capabilities of the model.
    fn capabilities(&self) -> &ModelCapabilities;

    /// Generate a reply (non-streaming).
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, AtelierError>;
}

/// Text-to-image backend.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate images for a prompt; at least one image on success.
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, AtelierError>;
}
