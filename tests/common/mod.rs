//! Shared test helpers: scripted chat model and image backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;

use atelier::error::AtelierError;
use atelier::models::ModelCapabilities;
use atelier::provider::{ImageProvider, ModelProvider, ProviderRequest, ProviderResponse};
use atelier::types::*;

/// A mock chat model that replays queued responses in order.
pub struct MockProvider {
    model_id: String,
    capabilities: ModelCapabilities,
    responses: Mutex<VecDeque<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            capabilities: ModelCapabilities::full(128_000),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn text_only(model_id: &str) -> Self {
        Self {
            capabilities: ModelCapabilities::text_only(16_385),
            ..Self::new(model_id)
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
        });
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.responses.lock().unwrap().push_back(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: vec![AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args,
            }],
        });
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, AtelierError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AtelierError::InvalidState("No more mock responses".into()))
    }
}

/// Image backend returning inline `data:` URLs, one distinct payload per call.
pub struct MockImages {
    prompts: Mutex<Vec<String>>,
}

impl MockImages {
    pub fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Bytes returned for the `n`th call (1-based).
    pub fn payload(n: usize) -> Vec<u8> {
        format!("image-{n}").into_bytes()
    }
}

#[async_trait]
impl ImageProvider for MockImages {
    async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>, AtelierError> {
        let n = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.prompt.clone());
            prompts.len()
        };
        let data = base64::engine::general_purpose::STANDARD.encode(Self::payload(n));
        Ok(vec![GeneratedImage {
            prompt: request.prompt.clone(),
            url: format!("data:image/png;base64,{data}"),
            revised_prompt: None,
        }])
    }
}
