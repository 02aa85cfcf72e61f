//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::AtelierError;
use crate::models::{ModelCapabilities, OpenAiModel};
use crate::types::*;

use crate::util::retry::RetryPolicy;

use super::http::{bearer_headers, shared_client, status_to_error, trim_trailing_slash};
use super::sanitize::sanitize_messages_for_model;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    model: OpenAiModel,
    api_key: String,
    base_url: String,
    capabilities: ModelCapabilities,
    retry_policy: RetryPolicy,
}

impl OpenAiProvider {
    pub fn new(model: OpenAiModel, api_key: String, base_url: Option<String>) -> Self {
        let capabilities = model.capabilities();
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
            capabilities,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Override the capability table entry (e.g. force image stripping).
    pub fn with_capabilities(mut self, capabilities: ModelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    fn build_request_body(&self, request: &ProviderRequest) -> serde_json::Value {
        let messages = sanitize_messages_for_model(&request.messages, &self.capabilities)
            .iter()
            .map(message_to_openai)
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": self.model.as_str(),
            "messages": messages,
        });

        let settings = &request.settings;
        if let Some(max) = settings.max_tokens {
            body["max_tokens"] = max.into();
        }
        if let Some(temp) = settings.temperature {
            body["temperature"] = temp.into();
        }
        if let Some(top_p) = settings.top_p {
            body["top_p"] = top_p.into();
        }
        if let Some(seed) = settings.seed {
            body["seed"] = seed.into();
        }
        if let Some(ref user) = settings.user {
            body["user"] = user.clone().into();
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() && self.capabilities.supports_tools {
                let tool_defs: Vec<serde_json::Value> = tools
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                body["tools"] = tool_defs.into();
            }
        }

        body
    }

    async fn generate_once(
        &self,
        body: &serde_json::Value,
    ) -> Result<ProviderResponse, AtelierError> {
        let url = format!("{}/chat/completions", trim_trailing_slash(&self.base_url));

        debug!(model = self.model.as_str(), "OpenAI generate_text");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: OpenAiChatResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AtelierError::api(200, "No choices in OpenAI response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| AgentToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(serde_json::Value::String(tc.function.arguments)),
            })
            .collect();

        Ok(ProviderResponse {
            text: choice.message.content.unwrap_or_default(),
            usage: data
                .usage
                .map(|u| Usage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                })
                .unwrap_or_default(),
            tool_calls,
        })
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, AtelierError> {
        let body = self.build_request_body(request);
        self.retry_policy
            .execute(|| self.generate_once(&body))
            .await
    }
}

fn message_to_openai(msg: &ModelMessage) -> serde_json::Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };

    let mut value = if msg.has_image() {
        let parts: Vec<serde_json::Value> = msg
            .content
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => serde_json::json!({
                    "type": "text",
                    "text": text,
                }),
                ContentPart::Image(img) => serde_json::json!({
                    "type": "image_url",
                    "image_url": { "url": img.url }
                }),
            })
            .collect();
        serde_json::json!({ "role": role, "content": parts })
    } else {
        serde_json::json!({ "role": role, "content": msg.text_content() })
    };

    if let Some(ref name) = msg.name {
        value["name"] = name.clone().into();
    }
    value
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
