//! LLM-backed conversational agent with function calling.

use std::sync::Arc;

use tracing::debug;

use super::message::ChatMessage;
use crate::error::AtelierError;
use crate::provider::sanitize::sanitize_messages_for_model;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::tools::{ToolExecutionContext, ToolSet};
use crate::types::{AgentToolCall, AgentToolResult, GenerationSettings, ModelMessage, Usage};

/// What one model call produced after function calls were resolved.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Free text from the model (may be empty when it only called tools).
    pub text: String,
    /// Each requested call with its result, in request order.
    pub function_calls: Vec<(AgentToolCall, AgentToolResult)>,
    pub usage: Usage,
}

impl ChatResponse {
    pub fn called_functions(&self) -> bool {
        !self.function_calls.is_empty()
    }
}

/// One named participant wrapping a chat model, a system prompt and the
/// functions it may call.
pub struct ChatAgent {
    name: String,
    system_prompt: Option<String>,
    provider: Arc<dyn ModelProvider>,
    tools: ToolSet,
    settings: GenerationSettings,
}

impl ChatAgent {
    pub fn new(name: impl Into<String>, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            name: name.into(),
            system_prompt: None,
            provider,
            tools: ToolSet::new(),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Transcript as this agent's model sees it. Images are dropped for
    /// models without vision.
    pub fn model_messages(&self, history: &[ChatMessage]) -> Vec<ModelMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if let Some(ref sys) = self.system_prompt {
            messages.push(ModelMessage::system(sys.clone()));
        }
        messages.extend(history.iter().map(|m| m.to_model_message(&self.name)));
        sanitize_messages_for_model(&messages, self.provider.capabilities())
    }

    /// Ask the model for the next reply.
    ///
    /// Requested function calls are executed locally and their results
    /// returned instead of being sent back to the model.
    pub async fn respond(&self, history: &[ChatMessage]) -> Result<ChatResponse, AtelierError> {
        let request = ProviderRequest {
            messages: self.model_messages(history),
            settings: self.settings.clone(),
            tools: self.tools.definitions(),
        };

        debug!(
            agent = %self.name,
            model = self.provider.model_id(),
            messages = request.messages.len(),
            "Requesting reply"
        );
        let response = self.provider.generate_text(&request).await?;

        let ctx = ToolExecutionContext {
            caller: Some(self.name.clone()),
        };
        let mut function_calls = Vec::with_capacity(response.tool_calls.len());
        for call in response.tool_calls {
            let result = self.tools.dispatch(&call, &ctx).await;
            function_calls.push((call, result));
        }

        Ok(ChatResponse {
            text: response.text,
            function_calls,
            usage: response.usage,
        })
    }
}

impl std::fmt::Debug for ChatAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAgent")
            .field("name", &self.name)
            .field("model", &self.provider.model_id())
            .field("tools", &self.tools)
            .finish()
    }
}
