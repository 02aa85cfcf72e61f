//! Assemble the generator, the critic and the loop from an [`AtelierConfig`].

use std::sync::Arc;

use tracing::info;

use crate::agent::{
    AgentRole, ApprovalDetector, ChatAgent, ChatMessage, ImageCriticAgent, ImageGeneratorAgent,
    MessageKind,
};
use crate::chat::{ChatEventSink, ChatOutcome, TwoAgentChat};
use crate::config::AtelierConfig;
use crate::error::AtelierError;
use crate::provider::{ImageProvider, ModelProvider, OpenAiImageProvider, OpenAiProvider};
use crate::store::ImageStore;
use crate::tools::{ImageGenerationTool, ToolSet};
use crate::util::retry::RetryPolicy;

/// A ready-to-run image refinement chat.
#[derive(Debug)]
pub struct ImageRefinement {
    chat: TwoAgentChat,
    opening: ChatMessage,
    store: ImageStore,
}

impl ImageRefinement {
    /// Build against the OpenAI API. Fails when no API key is configured.
    pub fn from_config(config: &AtelierConfig) -> Result<Self, AtelierError> {
        let api_key = config.api_key()?.to_string();
        let retry = RetryPolicy::with_attempts(config.retry_attempts);

        let generator_model = OpenAiProvider::new(
            config.generator.model.clone(),
            api_key.clone(),
            config.base_url.clone(),
        )
        .with_capabilities(config.generator.capabilities())
        .with_retry_policy(retry.clone());
        let critic_model = OpenAiProvider::new(
            config.critic.model.clone(),
            api_key.clone(),
            config.base_url.clone(),
        )
        .with_capabilities(config.critic.capabilities())
        .with_retry_policy(retry.clone());
        let images = match &config.base_url {
            Some(url) => OpenAiImageProvider::new_with_base_url(api_key, url.clone()),
            None => OpenAiImageProvider::new(api_key),
        }
        .with_retry_policy(retry);

        Self::from_parts(
            config,
            Arc::new(generator_model),
            Arc::new(critic_model),
            Arc::new(images),
        )
    }

    /// Build with caller-supplied backends.
    pub fn from_parts(
        config: &AtelierConfig,
        generator_model: Arc<dyn ModelProvider>,
        critic_model: Arc<dyn ModelProvider>,
        images: Arc<dyn ImageProvider>,
    ) -> Result<Self, AtelierError> {
        config.validate()?;
        let detector = ApprovalDetector::new(&config.approval_keyword).map_err(|e| {
            AtelierError::Configuration(format!("invalid approval keyword: {e}"))
        })?;
        let store = ImageStore::new(&config.image_path);

        let tools = ToolSet::new().with_tool(Arc::new(ImageGenerationTool::new(
            images,
            config.image.clone(),
        )));
        let generator_chat = ChatAgent::new(&config.generator.name, generator_model)
            .with_system_prompt(&config.generator.system_prompt)
            .with_settings(config.generator.settings.clone())
            .with_tools(tools);
        let generator = ImageGeneratorAgent::new(generator_chat, store.clone());

        let critic_chat = ChatAgent::new(&config.critic.name, critic_model)
            .with_system_prompt(config.critic_system_prompt())
            .with_settings(config.critic.settings.clone());
        let critic = ImageCriticAgent::new(critic_chat, detector);

        let chat = TwoAgentChat::new(Arc::new(generator), Arc::new(critic))
            .with_max_rounds(config.max_rounds)
            .with_image_store(store.clone());

        let opening = ChatMessage::new(
            AgentRole::Critic,
            &config.critic.name,
            MessageKind::Prompt,
            &config.opening_message,
        );

        Ok(Self {
            chat,
            opening,
            store,
        })
    }

    pub fn with_event_sink(mut self, sink: ChatEventSink) -> Self {
        self.chat = self.chat.with_event_sink(sink);
        self
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Clear the image file, then run the chat to completion.
    pub async fn run(&self) -> Result<ChatOutcome, AtelierError> {
        info!(
            image_path = %self.store.path().display(),
            max_rounds = self.chat.max_rounds(),
            "Starting image refinement"
        );
        self.chat.run(self.opening.clone()).await
    }
}
