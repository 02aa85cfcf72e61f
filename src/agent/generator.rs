//! The image generator participant.

use async_trait::async_trait;
use tracing::{info, warn};

use super::chat_agent::{ChatAgent, ChatResponse};
use super::message::{AgentRole, ChatMessage, MessageKind};
use super::{AgentReply, ConversableAgent};
use crate::error::AtelierError;
use crate::provider::format::tool_result_to_string;
use crate::store::ImageStore;
use crate::tools::{ImageGenerationTool, GENERATE_IMAGE_TOOL};
use crate::types::{GeneratedImage, ImageContent};

const IMAGE_MIME_TYPE: &str = "image/png";

/// Wraps a [`ChatAgent`] that can call `generate_image`; every produced image
/// is written to the [`ImageStore`] before the reply is returned.
pub struct ImageGeneratorAgent {
    chat: ChatAgent,
    store: ImageStore,
}

impl ImageGeneratorAgent {
    pub fn new(chat: ChatAgent, store: ImageStore) -> Self {
        if chat.tools().get(GENERATE_IMAGE_TOOL).is_none() {
            warn!(agent = chat.name(), "Generator has no generate_image tool");
        }
        Self { chat, store }
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    async fn into_reply(&self, response: ChatResponse) -> Result<AgentReply, AtelierError> {
        let usage = response.usage.clone();

        if let Some(image) = latest_image(&response) {
            self.store.save(&image.url).await?;
            let path = self.store.path().to_path_buf();
            info!(agent = self.chat.name(), path = %path.display(), "Generated image stored");

            let text = format!("The image is generated from prompt {}", image.prompt);
            let message = ChatMessage::new(
                AgentRole::Generator,
                self.chat.name(),
                MessageKind::ImageProduced,
                text,
            )
            .with_image(ImageContent::new(image.url, IMAGE_MIME_TYPE));
            return Ok(AgentReply {
                message,
                usage,
                saved_image: Some(path),
            });
        }

        let (kind, text) = if response.called_functions() {
            let text = response
                .function_calls
                .iter()
                .map(|(_, result)| tool_result_to_string(&result.result))
                .collect::<Vec<_>>()
                .join("\n");
            (MessageKind::FunctionResult, text)
        } else {
            (MessageKind::Text, response.text)
        };

        Ok(AgentReply {
            message: ChatMessage::new(AgentRole::Generator, self.chat.name(), kind, text),
            usage,
            saved_image: None,
        })
    }
}

/// Last successful `generate_image` result in the response.
fn latest_image(response: &ChatResponse) -> Option<GeneratedImage> {
    response
        .function_calls
        .iter()
        .rev()
        .filter(|(call, result)| call.name == GENERATE_IMAGE_TOOL && !result.is_error)
        .find_map(|(_, result)| match ImageGenerationTool::parse_result(&result.result) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(error = %e, "Unreadable generate_image result");
                None
            }
        })
}

#[async_trait]
impl ConversableAgent for ImageGeneratorAgent {
    fn name(&self) -> &str {
        self.chat.name()
    }

    fn role(&self) -> AgentRole {
        AgentRole::Generator
    }

    async fn reply(&self, history: &[ChatMessage]) -> Result<AgentReply, AtelierError> {
        let response = self.chat.respond(history).await?;
        self.into_reply(response).await
    }
}

impl std::fmt::Debug for ImageGeneratorAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGeneratorAgent")
            .field("chat", &self.chat)
            .field("store", &self.store)
            .finish()
    }
}
