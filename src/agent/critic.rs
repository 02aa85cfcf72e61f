//! The vision critic participant.

use async_trait::async_trait;
use tracing::info;

use super::approval::ApprovalDetector;
use super::chat_agent::ChatAgent;
use super::message::{AgentRole, ChatMessage, MessageKind};
use super::{AgentReply, ConversableAgent};
use crate::error::AtelierError;

/// Reviews the latest image and either approves it or asks for changes.
pub struct ImageCriticAgent {
    chat: ChatAgent,
    detector: ApprovalDetector,
}

impl ImageCriticAgent {
    pub fn new(chat: ChatAgent, detector: ApprovalDetector) -> Self {
        Self { chat, detector }
    }

    pub fn detector(&self) -> &ApprovalDetector {
        &self.detector
    }

    /// Tag a critic reply. Approval wins over anything else in the text.
    pub fn classify(&self, text: &str) -> MessageKind {
        if self.detector.is_approval(text) {
            MessageKind::Approved
        } else {
            MessageKind::Feedback
        }
    }
}

#[async_trait]
impl ConversableAgent for ImageCriticAgent {
    fn name(&self) -> &str {
        self.chat.name()
    }

    fn role(&self) -> AgentRole {
        AgentRole::Critic
    }

    async fn reply(&self, history: &[ChatMessage]) -> Result<AgentReply, AtelierError> {
        let response = self.chat.respond(history).await?;
        let kind = self.classify(&response.text);
        info!(agent = self.chat.name(), verdict = %kind, "Critic replied");

        Ok(AgentReply {
            message: ChatMessage::new(AgentRole::Critic, self.chat.name(), kind, response.text),
            usage: response.usage,
            saved_image: None,
        })
    }
}

impl std::fmt::Debug for ImageCriticAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCriticAgent")
            .field("chat", &self.chat)
            .field("keyword", &self.detector.keyword())
            .finish()
    }
}
