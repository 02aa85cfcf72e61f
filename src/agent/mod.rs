//! Conversation participants: the image generator and the vision critic.

pub mod approval;
pub mod chat_agent;
pub mod critic;
pub mod generator;
pub mod message;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::AtelierError;
use crate::types::Usage;

pub use approval::{ApprovalDetector, DEFAULT_APPROVAL_KEYWORD};
pub use chat_agent::{ChatAgent, ChatResponse};
pub use critic::ImageCriticAgent;
pub use generator::ImageGeneratorAgent;
pub use message::{AgentRole, ChatMessage, MessageKind};

/// One agent's contribution to a turn.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub message: ChatMessage,
    pub usage: Usage,
    /// Set when the turn wrote a new image to disk.
    pub saved_image: Option<PathBuf>,
}

/// A participant that produces the next message from the shared history.
#[async_trait]
pub trait ConversableAgent: Send + Sync {
    fn name(&self) -> &str;

    fn role(&self) -> AgentRole;

    async fn reply(&self, history: &[ChatMessage]) -> Result<AgentReply, AtelierError>;
}
