//! Convenience re-exports for common use.

pub use crate::agent::{
    AgentReply, AgentRole, ApprovalDetector, ChatAgent, ChatMessage, ConversableAgent,
    ImageCriticAgent, ImageGeneratorAgent, MessageKind,
};
pub use crate::chat::{ChatEvent, ChatEventSink, ChatOutcome, ChatStatus, TwoAgentChat};
pub use crate::config::{AgentConfig, AtelierConfig};
pub use crate::error::{AtelierError, Result};
pub use crate::models::OpenAiModel;
pub use crate::provider::{ImageProvider, ModelProvider};
pub use crate::refine::ImageRefinement;
pub use crate::store::ImageStore;
pub use crate::tools::{AgentToolParameters, Tool, ToolArguments, ToolSet};
pub use crate::types::{
    GeneratedImage, GenerationSettings, ImageContent, ImageOptions, ModelMessage, Role, Usage,
};
