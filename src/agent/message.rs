//! Messages exchanged between agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::types::{ContentPart, ImageContent, ModelMessage, Role};

/// Which side of the exchange authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentRole {
    Generator,
    Critic,
}

/// Structured tag carried by every message; the chat loop branches on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    /// Opening request that starts the conversation.
    Prompt,
    /// Plain model reply.
    Text,
    /// Output of a function call other than a successful image generation.
    FunctionResult,
    /// The generator produced (and saved) an image.
    ImageProduced,
    /// Critic asks for changes.
    Feedback,
    /// Critic accepts the image.
    Approved,
    /// Final message; nothing follows it.
    Terminated,
}

/// One conversation entry. Fields are read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    id: Uuid,
    role: AgentRole,
    from: String,
    kind: MessageKind,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<ImageContent>,
    timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(
        role: AgentRole,
        from: impl Into<String>,
        kind: MessageKind,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            from: from.into(),
            kind,
            text: text.into(),
            image: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach an image reference while the message is being built.
    pub fn with_image(mut self, image: ImageContent) -> Self {
        self.image = Some(image);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// Sender identity (agent name).
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&ImageContent> {
        self.image.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Render for the model behind `perspective`: its own messages are
    /// `assistant` turns, everyone else's are `user` turns tagged with the
    /// sender's name.
    pub fn to_model_message(&self, perspective: &str) -> ModelMessage {
        let role = if self.from == perspective {
            Role::Assistant
        } else {
            Role::User
        };
        let mut content = Vec::with_capacity(2);
        if !self.text.is_empty() {
            content.push(ContentPart::Text {
                text: self.text.clone(),
            });
        }
        if let Some(image) = &self.image {
            content.push(ContentPart::Image(image.clone()));
        }
        ModelMessage {
            role,
            content,
            name: Some(self.from.clone()),
            timestamp: Some(self.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_messages_render_as_assistant() {
        let msg = ChatMessage::new(AgentRole::Generator, "dalle", MessageKind::Text, "hi");

        assert_eq!(msg.to_model_message("dalle").role, Role::Assistant);
        let seen_by_critic = msg.to_model_message("gpt4v");
        assert_eq!(seen_by_critic.role, Role::User);
        assert_eq!(seen_by_critic.name.as_deref(), Some("dalle"));
    }

    #[test]
    fn image_is_rendered_as_content_part() {
        let msg = ChatMessage::new(AgentRole::Generator, "dalle", MessageKind::ImageProduced, "done")
            .with_image(ImageContent::new("https://img/1.png", "image/png"));

        let model = msg.to_model_message("gpt4v");

        assert!(model.has_image());
        assert_eq!(model.text_content(), "done");
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(MessageKind::ImageProduced).unwrap(),
            "image_produced"
        );
        assert_eq!(MessageKind::Approved.to_string(), "approved");
    }
}
