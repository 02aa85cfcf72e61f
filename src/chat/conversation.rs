//! Append-only message history shared by both agents.

use crate::agent::{ChatMessage, MessageKind};
use crate::types::ImageContent;

/// Ordered transcript of a chat. Entries are never reordered or removed.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Most recent image attached by any message.
    pub fn last_image(&self) -> Option<&ImageContent> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.kind() == MessageKind::ImageProduced)
            .and_then(|m| m.image())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentRole;

    #[test]
    fn last_image_tracks_newest_image() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::new(AgentRole::Critic, "gpt4v", MessageKind::Prompt, "draw"));
        assert!(conversation.last_image().is_none());

        for url in ["https://img/1.png", "https://img/2.png"] {
            conversation.push(
                ChatMessage::new(AgentRole::Generator, "dalle", MessageKind::ImageProduced, "done")
                    .with_image(ImageContent::new(url, "image/png")),
            );
            conversation.push(ChatMessage::new(
                AgentRole::Critic,
                "gpt4v",
                MessageKind::Feedback,
                "again",
            ));
        }

        assert_eq!(conversation.len(), 5);
        assert_eq!(conversation.last_image().unwrap().url, "https://img/2.png");
        assert_eq!(conversation.last().unwrap().kind(), MessageKind::Feedback);
    }
}
