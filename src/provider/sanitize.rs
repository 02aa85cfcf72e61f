//! Model-specific transcript sanitization.

use crate::models::ModelCapabilities;
use crate::types::{ContentPart, ModelMessage};

/// Prepare a transcript for a model with the given capabilities.
///
/// Image parts are removed for models without vision; a message left with no
/// content is dropped. Sender names are reduced to the `[A-Za-z0-9_-]{1,64}`
/// alphabet the chat API accepts.
pub fn sanitize_messages_for_model(
    messages: &[ModelMessage],
    capabilities: &ModelCapabilities,
) -> Vec<ModelMessage> {
    messages
        .iter()
        .filter_map(|message| {
            let mut next = if capabilities.supports_vision {
                message.clone()
            } else {
                strip_image_parts(message)?
            };
            next.name = next.name.as_deref().and_then(sanitize_name);
            Some(next)
        })
        .collect()
}

fn strip_image_parts(message: &ModelMessage) -> Option<ModelMessage> {
    let parts: Vec<ContentPart> = message
        .content
        .iter()
        .filter(|part| !matches!(part, ContentPart::Image(_)))
        .filter(|part| !matches!(part, ContentPart::Text { text } if text.is_empty()))
        .cloned()
        .collect();
    if parts.is_empty() {
        return None;
    }
    let mut next = message.clone();
    next.content = parts;
    Some(next)
}

fn sanitize_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
