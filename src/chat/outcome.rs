//! Result of a finished chat.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::agent::ChatMessage;
use crate::types::{ImageContent, Usage};

/// Why the chat stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChatStatus {
    /// The critic approved the latest image.
    Approved,
    /// The round bound was reached first. Not an error.
    RoundLimitReached,
}

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub status: ChatStatus,
    /// Agent turns taken, never more than the configured bound.
    pub rounds: u32,
    pub messages: Vec<ChatMessage>,
    /// Token usage summed over every model call.
    pub usage: Usage,
    pub last_image: Option<ImageContent>,
    /// Set when an image was written during this run.
    pub image_path: Option<PathBuf>,
}

impl ChatOutcome {
    pub fn is_approved(&self) -> bool {
        self.status == ChatStatus::Approved
    }
}
