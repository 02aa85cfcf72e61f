//! Events emitted while a chat runs.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::outcome::ChatStatus;
use crate::agent::ChatMessage;

/// Callback receiving every [`ChatEvent`] in order.
pub type ChatEventSink = Arc<dyn Fn(ChatEvent) + Send + Sync>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was added to the conversation. `round` is 0 for the opening
    /// prompt.
    MessageAppended { round: u32, message: ChatMessage },
    /// The generator wrote a new image to disk.
    ImageSaved { path: PathBuf, url: String },
    Finished { status: ChatStatus, rounds: u32 },
}

pub(crate) struct ChatEventEmitter {
    sink: Option<ChatEventSink>,
}

impl ChatEventEmitter {
    pub(crate) fn new(sink: Option<ChatEventSink>) -> Self {
        Self { sink }
    }

    pub(crate) fn emit(&self, event: ChatEvent) {
        let Some(sink) = &self.sink else { return; };
        (sink)(event);
    }
}
