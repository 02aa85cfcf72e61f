//! Bounded turn-taking loop between the generator and the critic.

use std::sync::Arc;

use tracing::{debug, info};

use super::conversation::Conversation;
use super::events::{ChatEvent, ChatEventEmitter, ChatEventSink};
use super::outcome::{ChatOutcome, ChatStatus};
use crate::agent::{AgentReply, AgentRole, ChatMessage, ConversableAgent, MessageKind};
use crate::error::AtelierError;
use crate::store::ImageStore;
use crate::types::Usage;

pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Text of the final message once the critic approves.
pub const TERMINATION_TEXT: &str =
    "The image satisfies the condition, conversation is terminated. TERMINATE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatState {
    AwaitingGenerator,
    AwaitingCritic,
}

/// Alternates generator and critic turns until approval or the round bound.
///
/// A round is one agent turn. The generator always speaks first, answering
/// the opening message.
pub struct TwoAgentChat {
    generator: Arc<dyn ConversableAgent>,
    critic: Arc<dyn ConversableAgent>,
    max_rounds: u32,
    store: Option<ImageStore>,
    event_sink: Option<ChatEventSink>,
}

impl TwoAgentChat {
    pub fn new(generator: Arc<dyn ConversableAgent>, critic: Arc<dyn ConversableAgent>) -> Self {
        Self {
            generator,
            critic,
            max_rounds: DEFAULT_MAX_ROUNDS,
            store: None,
            event_sink: None,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Image file cleared before the first turn.
    pub fn with_image_store(mut self, store: ImageStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_event_sink(mut self, sink: ChatEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Run the chat from `opening`, which is appended as-is before round 1.
    ///
    /// Model, tool-provider and download failures abort the run and are
    /// returned unchanged.
    pub async fn run(&self, opening: ChatMessage) -> Result<ChatOutcome, AtelierError> {
        if let Some(store) = &self.store {
            store.reset().await?;
        }

        let emitter = ChatEventEmitter::new(self.event_sink.clone());
        let mut conversation = Conversation::new();
        let mut usage = Usage::default();
        let mut image_path = None;
        let mut rounds = 0u32;
        let mut state = ChatState::AwaitingGenerator;

        self.append(&mut conversation, &emitter, 0, opening);

        let status = loop {
            if rounds >= self.max_rounds {
                info!(rounds, "Round limit reached without approval");
                break ChatStatus::RoundLimitReached;
            }
            rounds += 1;

            let reply = self.dispatch_turn(state, conversation.messages()).await?;
            usage.merge(&reply.usage);

            if let Some(path) = reply.saved_image {
                let url = reply
                    .message
                    .image()
                    .map(|image| image.url.clone())
                    .unwrap_or_default();
                emitter.emit(ChatEvent::ImageSaved {
                    path: path.clone(),
                    url,
                });
                image_path = Some(path);
            }

            let kind = reply.message.kind();
            self.append(&mut conversation, &emitter, rounds, reply.message);

            state = match (state, kind) {
                (ChatState::AwaitingCritic, MessageKind::Approved) => {
                    let done = ChatMessage::new(
                        AgentRole::Generator,
                        self.generator.name(),
                        MessageKind::Terminated,
                        TERMINATION_TEXT,
                    );
                    self.append(&mut conversation, &emitter, rounds, done);
                    info!(rounds, "Critic approved the image");
                    break ChatStatus::Approved;
                }
                (ChatState::AwaitingGenerator, _) => ChatState::AwaitingCritic,
                (ChatState::AwaitingCritic, _) => ChatState::AwaitingGenerator,
            };
        };

        emitter.emit(ChatEvent::Finished { status, rounds });

        let last_image = conversation.last_image().cloned();
        Ok(ChatOutcome {
            status,
            rounds,
            messages: conversation.into_messages(),
            usage,
            last_image,
            image_path,
        })
    }

    async fn dispatch_turn(
        &self,
        state: ChatState,
        history: &[ChatMessage],
    ) -> Result<AgentReply, AtelierError> {
        let agent = match state {
            ChatState::AwaitingGenerator => &self.generator,
            ChatState::AwaitingCritic => &self.critic,
        };
        debug!(agent = agent.name(), history = history.len(), "Dispatching turn");
        agent.reply(history).await
    }

    fn append(
        &self,
        conversation: &mut Conversation,
        emitter: &ChatEventEmitter,
        round: u32,
        message: ChatMessage,
    ) {
        info!(
            round,
            from = message.from(),
            kind = %message.kind(),
            "Message appended"
        );
        conversation.push(message.clone());
        emitter.emit(ChatEvent::MessageAppended { round, message });
    }
}

impl std::fmt::Debug for TwoAgentChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoAgentChat")
            .field("generator", &self.generator.name())
            .field("critic", &self.critic.name())
            .field("max_rounds", &self.max_rounds)
            .field("store", &self.store)
            .finish()
    }
}
