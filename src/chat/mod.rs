//! The two-agent refinement loop.

pub mod conversation;
pub mod events;
pub mod outcome;
pub mod runner;

pub use conversation::Conversation;
pub use events::{ChatEvent, ChatEventSink};
pub use outcome::{ChatOutcome, ChatStatus};
pub use runner::{TwoAgentChat, DEFAULT_MAX_ROUNDS, TERMINATION_TEXT};
