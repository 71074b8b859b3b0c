//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{CallOutcome, Event};
pub use state::{AgentPayload, ConvContext, ConvState, ConversationMessage, Session};
pub use transition::{transition, TransitionError};
