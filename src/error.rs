use thiserror::Error;

use crate::conversation::{ChatEvent, ChatPhase};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// No LLM key in the environment. Fatal for the call.
    #[error("API Key missing")]
    MissingApiKey,

    /// The provider could not deliver the request (worker gone).
    #[error("chat request not delivered: {0}")]
    Dispatch(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal chat transition: {event:?} while {from:?}")]
pub struct TransitionError {
    pub from: ChatPhase,
    pub event: ChatEvent,
}
