use chrono::Utc;

use crate::chat_client::ChatBackend;
use crate::error::{ChatError, TransitionError};
use crate::prompt::GREETING;

pub const SEARCHING_STATUS: &str = "Pesquisando na web...";
pub const PROCESSING_ERROR: &str = "Ocorreu um erro ao processar sua solicitação.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
    System,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Unix milliseconds.
    pub timestamp: i64,
    pub is_error: bool,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().timestamp_millis(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(Role::Model, content)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEvent {
    Submit,
    Resolve,
}

/// `Idle --Submit--> AwaitingResponse --Resolve--> Idle`; every other pairing
/// is rejected.
pub fn transition(from: ChatPhase, event: ChatEvent) -> Result<ChatPhase, TransitionError> {
    match (from, event) {
        (ChatPhase::Idle, ChatEvent::Submit) => Ok(ChatPhase::AwaitingResponse),
        (ChatPhase::AwaitingResponse, ChatEvent::Resolve) => Ok(ChatPhase::Idle),
        (from, event) => Err(TransitionError { from, event }),
    }
}

/// Everything the chat backend needs for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    /// Transcript before the new user message.
    pub history: Vec<Message>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    phase: ChatPhase,
    status: String,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_messages(vec![Message::new(Role::Model, GREETING)])
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            phase: ChatPhase::Idle,
            status: String::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ChatPhase::AwaitingResponse
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Appends the user message and enters `AwaitingResponse`. Blank text or
    /// a pending reply leaves the transcript untouched and returns `None`.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingTurn> {
        if text.trim().is_empty() {
            return None;
        }
        let next = match transition(self.phase, ChatEvent::Submit) {
            Ok(next) => next,
            Err(err) => {
                tracing::debug!("send ignored: {err}");
                return None;
            }
        };

        let history = self.messages.clone();
        self.messages.push(Message::new(Role::User, text));
        self.phase = next;
        self.status = SEARCHING_STATUS.to_string();
        Some(PendingTurn {
            history,
            text: text.to_string(),
        })
    }

    pub fn set_tool_status(&mut self, label: &str) {
        if self.is_loading() {
            self.status = format!("{label}...");
        }
    }

    /// Closes the pending turn with exactly one appended message.
    pub fn resolve(&mut self, outcome: Result<String, ChatError>) -> Result<(), TransitionError> {
        let next = transition(self.phase, ChatEvent::Resolve)?;
        let message = match outcome {
            Ok(text) => Message::new(Role::Model, text),
            Err(err) => {
                tracing::error!("chat turn failed: {err}");
                Message::error(PROCESSING_ERROR)
            }
        };
        self.messages.push(message);
        self.phase = next;
        self.status.clear();
        Ok(())
    }

    /// Runs a whole turn on the calling thread. Returns whether a turn ran.
    pub fn send_with(&mut self, backend: &dyn ChatBackend, text: &str) -> bool {
        let Some(turn) = self.begin_send(text) else {
            return false;
        };
        let mut status = None;
        let outcome = backend.send_message(&turn.history, &turn.text, &mut |label: &str| {
            status = Some(label.to_string());
        });
        if let Some(label) = status {
            self.set_tool_status(&label);
        }
        self.resolve(outcome).is_ok()
    }
}
