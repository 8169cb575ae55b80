//! Conversation history and turn lifecycle
//!
//! The store owns the ordered turn history and the current suggestion set,
//! and guards the single in-flight request. It is only mutated through
//! `begin_turn`, `complete_turn` and `fail_turn`.

use crate::codec::StructuredReply;
use crate::markup::{self, InlineSpan, RenderNode};
use crate::persona;
use serde::Serialize;
use thiserror::Error;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    #[must_use]
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display nodes for this turn.
    ///
    /// Assistant text is parsed as markup; user text is shown verbatim.
    #[must_use]
    pub fn render(&self) -> Vec<RenderNode> {
        match self.speaker {
            Speaker::Assistant => markup::parse(&self.text),
            Speaker::User => vec![RenderNode::Paragraph {
                spans: vec![InlineSpan::Plain(self.text.clone())],
            }],
        }
    }
}

/// Why a new turn was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectedReason {
    #[error("A request is already in flight")]
    AlreadyInFlight,
    #[error("Message is empty")]
    EmptyInput,
    #[error("Session has been shut down")]
    SessionClosed,
    #[error("No suggestion at that position")]
    NoSuchSuggestion,
}

/// Ordered turn history plus suggestion and in-flight state
#[derive(Debug, Clone)]
pub struct ConversationStore {
    history: Vec<Turn>,
    pending_suggestions: Vec<String>,
    request_in_flight: bool,
}

impl ConversationStore {
    /// Start a conversation with a synthetic assistant welcome turn.
    #[must_use]
    pub fn new(welcome: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            history: vec![Turn::new(Speaker::Assistant, welcome)],
            pending_suggestions: suggestions,
            request_in_flight: false,
        }
    }

    /// Start a conversation seeded with the built-in persona.
    #[must_use]
    pub fn with_persona() -> Self {
        Self::new(persona::WELCOME_MESSAGE, persona::initial_suggestions())
    }

    /// Record a user turn and mark a request as in flight.
    ///
    /// # Errors
    ///
    /// Rejects the turn, leaving the store unchanged, while another request is
    /// in flight or when `user_text` is blank.
    pub fn begin_turn(&mut self, user_text: &str) -> Result<(), RejectedReason> {
        if self.request_in_flight {
            return Err(RejectedReason::AlreadyInFlight);
        }
        if user_text.trim().is_empty() {
            return Err(RejectedReason::EmptyInput);
        }

        self.history.push(Turn::new(Speaker::User, user_text));
        self.request_in_flight = true;
        self.pending_suggestions.clear();
        Ok(())
    }

    /// Record the assistant reply for the in-flight turn.
    pub fn complete_turn(&mut self, reply: StructuredReply) {
        if !self.request_in_flight {
            tracing::warn!("Ignoring reply with no request in flight");
            return;
        }

        let (text, suggestions) = reply.into_parts();
        self.history.push(Turn::new(Speaker::Assistant, text));
        self.pending_suggestions = suggestions;
        self.request_in_flight = false;
    }

    /// End the in-flight turn with a fallback assistant message.
    pub fn fail_turn(&mut self, fallback_text: &str) {
        if !self.request_in_flight {
            tracing::warn!("Ignoring failure with no request in flight");
            return;
        }

        self.history.push(Turn::new(Speaker::Assistant, fallback_text));
        self.pending_suggestions.clear();
        self.request_in_flight = false;
    }

    /// Copy of the history for building the next request
    #[must_use]
    pub fn snapshot(&self) -> Vec<Turn> {
        self.history.clone()
    }

    #[must_use]
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.pending_suggestions
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.request_in_flight
    }
}
