//! Session controller
//!
//! Runs one user turn at a time: records the user turn, builds the request
//! from the history as it was before that turn, waits on the transport, and
//! records the reply. Transport and decode failures end the turn with the
//! apology message; nothing is retried.

#[cfg(test)]
mod proptests;

use crate::codec::{self, DecodeError};
use crate::conversation::{ConversationStore, RejectedReason, Turn};
use crate::persona;
use crate::transport::{Transport, TransportError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a turn ended with the fallback message
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),
    #[error("Reply could not be decoded: {0}")]
    Decode(#[from] DecodeError),
}

impl TurnError {
    /// Short label used in log records
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TurnError::Transport(e) => e.kind.as_str(),
            TurnError::Decode(e) => e.kind(),
        }
    }
}

/// How an accepted turn ended
#[derive(Debug)]
pub enum TurnOutcome {
    /// Reply decoded and recorded with its suggestions
    Completed,
    /// Fallback message recorded
    Failed(TurnError),
    /// Session shut down while waiting; nothing recorded
    Cancelled,
}

/// Orchestrates turns for a single conversation
pub struct SessionController<T> {
    store: Mutex<ConversationStore>,
    transport: T,
    instruction: String,
    fallback_text: String,
    cancel: CancellationToken,
    session_id: String,
}

impl<T: Transport> SessionController<T> {
    /// Session seeded with the built-in persona welcome, suggestions and apology.
    #[must_use]
    pub fn new(transport: T, instruction: impl Into<String>) -> Self {
        Self::with_store(
            transport,
            instruction,
            ConversationStore::with_persona(),
            persona::APOLOGY,
        )
    }

    #[must_use]
    pub fn with_store(
        transport: T,
        instruction: impl Into<String>,
        store: ConversationStore,
        fallback_text: impl Into<String>,
    ) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %session_id, model = %transport.model_id(), "Session started");
        Self {
            store: Mutex::new(store),
            transport,
            instruction: instruction.into(),
            fallback_text: fallback_text.into(),
            cancel: CancellationToken::new(),
            session_id,
        }
    }

    /// Submit a user message and wait for the turn to finish.
    ///
    /// Rejections leave the conversation untouched. Every accepted turn ends
    /// with an assistant turn, unless the session is shut down first. Dropping
    /// the returned future while it waits on the transport ends the turn with
    /// the fallback message, so the session never stays stuck in flight.
    ///
    /// # Errors
    ///
    /// Returns a [`RejectedReason`] when the session is closed, a turn is
    /// already in flight, or the text is blank.
    pub async fn submit(&self, user_text: &str) -> Result<TurnOutcome, RejectedReason> {
        if self.cancel.is_cancelled() {
            return Err(RejectedReason::SessionClosed);
        }

        let request = {
            let mut store = self.lock_store();
            // Snapshot before the user turn exists; it travels as the trailing block
            let history = store.snapshot();
            if let Err(reason) = store.begin_turn(user_text) {
                tracing::debug!(
                    session_id = %self.session_id,
                    reason = %reason,
                    "Submission rejected"
                );
                return Err(reason);
            }
            codec::build_request(&history, &self.instruction, user_text)
        };
        let guard = InFlightGuard {
            store: &self.store,
            fallback_text: &self.fallback_text,
            session_id: &self.session_id,
            armed: true,
        };

        tracing::debug!(
            session_id = %self.session_id,
            blocks = request.contents.len(),
            "Turn started"
        );

        let sent = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            result = self.transport.send(&request) => Some(result),
        };
        guard.disarm();

        let Some(sent) = sent else {
            tracing::info!(session_id = %self.session_id, "Turn cancelled by session shutdown");
            return Ok(TurnOutcome::Cancelled);
        };

        let decoded = sent
            .map_err(TurnError::from)
            .and_then(|raw| codec::decode_reply(&raw).map_err(TurnError::from));

        let mut store = self.lock_store();
        match decoded {
            Ok(reply) => {
                tracing::info!(
                    session_id = %self.session_id,
                    suggestions = reply.suggestions().len(),
                    "Turn completed"
                );
                store.complete_turn(reply);
                Ok(TurnOutcome::Completed)
            }
            Err(error) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    error_kind = error.kind(),
                    error = %error,
                    "Turn failed, replying with fallback"
                );
                store.fail_turn(&self.fallback_text);
                Ok(TurnOutcome::Failed(error))
            }
        }
    }

    /// Submit the pending suggestion at `index`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit`], plus [`RejectedReason::NoSuchSuggestion`]
    /// when `index` is past the pending suggestions.
    pub async fn submit_suggestion(&self, index: usize) -> Result<TurnOutcome, RejectedReason> {
        let text = {
            let store = self.lock_store();
            if store.is_in_flight() {
                return Err(RejectedReason::AlreadyInFlight);
            }
            store
                .suggestions()
                .get(index)
                .cloned()
                .ok_or(RejectedReason::NoSuchSuggestion)?
        };
        self.submit(&text).await
    }

    /// Cancel any pending network wait and refuse further submissions.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!(session_id = %self.session_id, "Session shutting down");
            self.cancel.cancel();
        }
    }

    /// Resolves once the session has been shut down.
    pub async fn closed(&self) {
        self.cancel.cancelled().await;
    }

    #[must_use]
    pub fn history(&self) -> Vec<Turn> {
        self.lock_store().snapshot()
    }

    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        self.lock_store().suggestions().to_vec()
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.lock_store().is_in_flight()
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn lock_store(&self) -> MutexGuard<'_, ConversationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fails the in-flight turn if `submit` is dropped before the transport answers
struct InFlightGuard<'a> {
    store: &'a Mutex<ConversationStore>,
    fallback_text: &'a str,
    session_id: &'a str,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(
                session_id = %self.session_id,
                "Turn abandoned while waiting, replying with fallback"
            );
            self.store
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .fail_turn(self.fallback_text);
        }
    }
}
