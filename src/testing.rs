//! Mock transports for testing
//!
//! These mocks let the session controller run without network I/O.

use crate::codec::WireRequest;
use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

// ============================================================================
// Mock Transport
// ============================================================================

/// Transport that returns queued replies in order
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<String, TransportError>>>,
    /// Record of all requests made
    requests: Mutex<Vec<WireRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue raw reply text
    pub fn queue_reply(&self, raw: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(raw.into()));
    }

    /// Queue a well-formed structured reply
    pub fn queue_structured(&self, response: &str, suggestions: &[&str]) {
        let payload = serde_json::json!({ "response": response, "suggestions": suggestions });
        self.queue_reply(payload.to_string());
    }

    pub fn queue_error(&self, error: TransportError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<WireRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &WireRequest) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("No mock reply queued")))
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

// ============================================================================
// Gated Transport
// ============================================================================

/// Transport that holds every request until released
pub struct GatedTransport {
    gate: Notify,
    reply: String,
}

impl GatedTransport {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            gate: Notify::new(),
            reply: reply.into(),
        }
    }

    /// Let one pending (or the next) request through
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn send(&self, _request: &WireRequest) -> Result<String, TransportError> {
        self.gate.notified().await;
        Ok(self.reply.clone())
    }

    fn model_id(&self) -> &str {
        "gated-model"
    }
}
