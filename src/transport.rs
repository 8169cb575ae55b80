//! Transport abstraction for the remote model
//!
//! The session controller only sees the [`Transport`] trait; the Gemini HTTP
//! client is one implementation and tests substitute mocks.

mod error;
mod gemini;

pub use error::{TransportError, TransportErrorKind};
pub use gemini::{GeminiTransport, GenerationSettings};

use crate::codec::WireRequest;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends one request and returns the model's raw reply text
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &WireRequest) -> Result<String, TransportError>;

    /// Identifier used in log records
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &WireRequest) -> Result<String, TransportError> {
        (**self).send(request).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: Transport> LoggingTransport<T> {
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn send(&self, request: &WireRequest) -> Result<String, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(text) => {
                tracing::info!(
                    model = %self.inner.model_id(),
                    duration_ms = %duration.as_millis(),
                    blocks = request.contents.len(),
                    reply_bytes = text.len(),
                    "Model request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.inner.model_id(),
                    duration_ms = %duration.as_millis(),
                    error_kind = e.kind.as_str(),
                    status = ?e.status,
                    error = %e.message,
                    "Model request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
