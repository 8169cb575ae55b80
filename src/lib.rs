//! Nour - structured-reply study chat
//!
//! Conversation core for a single chat session with a remote model: the
//! model must answer with a JSON object carrying the reply text and follow-up
//! suggestions, and reply text uses a small markup subset rendered into
//! display nodes.

pub mod codec;
pub mod config;
pub mod conversation;
pub mod markup;
pub mod persona;
pub mod session;
pub mod terminal;
pub mod transport;

#[cfg(test)]
mod testing;

pub use codec::{build_request, decode_reply, DecodeError, StructuredReply, WireRequest};
pub use config::{Config, ConfigError};
pub use conversation::{ConversationStore, RejectedReason, Speaker, Turn};
pub use markup::{parse, InlineSpan, RenderNode};
pub use session::{SessionController, TurnError, TurnOutcome};
pub use transport::{
    GeminiTransport, LoggingTransport, Transport, TransportError, TransportErrorKind,
};
