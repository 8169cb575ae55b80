//! Line-oriented terminal front end
//!
//! Turns display nodes into styled text and interprets input lines. This is
//! the presentation side only; all conversation state lives in the session
//! controller.

use crate::conversation::{Speaker, Turn};
use crate::markup::{InlineSpan, RenderNode};
use crossterm::style::Stylize;
use std::fmt::Write;

const ASSISTANT_LABEL: &str = "نور";
const USER_LABEL: &str = "أنت";
const QUIT_COMMAND: &str = "/quit";
const COMMAND_PREFIX: char = '/';

/// What an input line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Zero-based index into the pending suggestions
    Suggestion(usize),
    Message(String),
}

/// Interpret one input line.
///
/// `/n` picks the suggestion shown as `/n`. Anything else, bare numbers
/// included, is a message.
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed == QUIT_COMMAND {
        return Command::Quit;
    }
    let pick = trimmed
        .strip_prefix(COMMAND_PREFIX)
        .and_then(|n| n.parse::<usize>().ok());
    match pick {
        Some(n) if n >= 1 => Command::Suggestion(n - 1),
        _ => Command::Message(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

#[must_use]
pub fn render_turn(turn: &Turn) -> String {
    let label = match turn.speaker() {
        Speaker::Assistant => ASSISTANT_LABEL.green().bold(),
        Speaker::User => USER_LABEL.blue().bold(),
    };
    format!("{label}\n{}", render_nodes(&turn.render()))
}

#[must_use]
pub fn render_nodes(nodes: &[RenderNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            RenderNode::Heading { text } => {
                let _ = writeln!(out, "{}", text.as_str().bold().cyan());
            }
            RenderNode::BulletList { items } => {
                for item in items {
                    let _ = writeln!(out, "  • {}", render_spans(item));
                }
            }
            RenderNode::Paragraph { spans } => {
                let _ = writeln!(out, "{}", render_spans(spans));
            }
        }
    }
    out
}

#[must_use]
pub fn render_suggestions(suggestions: &[String]) -> String {
    let mut out = String::new();
    for (i, suggestion) in suggestions.iter().enumerate() {
        let number = format!("[{COMMAND_PREFIX}{}]", i + 1);
        let _ = writeln!(out, "  {} {suggestion}", number.as_str().dark_grey());
    }
    out
}

fn render_spans(spans: &[InlineSpan]) -> String {
    spans
        .iter()
        .map(|span| match span {
            InlineSpan::Plain(text) => text.clone(),
            InlineSpan::Bold(text) => text.as_str().bold().to_string(),
        })
        .collect()
}
