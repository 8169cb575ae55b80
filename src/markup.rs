//! Markup subset parser for assistant replies
//!
//! The assistant is instructed to format answers with a small notation:
//! `##` headings, `•` bullet points and `**bold**` spans. Anything else is
//! plain text. Parsing runs in two passes: the reply is first partitioned
//! into heading-delimited sections, then each section body is parsed into
//! paragraphs and bullet lists on its own.

#[cfg(test)]
mod proptests;

use serde::Serialize;

const HEADING_MARKER: &str = "##";
const BULLET_MARKER: char = '•';
const BOLD_DELIMITER: &str = "**";

/// Inline run of text inside a paragraph or list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum InlineSpan {
    Plain(String),
    Bold(String),
}

impl InlineSpan {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            InlineSpan::Plain(text) | InlineSpan::Bold(text) => text,
        }
    }
}

/// Display block produced from a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    Heading { text: String },
    BulletList { items: Vec<Vec<InlineSpan>> },
    Paragraph { spans: Vec<InlineSpan> },
}

/// A heading and the lines it owns, up to the next heading
#[derive(Debug)]
struct Section<'a> {
    heading: Option<&'a str>,
    body: Vec<&'a str>,
}

/// Parse reply text into display nodes, in source order.
///
/// Bare markers are kept: a lone `##` yields an empty heading and a lone `•`
/// an empty list item, so the structure the model emitted is not lost.
#[must_use]
pub fn parse(raw: &str) -> Vec<RenderNode> {
    let mut nodes = Vec::new();
    for section in partition(raw) {
        if let Some(text) = section.heading {
            nodes.push(RenderNode::Heading {
                text: text.to_string(),
            });
        }
        parse_body(&section.body, &mut nodes);
    }
    nodes
}

/// Split `text` into alternating plain and bold spans.
///
/// An opening `**` without a matching close, and an empty `****` pair, are
/// kept as literal text.
#[must_use]
pub fn parse_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some((before, after_open)) = rest.split_once(BOLD_DELIMITER) {
        push_plain(&mut spans, before);
        match after_open.split_once(BOLD_DELIMITER) {
            Some((inner, after_close)) if !inner.is_empty() => {
                spans.push(InlineSpan::Bold(inner.to_string()));
                rest = after_close;
            }
            Some((_, after_close)) => {
                push_plain(&mut spans, BOLD_DELIMITER);
                push_plain(&mut spans, BOLD_DELIMITER);
                rest = after_close;
            }
            None => {
                push_plain(&mut spans, BOLD_DELIMITER);
                rest = after_open;
                break;
            }
        }
    }

    push_plain(&mut spans, rest);
    spans
}

// ============================================================================
// Pass 1: sections
// ============================================================================

/// Partition raw text into heading-delimited sections.
///
/// The first section holds any text before the first heading and is the only
/// one without a heading.
fn partition(raw: &str) -> Vec<Section<'_>> {
    let mut sections = vec![Section {
        heading: None,
        body: Vec::new(),
    }];

    for line in raw.lines() {
        if let Some(heading) = heading_text(line) {
            sections.push(Section {
                heading: Some(heading),
                body: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.body.push(line);
        }
    }

    sections
}

fn heading_text(line: &str) -> Option<&str> {
    line.strip_prefix(HEADING_MARKER).map(str::trim)
}

// ============================================================================
// Pass 2: section bodies
// ============================================================================

fn parse_body(lines: &[&str], nodes: &mut Vec<RenderNode>) {
    let mut paragraph: Vec<&str> = Vec::new();
    let mut items: Vec<Vec<InlineSpan>> = Vec::new();

    for line in lines {
        if let Some(item) = bullet_text(line) {
            flush_paragraph(&mut paragraph, nodes);
            items.push(parse_inline(item));
        } else if line.trim().is_empty() {
            // Blank lines end a paragraph; a list continues until text appears
            flush_paragraph(&mut paragraph, nodes);
        } else {
            flush_list(&mut items, nodes);
            paragraph.push(line.trim());
        }
    }

    flush_paragraph(&mut paragraph, nodes);
    flush_list(&mut items, nodes);
}

fn bullet_text(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix(BULLET_MARKER).map(str::trim)
}

fn flush_paragraph(lines: &mut Vec<&str>, nodes: &mut Vec<RenderNode>) {
    if lines.is_empty() {
        return;
    }

    let mut spans = Vec::new();
    for (i, line) in lines.drain(..).enumerate() {
        if i > 0 {
            push_plain(&mut spans, "\n");
        }
        for span in parse_inline(line) {
            match span {
                InlineSpan::Plain(text) => push_plain(&mut spans, &text),
                bold @ InlineSpan::Bold(_) => spans.push(bold),
            }
        }
    }
    nodes.push(RenderNode::Paragraph { spans });
}

fn flush_list(items: &mut Vec<Vec<InlineSpan>>, nodes: &mut Vec<RenderNode>) {
    if items.is_empty() {
        return;
    }
    nodes.push(RenderNode::BulletList {
        items: std::mem::take(items),
    });
}

/// Append plain text, merging with a trailing plain span.
fn push_plain(spans: &mut Vec<InlineSpan>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineSpan::Plain(last)) = spans.last_mut() {
        last.push_str(text);
    } else {
        spans.push(InlineSpan::Plain(text.to_string()));
    }
}
