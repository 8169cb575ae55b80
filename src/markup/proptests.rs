//! Property-based tests for the markup parser
//!
//! These tests verify structural invariants of the parse output:
//! - Parsing is deterministic
//! - Every heading line yields exactly one heading node, in order
//! - Lists never come out empty
//! - Text without markup survives untouched

use super::*;
use proptest::prelude::*;

/// A single line built from the markup subset
fn arb_line() -> impl Strategy<Value = String> {
    let words = "[a-zA-Z0-9 .,!?]{0,20}";
    prop_oneof![
        2 => words.prop_map(|w| w),
        1 => words.prop_map(|w| format!("## {w}")),
        2 => words.prop_map(|w| format!("• {w}")),
        1 => (words, words).prop_map(|(a, b)| format!("{a}**{b}**")),
        1 => words.prop_map(|w| format!("**{w}")),
        1 => Just(String::new()),
    ]
}

fn arb_document() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_line(), 0..20).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn prop_parse_is_idempotent(doc in arb_document()) {
        prop_assert_eq!(parse(&doc), parse(&doc));
    }

    #[test]
    fn prop_parse_never_panics(doc in "\\PC*") {
        let _ = parse(&doc);
    }

    #[test]
    fn prop_heading_lines_map_to_heading_nodes(doc in arb_document()) {
        let expected: Vec<String> = doc
            .lines()
            .filter_map(|l| l.strip_prefix("##"))
            .map(|t| t.trim().to_string())
            .collect();
        let actual: Vec<String> = parse(&doc)
            .into_iter()
            .filter_map(|n| match n {
                RenderNode::Heading { text } => Some(text),
                _ => None,
            })
            .collect();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn prop_no_empty_lists_or_paragraphs(doc in arb_document()) {
        for node in parse(&doc) {
            match node {
                RenderNode::BulletList { items } => prop_assert!(!items.is_empty()),
                RenderNode::Paragraph { spans } => prop_assert!(!spans.is_empty()),
                RenderNode::Heading { .. } => {}
            }
        }
    }

    #[test]
    fn prop_bullet_count_preserved(doc in arb_document()) {
        let expected = doc.lines().filter(|l| l.trim_start().starts_with('•')).count();
        let actual: usize = parse(&doc)
            .iter()
            .map(|n| match n {
                RenderNode::BulletList { items } => items.len(),
                _ => 0,
            })
            .sum();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn prop_inline_without_markers_is_single_plain(text in "[a-zA-Z0-9 .,]{1,40}") {
        prop_assert_eq!(parse_inline(&text), vec![InlineSpan::Plain(text.clone())]);
    }

    #[test]
    fn prop_inline_preserves_text(text in "[a-z *]{0,40}") {
        // Removing the delimiters of recognised bold spans must give back the input
        let rebuilt: String = parse_inline(&text)
            .iter()
            .map(|span| match span {
                InlineSpan::Plain(t) => t.clone(),
                InlineSpan::Bold(t) => format!("**{t}**"),
            })
            .collect();
        prop_assert_eq!(rebuilt, text);
    }
}
