//! Property-based tests for the turn codec
//!
//! - Request assembly is invertible: the history comes back unchanged
//! - The instruction is always first and the new user text always last
//! - Well-formed replies decode regardless of fencing
//! - Decoding arbitrary text never panics

use super::*;
use proptest::prelude::*;

fn arb_speaker() -> impl Strategy<Value = Speaker> {
    prop_oneof![Just(Speaker::User), Just(Speaker::Assistant)]
}

fn arb_turn() -> impl Strategy<Value = Turn> {
    (arb_speaker(), "[a-zA-Z0-9 #•*\\n]{0,60}")
        .prop_map(|(speaker, text)| Turn::new(speaker, text))
}

fn arb_history() -> impl Strategy<Value = Vec<Turn>> {
    proptest::collection::vec(arb_turn(), 0..12)
}

fn arb_suggestions() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-zA-Z0-9 ?]{0,30}", 0..=MAX_SUGGESTIONS)
}

fn arb_fence() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        Just((String::new(), String::new())),
        Just(("```json\n".to_string(), "\n```".to_string())),
        Just(("```\n".to_string(), "\n```".to_string())),
        Just(("```JSON".to_string(), "```".to_string())),
    ]
}

proptest! {
    #[test]
    fn prop_build_request_round_trips_history(
        history in arb_history(),
        instruction in "[a-z ]{1,40}",
        new_text in "[a-z ]{1,40}",
    ) {
        let request = build_request(&history, &instruction, &new_text);
        prop_assert_eq!(request.contents.len(), history.len() + 2);
        prop_assert_eq!(history_from_request(&request), history);
    }

    #[test]
    fn prop_instruction_first_and_user_text_last(
        history in arb_history(),
        instruction in "[a-z ]{1,40}",
        new_text in "[a-z ]{1,40}",
    ) {
        let request = build_request(&history, &instruction, &new_text);
        let first = request.contents.first().unwrap();
        let last = request.contents.last().unwrap();
        prop_assert_eq!(first.role, WireRole::User);
        prop_assert_eq!(first.joined_text(), instruction);
        prop_assert_eq!(last.role, WireRole::User);
        prop_assert_eq!(last.joined_text(), new_text);
    }

    #[test]
    fn prop_well_formed_reply_decodes(
        text in "[a-zA-Z0-9 #•*\\n]{0,80}",
        suggestions in arb_suggestions(),
        (open, close) in arb_fence(),
    ) {
        let payload = serde_json::json!({ "response": text, "suggestions": suggestions });
        let raw = format!("{open}{payload}{close}");
        let decoded = decode_reply(&raw).unwrap();
        prop_assert_eq!(decoded.response_text(), text.as_str());
        prop_assert_eq!(decoded.suggestions(), suggestions.as_slice());
    }

    #[test]
    fn prop_decode_never_panics(raw in "\\PC*") {
        let _ = decode_reply(&raw);
    }

    #[test]
    fn prop_decoded_suggestions_bounded(count in 0usize..10) {
        let suggestions: Vec<String> = (0..count).map(|i| format!("s{i}")).collect();
        let raw = serde_json::json!({ "response": "ok", "suggestions": suggestions }).to_string();
        let decoded = decode_reply(&raw).unwrap();
        prop_assert_eq!(decoded.suggestions().len(), count.min(MAX_SUGGESTIONS));
    }
}
