//! Property-based tests for the session controller
//!
//! For any sequence of submissions and transport outcomes:
//! - No request is in flight once a submission returns
//! - Blank submissions never touch the history or the transport
//! - Accepted submissions add exactly one user and one assistant turn
//! - Each request carries the history as it was before its user turn

use super::*;
use crate::codec::history_from_request;
use crate::conversation::Speaker;
use crate::testing::MockTransport;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Reply {
    Structured(usize),
    Malformed,
    TransportFailure,
}

fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        1 => "[ \\t\\n]{1,4}",
        4 => "[a-zA-Z][a-zA-Z0-9 ?]{0,20}",
    ]
}

fn arb_reply() -> impl Strategy<Value = Reply> {
    prop_oneof![
        3 => (0usize..=4).prop_map(Reply::Structured),
        1 => Just(Reply::Malformed),
        1 => Just(Reply::TransportFailure),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_turn_invariants(steps in proptest::collection::vec((arb_input(), arb_reply()), 0..12)) {
        let rt = runtime();
        let mock = Arc::new(MockTransport::new());
        let controller = SessionController::with_store(
            Arc::clone(&mock),
            "RULES",
            ConversationStore::new("welcome", vec!["s".to_string()]),
            "sorry",
        );

        for (input, reply) in steps {
            let before = controller.history();
            let base = before.len();
            let suggestions_before = controller.suggestions();
            let requests_before = mock.recorded_requests().len();
            let accepted = !input.trim().is_empty();

            if accepted {
                match &reply {
                    Reply::Structured(n) => {
                        let suggestions: Vec<String> = (0..*n).map(|i| format!("s{i}")).collect();
                        let refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
                        mock.queue_structured("answer", &refs);
                    }
                    Reply::Malformed => mock.queue_reply("{\"response\": 1}"),
                    Reply::TransportFailure => mock.queue_error(TransportError::network("down")),
                }
            }

            let result = rt.block_on(controller.submit(&input));
            prop_assert!(!controller.is_in_flight());

            let after = controller.history();
            if accepted {
                prop_assert!(result.is_ok());
                prop_assert_eq!(after.len(), base + 2);
                prop_assert_eq!(after[base].speaker(), Speaker::User);
                prop_assert_eq!(after[base + 1].speaker(), Speaker::Assistant);

                let requests = mock.recorded_requests();
                prop_assert_eq!(requests.len(), requests_before + 1);
                prop_assert_eq!(history_from_request(&requests[requests_before]), before);

                match reply {
                    Reply::Structured(n) => {
                        prop_assert_eq!(controller.suggestions().len(), n);
                    }
                    Reply::Malformed | Reply::TransportFailure => {
                        prop_assert!(controller.suggestions().is_empty());
                        prop_assert_eq!(after[base + 1].text(), "sorry");
                    }
                }
            } else {
                prop_assert!(matches!(result, Err(RejectedReason::EmptyInput)));
                prop_assert_eq!(after, before);
                prop_assert_eq!(controller.suggestions(), suggestions_before);
                prop_assert_eq!(mock.recorded_requests().len(), requests_before);
            }
        }
    }
}
