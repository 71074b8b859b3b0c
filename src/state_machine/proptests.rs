//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::state::*;
use super::transition::*;
use super::*;
use crate::agent::{AgentCallResult, AgentResponse};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Test Harness
// ============================================================================

/// Applies the session-side effects the way the runtime does, recording the
/// effects that leave the machine (agent calls, activity toggles).
struct Harness {
    session: Session,
    retired_sessions: Vec<String>,
    calls: Vec<(String, String)>,
    processing: Vec<bool>,
}

impl Harness {
    fn new() -> Self {
        Self {
            session: Session::with_id("session-0"),
            retired_sessions: Vec::new(),
            calls: Vec::new(),
            processing: Vec::new(),
        }
    }

    fn dispatch(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(&self.session, event)?;
        for effect in result.effects {
            match effect {
                Effect::AppendUserMessage { text } => self.session.append(ConversationMessage::user(text)),
                Effect::AppendAgentMessage { payload } => {
                    self.session.append(ConversationMessage::agent(payload));
                }
                Effect::SetLastError(error) => self.session.set_last_error(error),
                Effect::InvokeAgent { session_id, prompt } => self.calls.push((session_id, prompt)),
                Effect::SetProcessing(processing) => self.processing.push(processing),
                Effect::ReplaceSession => {
                    self.retired_sessions.push(self.session.id().to_string());
                    let next = format!("session-{}", self.retired_sessions.len());
                    self.session = Session::with_id(next);
                }
                Effect::UpdateQualification { .. } | Effect::ResetActivity => {}
            }
        }
        self.session.set_state(result.new_state);
        Ok(())
    }

    fn user_count(&self) -> usize {
        self.session
            .messages()
            .iter()
            .filter(|m| matches!(m, ConversationMessage::User { .. }))
            .count()
    }

    fn agent_count(&self) -> usize {
        self.session.messages().len() - self.user_count()
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_prompt() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 +]{1,40}",
        Just(String::new()),
        Just("   ".to_string()),
    ]
}

fn arb_payload() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!(42)),
        "[a-zA-Z ]{0,30}".prop_map(Value::String),
        "[a-zA-Z ]{1,30}".prop_map(|s| json!({ "summary": s, "qualification_probability": "64%" })),
        "[a-zA-Z ]{1,30}".prop_map(|s| json!({ "text": json!({ "summary": s }).to_string() })),
        Just(json!(["not", "an", "object"])),
    ]
}

fn arb_call_result() -> impl Strategy<Value = AgentCallResult> {
    (
        any::<bool>(),
        arb_payload(),
        proptest::option::of("[a-z ]{0,20}"),
        proptest::option::of("[a-z ]{0,20}"),
    )
        .prop_map(|(success, result, message, error)| AgentCallResult {
            success,
            response: Some(AgentResponse { result, message }),
            error,
        })
}

fn arb_outcome() -> impl Strategy<Value = CallOutcome> {
    prop_oneof![
        arb_call_result().prop_map(CallOutcome::Completed),
        "[a-zA-Z ]{0,30}".prop_map(CallOutcome::Failed),
    ]
}

#[derive(Debug, Clone)]
enum Action {
    Submit(String),
    Retry(String),
    Reset,
    /// Resolve the oldest outstanding call, current or stale
    Resolve(CallOutcome),
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => arb_prompt().prop_map(Action::Submit),
        1 => arb_prompt().prop_map(Action::Retry),
        1 => Just(Action::Reset),
        3 => arb_outcome().prop_map(Action::Resolve),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Submitting while a request is in flight never changes anything
    #[test]
    fn prop_submit_while_sending_is_rejected(prompt in "[a-zA-Z0-9+]{1,40}", other in arb_prompt()) {
        let mut harness = Harness::new();
        harness.dispatch(Event::Submit { text: prompt }).unwrap();
        let before = harness.session.clone();

        let result = harness.dispatch(Event::Submit { text: other });
        prop_assert!(result.is_err());
        prop_assert_eq!(&harness.session, &before);
        prop_assert_eq!(harness.calls.len(), 1);
    }

    /// Every resolution of the active request lands in Idle with one agent message
    #[test]
    fn prop_resolution_always_returns_to_idle(prompt in "[a-z]{1,20}", outcome in arb_outcome()) {
        let mut harness = Harness::new();
        harness.dispatch(Event::Submit { text: prompt }).unwrap();
        let session_id = harness.session.id().to_string();

        harness.dispatch(Event::AgentResolved { session_id, outcome }).unwrap();

        prop_assert_eq!(harness.session.state(), &ConvState::Idle);
        prop_assert_eq!(harness.agent_count(), 1);
        prop_assert_eq!(harness.processing.as_slice(), &[true, false]);

        let failed = harness.session.messages()[1].is_failure();
        prop_assert_eq!(failed, harness.session.last_error().is_some());
    }

    /// Invariants over arbitrary interleavings of user actions and completions
    #[test]
    fn prop_event_sequences_preserve_invariants(actions in proptest::collection::vec(arb_action(), 1..40)) {
        let mut harness = Harness::new();
        let mut outstanding: Vec<String> = Vec::new();

        for action in actions {
            let calls_before = harness.calls.len();
            let len_before = harness.session.messages().len();
            let was_sending = harness.session.in_flight();

            let event = match action {
                Action::Submit(text) => Event::Submit { text },
                Action::Retry(text) => Event::Retry { text },
                Action::Reset => Event::Reset,
                Action::Resolve(outcome) => {
                    if outstanding.is_empty() {
                        continue;
                    }
                    let session_id = outstanding.remove(0);
                    Event::AgentResolved { session_id, outcome }
                }
            };
            let is_submit = matches!(event, Event::Submit { .. } | Event::Retry { .. });
            let _ = harness.dispatch(event);

            if harness.calls.len() > calls_before {
                outstanding.push(harness.calls.last().unwrap().0.clone());
            }

            // single flight: no new call while a request was already in flight
            if was_sending && is_submit {
                prop_assert_eq!(harness.calls.len(), calls_before);
                prop_assert_eq!(harness.session.messages().len(), len_before);
            }

            // at most one agent message per user message
            prop_assert!(harness.agent_count() <= harness.user_count());
            if !harness.session.in_flight() {
                prop_assert_eq!(harness.agent_count(), harness.user_count());
            } else {
                prop_assert_eq!(harness.agent_count() + 1, harness.user_count());
            }

            // message ids stay unique
            let mut ids: Vec<&str> = harness.session.messages().iter().map(ConversationMessage::id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), harness.session.messages().len());
        }
    }

    /// Completions for a retired session never touch the new one
    #[test]
    fn prop_stale_completions_are_ignored(prompt in "[a-z]{1,20}", outcome in arb_outcome()) {
        let mut harness = Harness::new();
        harness.dispatch(Event::Submit { text: prompt }).unwrap();
        let old_session = harness.session.id().to_string();

        harness.dispatch(Event::Reset).unwrap();
        let fresh = harness.session.clone();

        let result = harness.dispatch(Event::AgentResolved { session_id: old_session, outcome });
        let is_stale = matches!(result, Err(TransitionError::StaleSession { .. }));
        prop_assert!(is_stale);
        prop_assert_eq!(&harness.session, &fresh);
        prop_assert!(harness.session.messages().is_empty());
    }
}

/// Retry after a failure resubmits the prior text and keeps the failure in the log
#[test]
fn test_retry_after_failure_keeps_failed_message() {
    let mut harness = Harness::new();
    harness
        .dispatch(Event::Submit {
            text: "Beat Australia by 30+ runs".to_string(),
        })
        .unwrap();
    let session_id = harness.session.id().to_string();
    harness
        .dispatch(Event::AgentResolved {
            session_id: session_id.clone(),
            outcome: CallOutcome::Failed("Request timeout".to_string()),
        })
        .unwrap();
    assert_eq!(harness.session.last_error(), Some("Request timeout"));

    let text = harness.session.last_user_text().unwrap().to_string();
    harness.dispatch(Event::Retry { text }).unwrap();
    assert_eq!(harness.session.last_error(), None);
    assert_eq!(harness.calls[1].1, "Beat Australia by 30+ runs");

    harness
        .dispatch(Event::AgentResolved {
            session_id,
            outcome: CallOutcome::Completed(AgentCallResult::ok(json!({ "summary": "Two wins needed" }))),
        })
        .unwrap();

    let messages = harness.session.messages();
    assert_eq!(messages.len(), 4);
    assert!(messages[1].is_failure());
    assert!(matches!(
        &messages[3],
        ConversationMessage::Agent { payload: AgentPayload::Parsed(r), .. } if r.summary == "Two wins needed"
    ));
}
