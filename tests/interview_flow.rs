//! Integration tests for the full interview flow.
//!
//! These tests drive complete interviews through the orchestrator:
//! 1. Session start produces the configured greeting
//! 2. Participant messages produce adaptive follow-up questions
//! 3. Exit rules close the interview at the right exchange
//! 4. The export reflects everything that happened
//!
//! Uses the in-memory adapters and the mock provider, so no external services
//! are involved.

use std::collections::BTreeMap;
use std::sync::Arc;

use fieldtalk::adapters::catalog::YamlExperimentCatalog;
use fieldtalk::adapters::generation::MockGenerationProvider;
use fieldtalk::adapters::registry::InMemorySessionRegistry;
use fieldtalk::adapters::store::InMemoryConversationStore;
use fieldtalk::application::{Interviewer, FALLBACK_MESSAGE};
use fieldtalk::domain::conversation::{Role, CLOSING_MESSAGE};
use fieldtalk::domain::experiment::ExperimentDefinition;
use fieldtalk::ports::GenerationError;

// =============================================================================
// Test Infrastructure
// =============================================================================

const STUDY_YAML: &str = r#"
name: "Daily Social Interactions"
description: "How people experience everyday conversations"
goals:
  - "Understand the emotional context of the interaction"
  - "Explore the participant's perspective on what happened"
  - "Capture the setting and circumstances"
  - "Learn what the participant would change"
initial_question:
  text: "Can you tell me about a recent conversation that stuck with you?"
  context: "Thanks for taking part in this study."
conversation_guidelines:
  tone: "warm and curious"
  exit_criteria:
    - "3 exchanges completed"
participant_info_fields:
  - name: age
    required: true
  - name: conversation_depth
    required: false
"#;

fn study_definition() -> ExperimentDefinition {
    let parsed: ExperimentDefinition =
        serde_yaml::from_str(STUDY_YAML).expect("study yaml parses");
    parsed.finalize().expect("study yaml is valid")
}

fn interviewer_with(provider: MockGenerationProvider) -> Interviewer {
    let catalog = Arc::new(YamlExperimentCatalog::from_definitions([(
        "daily_social".to_string(),
        study_definition(),
    )]));
    Interviewer::new(
        catalog,
        Arc::new(InMemorySessionRegistry::new()),
        Arc::new(InMemoryConversationStore::new()),
        Arc::new(provider),
    )
}

fn participant_info(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Full Interview Flow
// =============================================================================

#[tokio::test]
async fn interview_runs_from_greeting_to_close() {
    let provider = MockGenerationProvider::new()
        .with_reply("How did that conversation make you feel?")
        .with_reply("What do you think the other person took away from it?");
    let interviewer = interviewer_with(provider.clone());

    let start = interviewer
        .start("p-001", "daily_social", participant_info(&[("age", "29")]))
        .await
        .expect("session starts");

    assert!(start.greeting.starts_with("Thanks for taking part"));
    assert!(start
        .greeting
        .ends_with("Can you tell me about a recent conversation that stuck with you?"));
    assert_eq!(start.exchange_count, 1);
    // The greeting is static, not generated.
    assert_eq!(provider.call_count(), 0);

    let first = interviewer
        .process(&start.session_id, "I argued with my sister about money.")
        .await
        .expect("first turn");
    assert_eq!(first.response_text, "How did that conversation make you feel?");
    assert_eq!(first.exchange_count, 2);
    assert!(!first.is_complete);
    assert!(first.topics_covered.contains(&"perspective".to_string()));

    let second = interviewer
        .process(&start.session_id, "Honestly I felt terrible afterwards.")
        .await
        .expect("second turn");
    assert_eq!(second.exchange_count, 3);
    assert!(!second.is_complete);

    // The exchange budget is 3, so this turn gets the closing message.
    let third = interviewer
        .process(&start.session_id, "We made up eventually.")
        .await
        .expect("closing turn");
    assert_eq!(third.response_text, CLOSING_MESSAGE);
    assert!(third.is_complete);
    // Closing does not count as an exchange.
    assert_eq!(third.exchange_count, 3);

    // The session stays closed.
    let after = interviewer
        .process(&start.session_id, "Anything else?")
        .await
        .expect("terminal turn");
    assert!(after.is_complete);
    assert_eq!(after.exchange_count, 3);
}

#[tokio::test]
async fn export_reflects_the_whole_conversation() {
    let provider = MockGenerationProvider::new().with_reply("What happened next?");
    let interviewer = interviewer_with(provider);

    let start = interviewer
        .start("p-002", "daily_social", participant_info(&[("age", "41")]))
        .await
        .expect("session starts");
    interviewer
        .process(&start.session_id, "I ran into an old friend.")
        .await
        .expect("turn");

    let export = interviewer
        .export(&start.session_id)
        .await
        .expect("export");

    // Greeting, participant message, assistant follow-up.
    assert_eq!(export.metadata.turn_count, 3);
    assert_eq!(export.metadata.response_count, 1);
    assert_eq!(export.turns[0].role, Role::Assistant);
    assert_eq!(export.turns[1].role, Role::Participant);
    assert_eq!(export.turns[1].text, "I ran into an old friend.");
    assert_eq!(export.turns[2].text, "What happened next?");

    // The structured record pairs the previous question with the answer.
    assert!(export.responses[0]
        .question
        .ends_with("stuck with you?"));
    assert_eq!(export.responses[0].answer, "I ran into an old friend.");
}

// =============================================================================
// Exit Rules
// =============================================================================

#[tokio::test]
async fn depth_preference_overrides_the_exit_criteria() {
    let interviewer = interviewer_with(MockGenerationProvider::new());

    let info = participant_info(&[("age", "29"), ("conversation_depth", "Short, 5 exchanges")]);
    let start = interviewer
        .start("p-003", "daily_social", info)
        .await
        .expect("session starts");

    let mut last = None;
    for i in 0..6 {
        let outcome = interviewer
            .process(&start.session_id, &format!("More about moment {i}."))
            .await
            .expect("turn");
        if outcome.is_complete {
            last = Some(outcome);
            break;
        }
    }

    let closing = last.expect("interview closes");
    assert_eq!(closing.response_text, CLOSING_MESSAGE);
    assert_eq!(closing.exchange_count, 5);
}

// =============================================================================
// Failure Handling
// =============================================================================

#[tokio::test]
async fn provider_failure_does_not_advance_the_interview() {
    let provider = MockGenerationProvider::new()
        .with_error(GenerationError::unavailable("overloaded"))
        .with_reply("And how did you respond?");
    let interviewer = interviewer_with(provider);

    let start = interviewer
        .start("p-004", "daily_social", participant_info(&[("age", "52")]))
        .await
        .expect("session starts");

    let failed = interviewer
        .process(&start.session_id, "My neighbour complained again.")
        .await
        .expect("failed turn still answers");
    assert_eq!(failed.response_text, FALLBACK_MESSAGE);
    assert!(!failed.is_complete);
    assert_eq!(failed.exchange_count, 1);

    // Nothing was persisted, so the retry behaves like a first attempt.
    let export = interviewer
        .export(&start.session_id)
        .await
        .expect("export");
    assert_eq!(export.metadata.turn_count, 1);

    let retried = interviewer
        .process(&start.session_id, "My neighbour complained again.")
        .await
        .expect("retry succeeds");
    assert_eq!(retried.response_text, "And how did you respond?");
    assert_eq!(retried.exchange_count, 2);
}

#[tokio::test]
async fn start_rejects_missing_required_fields() {
    let interviewer = interviewer_with(MockGenerationProvider::new());

    let err = interviewer
        .start("p-005", "daily_social", BTreeMap::new())
        .await
        .expect_err("missing field rejected");
    assert!(err.to_string().contains("age"));
}

#[tokio::test]
async fn unknown_experiment_is_rejected() {
    let interviewer = interviewer_with(MockGenerationProvider::new());

    let err = interviewer
        .start("p-006", "nope", BTreeMap::new())
        .await
        .expect_err("unknown experiment rejected");
    assert!(err.to_string().contains("nope"));
}
