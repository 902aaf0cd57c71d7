//! Exit policy - decides when the interview has gathered enough material.
//!
//! Conditions are evaluated in fixed precedence order; the first true
//! condition ends the interview. Layering the participant's depth preference
//! over the experiment's parsed exit rules lets studies offer adjustable
//! depth without per-experiment code changes.

use crate::domain::experiment::ExperimentDefinition;

use super::{ConversationState, Stage};

/// Default maximum exchange count when neither the participant nor the
/// experiment specifies one.
pub const DEFAULT_MAX_EXCHANGES: u32 = 8;

/// Depth-preference table, matched case-sensitively in listed order against
/// the participant's `conversation_depth` string. First match wins.
const DEPTH_PREFERENCES: &[(&[&str], u32)] = &[
    (&["Short", "5"], 5),
    (&["Medium", "8"], 8),
    (&["Deep", "12"], 12),
];

/// Outcome of an exit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    Continue,
    End,
}

/// Evaluates whether an interview should end.
pub struct ExitPolicy;

impl ExitPolicy {
    /// Evaluates the exit conditions in precedence order.
    pub fn evaluate(
        definition: &ExperimentDefinition,
        state: &ConversationState,
        depth_preference: Option<&str>,
    ) -> ExitDecision {
        // 1. Continuation already latched off.
        if !state.should_continue {
            return ExitDecision::End;
        }

        // 2. Exchange budget exhausted.
        let max_exchanges = Self::max_exchanges(definition, depth_preference);
        if state.exchange_count >= max_exchanges {
            return ExitDecision::End;
        }

        // 3. Coverage count reaches goal count (coarse proxy, not per-goal).
        if state.topics_covered.len() >= definition.goals.len() {
            return ExitDecision::End;
        }

        // 4. Already closing.
        if state.stage == Stage::Closing {
            return ExitDecision::End;
        }

        ExitDecision::Continue
    }

    /// Resolves the maximum exchange count: participant depth preference
    /// first, then the experiment's parsed exit rule, then the default.
    pub fn max_exchanges(
        definition: &ExperimentDefinition,
        depth_preference: Option<&str>,
    ) -> u32 {
        if let Some(preference) = depth_preference {
            for (needles, max) in DEPTH_PREFERENCES {
                if needles.iter().any(|needle| preference.contains(needle)) {
                    return *max;
                }
            }
        }

        definition
            .exit_rules()
            .max_exchanges()
            .unwrap_or(DEFAULT_MAX_EXCHANGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Turn;

    fn definition(goals: &[&str], exit_criteria: &[&str]) -> ExperimentDefinition {
        let yaml = format!(
            r#"
name: "Test Study"
goals: [{}]
initial_question:
  text: "Tell me about your day?"
conversation_guidelines:
  exit_criteria: [{}]
"#,
            goals
                .iter()
                .map(|g| format!("\"{g}\""))
                .collect::<Vec<_>>()
                .join(", "),
            exit_criteria
                .iter()
                .map(|c| format!("\"{c}\""))
                .collect::<Vec<_>>()
                .join(", "),
        );
        let parsed: ExperimentDefinition = serde_yaml::from_str(&yaml).unwrap();
        parsed.finalize().unwrap()
    }

    fn exploring_state(exchange_count: u32) -> ConversationState {
        ConversationState::rehydrate(
            vec![
                Turn::assistant("Tell me about your day?"),
                Turn::participant("It went okay."),
            ],
            exchange_count,
            true,
        )
    }

    #[test]
    fn depth_preference_overrides_exit_criteria() {
        let def = definition(&["a", "b", "c"], &["Stop after 10 exchanges completed"]);
        assert_eq!(
            ExitPolicy::max_exchanges(&def, Some("Deep, 12 exchanges")),
            12
        );
    }

    #[test]
    fn exit_criteria_apply_without_preference() {
        let def = definition(&["a", "b", "c"], &["Stop after 10 exchanges completed"]);
        assert_eq!(ExitPolicy::max_exchanges(&def, None), 10);
    }

    #[test]
    fn default_applies_when_nothing_configured() {
        let def = definition(&["a", "b", "c"], &[]);
        assert_eq!(ExitPolicy::max_exchanges(&def, None), DEFAULT_MAX_EXCHANGES);
    }

    #[test]
    fn depth_preference_matches_in_listed_order() {
        let def = definition(&["a"], &[]);
        // "Short" is checked before "Medium" and "Deep".
        assert_eq!(ExitPolicy::max_exchanges(&def, Some("Short")), 5);
        assert_eq!(ExitPolicy::max_exchanges(&def, Some("Medium")), 8);
        // Match is case-sensitive; lowercase falls through to the default.
        assert_eq!(
            ExitPolicy::max_exchanges(&def, Some("deep")),
            DEFAULT_MAX_EXCHANGES
        );
    }

    #[test]
    fn latched_should_continue_ends_first() {
        let def = definition(&["a", "b", "c"], &[]);
        let mut state = exploring_state(0);
        state.should_continue = false;
        assert_eq!(ExitPolicy::evaluate(&def, &state, None), ExitDecision::End);
    }

    #[test]
    fn exchange_budget_ends_the_interview() {
        let def = definition(&["a", "b", "c"], &[]);
        let state = exploring_state(DEFAULT_MAX_EXCHANGES);
        assert_eq!(ExitPolicy::evaluate(&def, &state, None), ExitDecision::End);
    }

    #[test]
    fn full_topic_coverage_ends_the_interview() {
        let def = definition(&["rapport"], &[]);
        let mut state = exploring_state(1);
        state.topics_covered.insert("emotion".to_string());
        assert_eq!(ExitPolicy::evaluate(&def, &state, None), ExitDecision::End);
    }

    #[test]
    fn continues_with_budget_and_goals_remaining() {
        let def = definition(&["a", "b", "c"], &[]);
        let state = exploring_state(2);
        assert_eq!(
            ExitPolicy::evaluate(&def, &state, None),
            ExitDecision::Continue
        );
    }
}
