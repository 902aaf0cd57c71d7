//! Experiment definition - the immutable description of one study.
//!
//! Loaded once by the experiment catalog and shared read-only across every
//! session of that experiment. The definition carries the research goals, the
//! opening probe, conversation guidelines, follow-up categories, and the
//! participant-info fields the study requires.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::ExitRules;

/// One study's configuration.
///
/// # Invariants
///
/// - `name` is non-empty
/// - `goals` is non-empty
/// - `initial_question.text` is non-empty
/// - Never mutated after load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentDefinition {
    /// Human-readable study name.
    pub name: String,

    /// Short description of what the study investigates.
    #[serde(default)]
    pub description: String,

    /// Ordered research goals the interview should cover.
    pub goals: Vec<String>,

    /// The configured opening probe.
    pub initial_question: InitialQuestion,

    /// Tone, style, approach, and exit criteria for the interviewer.
    #[serde(default)]
    pub conversation_guidelines: ConversationGuidelines,

    /// Follow-up question categories the interviewer may explore.
    #[serde(default)]
    pub follow_up_categories: BTreeMap<String, FollowUpCategory>,

    /// Participant-info fields collected before the interview starts.
    #[serde(default)]
    pub participant_info_fields: Vec<ParticipantField>,

    /// Exit rules parsed from the free-text criteria at load time.
    #[serde(skip)]
    exit_rules: ExitRules,
}

/// The static opening probe for an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialQuestion {
    /// The question text itself.
    pub text: String,
    /// Optional framing shown before the question.
    #[serde(default)]
    pub context: Option<String>,
}

impl InitialQuestion {
    /// Renders the greeting: context and question separated by a blank line
    /// when context is present, otherwise just the question.
    pub fn greeting(&self) -> String {
        match self.context.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(context) => format!("{}\n\n{}", context, self.text),
            None => self.text.clone(),
        }
    }
}

/// Guidelines steering the interviewer's manner and stopping behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationGuidelines {
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub approach: String,
    /// Human-authored stopping rules. One may encode a maximum-exchange rule,
    /// extracted into [`ExitRules`] at load time.
    #[serde(default)]
    pub exit_criteria: Vec<String>,
}

fn default_tone() -> String {
    "warm and curious".to_string()
}

fn default_style() -> String {
    "conversational".to_string()
}

/// A follow-up category the interviewer can draw on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowUpCategory {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example_questions: Vec<String>,
}

/// One participant-info field declared by the experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantField {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Reasons a definition entry is rejected at load time.
#[derive(Debug, Clone, Error)]
pub enum DefinitionError {
    #[error("experiment name is empty")]
    EmptyName,
    #[error("goals list is empty")]
    NoGoals,
    #[error("initial question text is empty")]
    EmptyInitialQuestion,
}

impl ExperimentDefinition {
    /// Validates the definition and parses its exit rules.
    ///
    /// Called once by the catalog after deserialization; a definition that
    /// fails here is skipped with a warning rather than aborting the load.
    pub fn finalize(mut self) -> Result<Self, DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::EmptyName);
        }
        if self.goals.is_empty() {
            return Err(DefinitionError::NoGoals);
        }
        if self.initial_question.text.trim().is_empty() {
            return Err(DefinitionError::EmptyInitialQuestion);
        }

        self.exit_rules = ExitRules::from_criteria(&self.conversation_guidelines.exit_criteria);
        Ok(self)
    }

    /// Returns the exit rules parsed at load time.
    pub fn exit_rules(&self) -> &ExitRules {
        &self.exit_rules
    }

    /// Names of participant-info fields the experiment marks required,
    /// missing from the supplied info mapping.
    pub fn missing_required_fields(
        &self,
        participant_info: &BTreeMap<String, String>,
    ) -> Vec<String> {
        self.participant_info_fields
            .iter()
            .filter(|field| field.required && !participant_info.contains_key(&field.name))
            .map(|field| field.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        r#"
name: "Empathy Study"
description: "Empathy in daily social interactions"
goals:
  - "Build rapport"
  - "Understand emotional context"
initial_question:
  text: "Can you tell me about a recent interaction you had with another person?"
  context: "Thanks for taking part today."
conversation_guidelines:
  tone: "warm"
  exit_criteria:
    - "8-10 exchanges completed"
participant_info_fields:
  - name: age
    required: true
    type: number
  - name: occupation
    required: false
"#
    }

    fn load(yaml: &str) -> Result<ExperimentDefinition, DefinitionError> {
        let parsed: ExperimentDefinition = serde_yaml::from_str(yaml).unwrap();
        parsed.finalize()
    }

    #[test]
    fn finalize_accepts_complete_definition() {
        let def = load(minimal_yaml()).unwrap();
        assert_eq!(def.name, "Empathy Study");
        assert_eq!(def.goals.len(), 2);
        assert_eq!(def.exit_rules().max_exchanges(), Some(8));
    }

    #[test]
    fn finalize_rejects_empty_goals() {
        let yaml = r#"
name: "Study"
goals: []
initial_question:
  text: "Hello?"
"#;
        assert!(matches!(load(yaml), Err(DefinitionError::NoGoals)));
    }

    #[test]
    fn finalize_rejects_blank_initial_question() {
        let yaml = r#"
name: "Study"
goals: ["one"]
initial_question:
  text: "   "
"#;
        assert!(matches!(
            load(yaml),
            Err(DefinitionError::EmptyInitialQuestion)
        ));
    }

    #[test]
    fn greeting_joins_context_with_blank_line() {
        let q = InitialQuestion {
            text: "What happened?".to_string(),
            context: Some("Welcome.".to_string()),
        };
        assert_eq!(q.greeting(), "Welcome.\n\nWhat happened?");
    }

    #[test]
    fn greeting_without_context_is_just_the_question() {
        let q = InitialQuestion {
            text: "What happened?".to_string(),
            context: None,
        };
        assert_eq!(q.greeting(), "What happened?");

        let blank = InitialQuestion {
            text: "What happened?".to_string(),
            context: Some("  ".to_string()),
        };
        assert_eq!(blank.greeting(), "What happened?");
    }

    #[test]
    fn missing_required_fields_ignores_optional() {
        let def = load(minimal_yaml()).unwrap();

        let empty = BTreeMap::new();
        assert_eq!(def.missing_required_fields(&empty), vec!["age"]);

        let mut info = BTreeMap::new();
        info.insert("age".to_string(), "34".to_string());
        assert!(def.missing_required_fields(&info).is_empty());
    }
}
