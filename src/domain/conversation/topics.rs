//! Topic tracker - keyword-driven coverage classification.
//!
//! Classification is a declarative table (category -> trigger keywords) so
//! the mapping is data, not code. Coverage only ever grows: once a category
//! is detected for a session it is never removed.

use std::collections::BTreeSet;

/// Sentinel focus returned once every goal is covered.
pub const DEEPER_EXPLORATION: &str = "deeper exploration of mentioned topics";

/// Category trigger table. A category is detected when any of its keywords
/// appears, case-insensitively, in the utterance.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("context", &["where", "when", "how long", "place", "time"]),
    (
        "perspective",
        &["perspective", "think", "feel", "view", "understand"],
    ),
    ("emotion", &["emotion", "feeling", "felt", "mood"]),
    (
        "communication",
        &["communication", "listen", "talk", "conversation", "said"],
    ),
];

/// Classifies utterances into coverage categories and selects the next
/// focus for follow-up questions.
pub struct TopicTracker;

impl TopicTracker {
    /// Returns the categories triggered by `utterance`.
    pub fn classify(utterance: &str) -> BTreeSet<String> {
        let lowered = utterance.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|(category, _)| category.to_string())
            .collect()
    }

    /// Folds newly detected categories into the covered set (union only).
    pub fn extend_coverage(covered: &mut BTreeSet<String>, utterance: &str) {
        covered.extend(Self::classify(utterance));
    }

    /// Picks the next goal to focus on: the first goal whose lowercased text
    /// mentions none of the covered categories. When every goal is covered,
    /// returns the deeper-exploration sentinel.
    pub fn next_focus(covered: &BTreeSet<String>, goals: &[String]) -> String {
        goals
            .iter()
            .find(|goal| {
                let goal_lower = goal.to_lowercase();
                !covered.iter().any(|topic| goal_lower.contains(topic))
            })
            .cloned()
            .unwrap_or_else(|| DEEPER_EXPLORATION.to_string())
    }
}
