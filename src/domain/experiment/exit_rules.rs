//! Exit rules parsed from free-text exit criteria.
//!
//! Experiment authors write stopping rules as prose ("8-10 exchanges
//! completed"). The machine-interpretable part is extracted here once at load
//! time, so malformed criteria surface when the experiment loads rather than
//! mid-conversation.

use serde::{Deserialize, Serialize};

/// Marker phrase for a maximum-exchange criterion.
const EXCHANGE_RULE_PHRASE: &str = "exchanges completed";

/// Typed result of parsing an experiment's exit criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRules {
    max_exchanges: Option<u32>,
}

impl ExitRules {
    /// Parses exit rules from the experiment's free-text criteria.
    ///
    /// The first criterion containing "exchanges completed" contributes its
    /// first embedded integer as the maximum exchange count. Criteria without
    /// the phrase, or with no digits, contribute nothing.
    pub fn from_criteria(criteria: &[String]) -> Self {
        let max_exchanges = criteria
            .iter()
            .find(|criterion| criterion.contains(EXCHANGE_RULE_PHRASE))
            .and_then(|criterion| first_integer(criterion));

        Self { max_exchanges }
    }

    /// The experiment-defined maximum exchange count, if any criterion
    /// encoded one.
    pub fn max_exchanges(&self) -> Option<u32> {
        self.max_exchanges
    }
}

/// Extracts the first run of ASCII digits from `text` as an integer.
fn first_integer(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn criteria(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extracts_first_integer_from_matching_criterion() {
        let rules = ExitRules::from_criteria(&criteria(&[
            "Participant seems disengaged",
            "8-10 exchanges completed",
        ]));
        assert_eq!(rules.max_exchanges(), Some(8));
    }

    #[test]
    fn first_matching_criterion_wins() {
        let rules = ExitRules::from_criteria(&criteria(&[
            "Stop after 10 exchanges completed",
            "5 exchanges completed",
        ]));
        assert_eq!(rules.max_exchanges(), Some(10));
    }

    #[test]
    fn no_matching_phrase_yields_no_rule() {
        let rules = ExitRules::from_criteria(&criteria(&["Stop after 10 turns"]));
        assert_eq!(rules.max_exchanges(), None);
    }

    #[test]
    fn matching_phrase_without_digits_yields_no_rule() {
        let rules = ExitRules::from_criteria(&criteria(&["enough exchanges completed"]));
        assert_eq!(rules.max_exchanges(), None);
    }

    #[test]
    fn empty_criteria_yield_default() {
        assert_eq!(ExitRules::from_criteria(&[]), ExitRules::default());
    }

    proptest! {
        #[test]
        fn embedded_integer_is_recovered(n in 1u32..1000, prefix in "[a-zA-Z ]{0,20}") {
            let criterion = format!("{prefix}{n} exchanges completed");
            let rules = ExitRules::from_criteria(&[criterion]);
            prop_assert_eq!(rules.max_exchanges(), Some(n));
        }

        #[test]
        fn criteria_without_phrase_never_produce_a_rule(text in "[a-zA-Z0-9 ]{0,40}") {
            prop_assume!(!text.contains("exchanges completed"));
            let rules = ExitRules::from_criteria(&[text]);
            prop_assert_eq!(rules.max_exchanges(), None);
        }
    }
}
