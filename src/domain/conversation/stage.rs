//! Conversation stage - the phase of the interview state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the interview state machine.
///
/// `Closing` is terminal: once entered, further participant input is
/// acknowledged without generating new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// No assistant turn exists yet; the opening probe comes next.
    Initial,
    /// Adaptive follow-up questioning is in progress.
    Exploring,
    /// The interview has ended.
    Closing,
}

impl Stage {
    /// Whether this stage accepts further state transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Closing)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Initial => "initial",
            Stage::Exploring => "exploring",
            Stage::Closing => "closing",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_closing_is_terminal() {
        assert!(!Stage::Initial.is_terminal());
        assert!(!Stage::Exploring.is_terminal());
        assert!(Stage::Closing.is_terminal());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Stage::Exploring).unwrap(), "\"exploring\"");
    }
}
