//! Generation instruction builder.
//!
//! Renders the system instruction for the generation collaborator from typed
//! inputs only, decoupled from any particular provider's request shape.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::domain::experiment::ExperimentDefinition;

/// Builds the system instruction for one adaptive follow-up question.
pub fn build_instruction(
    definition: &ExperimentDefinition,
    topics_covered: &BTreeSet<String>,
    next_focus: &str,
    exchange_count: u32,
) -> String {
    let guidelines = &definition.conversation_guidelines;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "You are a research assistant conducting an experience sampling study about {}.",
        definition.name
    );
    if !definition.description.is_empty() {
        let _ = writeln!(out, "\n{}", definition.description);
    }

    let _ = writeln!(out, "\nCONVERSATION STYLE:");
    let _ = writeln!(out, "- Tone: {}", guidelines.tone);
    let _ = writeln!(out, "- Style: {}", guidelines.style);

    let _ = writeln!(out, "\nRESEARCH GOALS:");
    for goal in &definition.goals {
        let _ = writeln!(out, "- {}", goal);
    }

    if !guidelines.approach.is_empty() {
        let _ = writeln!(out, "\nAPPROACH:\n{}", guidelines.approach);
    }

    if !definition.follow_up_categories.is_empty() {
        let _ = writeln!(out, "\nFOLLOW-UP CATEGORIES YOU CAN EXPLORE:");
        for (name, category) in &definition.follow_up_categories {
            let _ = writeln!(out, "{}: {}", title_case(name), category.description);
            if !category.example_questions.is_empty() {
                let examples: Vec<&str> = category
                    .example_questions
                    .iter()
                    .take(2)
                    .map(String::as_str)
                    .collect();
                let _ = writeln!(out, "  Examples: {}", examples.join("; "));
            }
        }
    }

    let covered = if topics_covered.is_empty() {
        "None yet".to_string()
    } else {
        topics_covered
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "\nCURRENT STATUS:");
    let _ = writeln!(out, "- Exchanges so far: {}", exchange_count);
    let _ = writeln!(out, "- Topics covered: {}", covered);
    let _ = writeln!(out, "- Next focus area: {}", next_focus);

    let _ = write!(
        out,
        "\nINSTRUCTIONS:\n\
        Based on the participant's most recent response, ask ONE relevant follow-up question that:\n\
        1. Relates naturally to what they just shared\n\
        2. Helps explore the next focus area: \"{next_focus}\"\n\
        3. Is open-ended when possible to encourage detailed responses\n\
        4. Shows genuine curiosity about the specifics they mentioned\n\n\
        Keep your question concise and conversational. Do not include explanations or multiple questions."
    );

    out
}

/// Renders a category key like `emotional_state` as `Emotional State`.
fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
