//! Prompt composition.
//!
//! Two shapes of prompt are produced here:
//!
//! - **Conversational**: the transcript becomes role-tagged [`Content`], with
//!   every user turn wrapped in an instructional prefix.  The transcript keeps
//!   the raw text; wrapping happens only on the way out.
//! - **Templated**: a mode's prefix, the user's input and the mode's optional
//!   suffix are concatenated into one flat prompt.

use crate::modes::Mode;
use crate::transcript::{Speaker, Turn};
use crate::types::Content;
use crate::{Error, Result};

/// Prefix placed before every user turn in the healthcare chat.
pub const HEALTHCARE_PREFIX: &str = "Healthcare related question: ";

/// Wrap one user message in `prefix`.
pub fn wrap_user_text(prefix: &str, text: &str) -> String {
    format!("{prefix}{text}")
}

/// Map one turn to wire content.
pub fn turn_content(turn: &Turn, prefix: &str) -> Content {
    match turn.speaker() {
        Speaker::User => Content::user(wrap_user_text(prefix, turn.content())),
        Speaker::Assistant => Content::model(turn.content()),
    }
}

/// Map turns to role-tagged wire content, in order.
///
/// User turns become role `user` wrapped in `prefix`; assistant turns become
/// role `model` unchanged.
pub fn conversation_contents(turns: &[Turn], prefix: &str) -> Vec<Content> {
    turns.iter().map(|turn| turn_content(turn, prefix)).collect()
}

/// Build the flat prompt for `mode` around `input`.
///
/// Blank or whitespace-only input is rejected before anything is composed.
pub fn compose_templated(mode: Mode, input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Err(Error::validation(
            "input is empty",
            Some("input".to_string()),
        ));
    }
    let spec = mode.spec();
    let mut prompt = String::with_capacity(
        spec.prefix.len() + input.len() + spec.suffix.map(str::len).unwrap_or(0),
    );
    prompt.push_str(spec.prefix);
    prompt.push_str(input);
    if let Some(suffix) = spec.suffix {
        prompt.push_str(suffix);
    }
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn user_turns_are_wrapped_assistant_turns_are_not() {
        let turns = vec![
            Turn::assistant("Hello! How can I help?"),
            Turn::user("What is a fever?"),
        ];
        let contents = conversation_contents(&turns, HEALTHCARE_PREFIX);
        assert_eq!(contents[0].role, Some(Role::Model));
        assert_eq!(contents[0].text(), "Hello! How can I help?");
        assert_eq!(contents[1].role, Some(Role::User));
        assert_eq!(
            contents[1].text(),
            "Healthcare related question: What is a fever?"
        );
        // The source turns are untouched.
        assert_eq!(turns[1].content(), "What is a fever?");
    }

    #[test]
    fn empty_prefix_passes_text_through() {
        let contents = conversation_contents(&[Turn::user("hi")], "");
        assert_eq!(contents[0].text(), "hi");
    }

    #[test]
    fn templated_prompt_uses_mode_table() {
        let prompt = compose_templated(Mode::CodeDebugger, "fn main() {}").unwrap();
        assert_eq!(
            prompt,
            format!("{}fn main() {{}}", Mode::CodeDebugger.spec().prefix)
        );

        let spec = Mode::TopicExplainer.spec();
        let prompt = compose_templated(Mode::TopicExplainer, "recursion").unwrap();
        assert!(prompt.starts_with(spec.prefix));
        assert!(prompt.ends_with(spec.suffix.unwrap()));
        assert!(prompt.contains("recursion"));
    }

    #[test]
    fn templated_prompt_rejects_blank_input() {
        for input in ["", "   ", "\n\t"] {
            let err = compose_templated(Mode::TopicExplainer, input).unwrap_err();
            assert!(err.is_validation());
        }
    }
}
