//! The ordered history of one conversation.

use std::fmt;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    /// The person typing into the session.
    User,

    /// The model.
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => f.write_str("user"),
            Speaker::Assistant => f.write_str("assistant"),
        }
    }
}

/// One message exchanged between the user and the assistant.
///
/// Turns hold the raw text as typed or as received; any prompt wrapping is
/// applied only when the transcript is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    speaker: Speaker,
    content: String,
}

impl Turn {
    /// Create a new turn.
    pub fn new(speaker: Speaker, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
        }
    }

    /// A turn typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Speaker::User, content)
    }

    /// A turn produced by the assistant.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, content)
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Append-only conversation history.
///
/// The only removal is [`Transcript::remove_last`], used to roll back a user
/// turn whose request failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript seeded with one assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    /// Append a turn to the end.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Every turn, in conversation order.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    /// Remove and return the most recent turn.
    pub fn remove_last(&mut self) -> Option<Turn> {
        self.turns.pop()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_seeds_one_assistant_turn() {
        let transcript = Transcript::with_greeting("Hello!");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.all()[0], Turn::assistant("Hello!"));
    }

    #[test]
    fn append_preserves_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        transcript.append(Turn::user("What is a fever?"));
        transcript.append(Turn::assistant("A fever is a temperature rise."));
        let speakers: Vec<_> = transcript.all().iter().map(Turn::speaker).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Assistant]);
        assert_eq!(
            transcript.last().map(Turn::content),
            Some("A fever is a temperature rise.")
        );
    }

    #[test]
    fn remove_last_rolls_back() {
        let mut transcript = Transcript::with_greeting("Hello!");
        transcript.append(Turn::user("pending"));
        assert_eq!(transcript.remove_last(), Some(Turn::user("pending")));
        assert_eq!(transcript, Transcript::with_greeting("Hello!"));
        transcript.remove_last();
        assert_eq!(transcript.remove_last(), None);
    }
}
