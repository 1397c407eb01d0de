//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript
//! and drives one streamed exchange at a time.

use crate::chat::config::ChatConfig;
use crate::completion::Completion;
use crate::observability::{CHAT_ROLLBACKS, CHAT_TURNS};
use crate::prompt::{conversation_contents, wrap_user_text};
use crate::render::{RequestPhase, Renderer, stream_to_renderer};
use crate::transcript::{Transcript, Turn};
use crate::types::Content;
use crate::{Error, Result};

/// A conversational session over a [`Completion`].
///
/// The transcript stores raw text.  On every send the history is wrapped with
/// the configured user prefix; if the request fails, the pending user turn is
/// removed again so the transcript never ends in an unanswered question.
pub struct ChatSession<C: Completion> {
    completion: C,
    config: ChatConfig,
    transcript: Transcript,
    phase: RequestPhase,
    exchanges: u64,
    failed_requests: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: String,
    /// The number of turns in the transcript.
    pub turn_count: usize,
    /// Requests that completed and were recorded.
    pub exchanges: u64,
    /// Requests that failed and were rolled back.
    pub failed_requests: u64,
    /// The phase of the most recent request.
    pub phase: RequestPhase,
}

impl<C: Completion> ChatSession<C> {
    /// Creates a new chat session; the transcript starts with the greeting.
    pub fn new(completion: C, config: ChatConfig) -> Self {
        let transcript = fresh_transcript(&config);
        Self {
            completion,
            config,
            transcript,
            phase: RequestPhase::Idle,
            exchanges: 0,
            failed_requests: 0,
        }
    }

    /// Sends a user message and streams the response.
    ///
    /// This method:
    /// 1. Wraps the current transcript as history
    /// 2. Appends the raw user turn
    /// 3. Streams the reply to `renderer`, one frame per fragment
    /// 4. Appends the complete assistant reply
    ///
    /// # Errors
    ///
    /// Blank input is rejected with a warning and changes nothing.  A failed
    /// request is reported on `renderer` together with the configured hint,
    /// the user turn is rolled back, and the error is returned.
    pub async fn send_streaming(
        &mut self,
        user_input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<String> {
        if user_input.trim().is_empty() {
            renderer.print_warning("Please enter a question.");
            return Err(Error::validation(
                "input is empty",
                Some("input".to_string()),
            ));
        }

        self.phase = RequestPhase::Composing;
        let prefix = self.config.user_prefix.as_str();
        let history = conversation_contents(self.transcript.all(), prefix);
        let message = Content::user(wrap_user_text(prefix, user_input));
        let previous_len = self.transcript.len();
        self.transcript.append(Turn::user(user_input));

        self.phase = RequestPhase::Sending;
        let outcome = match self.completion.stream_completion(history, message).await {
            Ok(chunks) => {
                self.phase = RequestPhase::Streaming;
                stream_to_renderer(chunks, renderer).await
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(text) => {
                self.transcript.append(Turn::assistant(text.clone()));
                self.phase = RequestPhase::Done;
                self.exchanges += 1;
                CHAT_TURNS.click();
                Ok(text)
            }
            Err(err) => {
                while self.transcript.len() > previous_len {
                    self.transcript.remove_last();
                }
                self.phase = RequestPhase::Failed;
                self.failed_requests += 1;
                CHAT_ROLLBACKS.click();
                renderer.print_error(&err.to_string());
                renderer.print_info(&self.config.error_hint);
                Err(err)
            }
        }
    }

    /// Starts a new conversation, seeded with the greeting.
    pub fn clear(&mut self) {
        self.transcript = fresh_transcript(&self.config);
        self.phase = RequestPhase::Idle;
    }

    /// Prints every turn of the transcript.
    pub fn replay(&self, renderer: &mut dyn Renderer) {
        for turn in self.transcript.all() {
            renderer.print_turn(turn.speaker(), turn.content());
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The phase of the most recent request.
    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.completion.model_name(),
            turn_count: self.transcript.len(),
            exchanges: self.exchanges,
            failed_requests: self.failed_requests,
            phase: self.phase,
        }
    }
}

fn fresh_transcript(config: &ChatConfig) -> Transcript {
    match &config.greeting {
        Some(greeting) => Transcript::with_greeting(greeting.clone()),
        None => Transcript::new(),
    }
}
