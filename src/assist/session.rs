//! One-shot submissions for the study assistant.
//!
//! Unlike the chat, nothing is remembered between submissions: each one is a
//! single templated prompt and a single reply.

use crate::assist::config::AssistConfig;
use crate::completion::Completion;
use crate::modes::{InputWidget, Mode};
use crate::observability::{ASSIST_REJECTED, ASSIST_SUBMISSIONS};
use crate::prompt::compose_templated;
use crate::render::{RequestPhase, Renderer};
use crate::Result;

/// A stateless, mode-driven assistant over a [`Completion`].
pub struct AssistSession<C: Completion> {
    completion: C,
    config: AssistConfig,
    mode: Mode,
    phase: RequestPhase,
    submissions: u64,
    failed_requests: u64,
}

impl<C: Completion> AssistSession<C> {
    pub fn new(completion: C, config: AssistConfig) -> Self {
        let mode = config.mode;
        Self {
            completion,
            config,
            mode,
            phase: RequestPhase::Idle,
            submissions: 0,
            failed_requests: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches modes.  Only the template and input widget change.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn widget(&self) -> InputWidget {
        self.mode.widget()
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// Submissions that were answered.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    pub fn failed_requests(&self) -> u64 {
        self.failed_requests
    }

    /// Composes the prompt for the current mode and renders the reply.
    ///
    /// # Errors
    ///
    /// Blank input is rejected with a warning before anything is sent, and
    /// leaves the session as it was.  A failed request is reported on
    /// `renderer` together with the configured hint and returned.
    pub async fn submit(&mut self, input: &str, renderer: &mut dyn Renderer) -> Result<String> {
        let prompt = match compose_templated(self.mode, input) {
            Ok(prompt) => prompt,
            Err(err) => {
                ASSIST_REJECTED.click();
                renderer.print_warning(&format!(
                    "Please provide input for {}.",
                    self.mode.label()
                ));
                return Err(err);
            }
        };

        self.phase = RequestPhase::Sending;
        renderer.start_response();
        match self.completion.complete_once(&prompt).await {
            Ok(text) => {
                renderer.render_final(&text);
                self.phase = RequestPhase::Done;
                self.submissions += 1;
                ASSIST_SUBMISSIONS.click();
                Ok(text)
            }
            Err(err) => {
                self.phase = RequestPhase::Failed;
                self.failed_requests += 1;
                renderer.print_error(&err.to_string());
                renderer.print_info(&self.config.error_hint);
                Err(err)
            }
        }
    }
}
