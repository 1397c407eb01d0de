//! Output rendering for streamed and one-shot responses.
//!
//! A streamed reply is shown as a sequence of frames: after every fragment the
//! accumulated text is redrawn followed by a typing cursor, and when the
//! stream ends the final text is drawn without it.

use std::fmt;
use std::io::{self, Stdout, Write};

use crate::completion::TextChunks;
use crate::transcript::Speaker;
use crate::Result;

/// Typing cursor appended to partial text.
pub const CURSOR: &str = "▌";

/// ANSI escape code for bold text (used for titles).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for the cursor and info lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the user label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for yellow text (used for warnings).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Backspace over the cursor, blank it, and step back again.
const ERASE_CURSOR: &str = "\x08 \x08";

///////////////////////////////////////// Accumulation /////////////////////////////////////////

/// Accumulates streamed fragments.  The text only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingText {
    text: String,
}

impl StreamingText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return everything accumulated so far.
    pub fn push(&mut self, chunk: &str) -> &str {
        self.text.push_str(chunk);
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The accumulated text followed by the cursor.
    pub fn display(&self) -> String {
        format!("{}{CURSOR}", self.text)
    }

    /// The final text, without the cursor.
    pub fn finish(self) -> String {
        self.text
    }
}

/// Where a single request is in its lifecycle.
///
/// `Failed` ends one request only; the session returns to `Idle` for the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Composing,
    Sending,
    Streaming,
    Done,
    Failed,
}

impl RequestPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestPhase::Done | RequestPhase::Failed)
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestPhase::Idle => "idle",
            RequestPhase::Composing => "composing",
            RequestPhase::Sending => "sending",
            RequestPhase::Streaming => "streaming",
            RequestPhase::Done => "done",
            RequestPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

///////////////////////////////////////// Rendering /////////////////////////////////////////

/// Trait for the display surface.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Recording frames in tests
pub trait Renderer: Send {
    /// Print the application title and a subtitle.
    fn print_title(&mut self, title: &str, subtitle: &str);

    /// Print one stored turn, e.g. when replaying history.
    fn print_turn(&mut self, speaker: Speaker, text: &str);

    /// Called before the first frame of a response.
    fn start_response(&mut self) {}

    /// Draw the accumulated partial text.  `text` already ends with [`CURSOR`].
    fn render_partial(&mut self, text: &str);

    /// Draw the complete response, without the cursor.
    fn render_final(&mut self, text: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print a warning about the user's input.
    fn print_warning(&mut self, warning: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Drive `chunks` to completion, drawing a frame per fragment.
///
/// Returns the concatenated text.  On error the frames drawn so far stay on
/// the surface and the error is returned to the caller.
pub async fn stream_to_renderer(
    mut chunks: TextChunks,
    renderer: &mut dyn Renderer,
) -> Result<String> {
    let mut text = StreamingText::new();
    renderer.start_response();
    while let Some(chunk) = chunks.next_chunk().await? {
        text.push(&chunk);
        renderer.render_partial(&text.display());
    }
    let text = text.finish();
    renderer.render_final(&text);
    Ok(text)
}

/// Plain text renderer with optional ANSI styling.
///
/// Partial frames are drawn incrementally: only the growth since the previous
/// frame is written.  With color enabled the cursor is drawn after the text
/// and erased with a backspace before more text is written; without color no
/// cursor is drawn so piped output holds only the response.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    shown: String,
    cursor_shown: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            shown: String::new(),
            cursor_shown: false,
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn erase_cursor(&mut self) {
        if self.cursor_shown {
            print!("{ERASE_CURSOR}");
            self.cursor_shown = false;
        }
    }

    /// Write whatever `text` adds to what is already on screen.
    fn write_growth(&mut self, text: &str) {
        match text.strip_prefix(self.shown.as_str()) {
            Some(growth) => print!("{growth}"),
            None => print!("\n{text}"),
        }
        self.shown.clear();
        self.shown.push_str(text);
    }

    /// End a partially drawn response so the next line starts clean.
    fn abandon_partial(&mut self) {
        if self.cursor_shown || !self.shown.is_empty() {
            self.erase_cursor();
            println!();
            self.shown.clear();
        }
    }

    fn label(&self, speaker: Speaker) -> String {
        let (name, color) = match speaker {
            Speaker::User => ("You", ANSI_GREEN),
            Speaker::Assistant => ("Assistant", ANSI_CYAN),
        };
        if self.use_color {
            format!("{color}{name}:{ANSI_RESET} ")
        } else {
            format!("{name}: ")
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_title(&mut self, title: &str, subtitle: &str) {
        if self.use_color {
            println!("{ANSI_BOLD}{title}{ANSI_RESET}");
            println!("{ANSI_DIM}{subtitle}{ANSI_RESET}");
        } else {
            println!("{title}");
            println!("{subtitle}");
        }
        println!();
        self.flush();
    }

    fn print_turn(&mut self, speaker: Speaker, text: &str) {
        self.abandon_partial();
        println!("{}{text}", self.label(speaker));
        self.flush();
    }

    fn start_response(&mut self) {
        self.abandon_partial();
        print!("{}", self.label(Speaker::Assistant));
        self.flush();
    }

    fn render_partial(&mut self, text: &str) {
        let body = text.strip_suffix(CURSOR).unwrap_or(text);
        self.erase_cursor();
        self.write_growth(body);
        if self.use_color {
            print!("{ANSI_DIM}{CURSOR}{ANSI_RESET}");
            self.cursor_shown = true;
        }
        self.flush();
    }

    fn render_final(&mut self, text: &str) {
        self.erase_cursor();
        self.write_growth(text);
        println!();
        self.shown.clear();
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.abandon_partial();
        self.flush();
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_warning(&mut self, warning: &str) {
        self.abandon_partial();
        self.flush();
        if self.use_color {
            eprintln!("{ANSI_YELLOW}Warning: {warning}{ANSI_RESET}");
        } else {
            eprintln!("Warning: {warning}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.abandon_partial();
        println!("{info}");
        self.flush();
    }
}

/// A renderer that records every call, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub frames: Vec<String>,
    pub finals: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub turns: Vec<(Speaker, String)>,
    pub titles: Vec<(String, String)>,
    pub responses_started: usize,
}

#[cfg(test)]
impl Renderer for RecordingRenderer {
    fn print_title(&mut self, title: &str, subtitle: &str) {
        self.titles.push((title.to_string(), subtitle.to_string()));
    }

    fn print_turn(&mut self, speaker: Speaker, text: &str) {
        self.turns.push((speaker, text.to_string()));
    }

    fn start_response(&mut self) {
        self.responses_started += 1;
    }

    fn render_partial(&mut self, text: &str) {
        self.frames.push(text.to_string());
    }

    fn render_final(&mut self, text: &str) {
        self.finals.push(text.to_string());
    }

    fn print_error(&mut self, error: &str) {
        self.errors.push(error.to_string());
    }

    fn print_warning(&mut self, warning: &str) {
        self.warnings.push(warning.to_string());
    }

    fn print_info(&mut self, info: &str) {
        self.infos.push(info.to_string());
    }
}
