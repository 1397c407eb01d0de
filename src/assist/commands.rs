//! Slash command parsing for the study assistant.

use crate::modes::{InputWidget, Mode};

/// A parsed assistant command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistCommand {
    /// Switch to another mode.
    SetMode(Mode),

    /// List the available modes.
    ListModes,

    Help,

    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// What the input loop does with the first line of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    /// Run a slash command.
    Command(AssistCommand),

    /// Submit this text as it is.
    Submit(String),

    /// This line opens a multi-line block; keep reading until the terminator.
    StartBlock(String),
}

/// Decide what the first line of a submission means for `widget`.
///
/// Blank lines, and a terminator with nothing before it, are submitted so
/// the session can warn about empty input.
pub fn classify_line(widget: InputWidget, line: &str) -> LineAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineAction::Submit(String::new());
    }
    if let InputWidget::MultiLine { terminator, .. } = widget
        && trimmed == terminator
    {
        return LineAction::Submit(String::new());
    }
    if let Some(cmd) = parse_command(line) {
        return LineAction::Command(cmd);
    }
    match widget {
        InputWidget::SingleLine { .. } => LineAction::Submit(line.to_string()),
        InputWidget::MultiLine { .. } => LineAction::StartBlock(line.to_string()),
    }
}

/// Parses user input for slash commands.
///
/// Returns `None` when the input should be submitted.  A command is a `/`
/// followed by a word, so code comments such as `// note` or `/* note */` are
/// not commands.
pub fn parse_command(input: &str) -> Option<AssistCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '?') {
        return None;
    }

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match (command.as_str(), argument) {
        ("mode", Some(name)) => match name.parse::<Mode>() {
            Ok(mode) => AssistCommand::SetMode(mode),
            Err(err) => AssistCommand::Invalid(err.to_string()),
        },
        ("mode", None) => AssistCommand::Invalid("Usage: /mode <name>".to_string()),
        ("modes", None) => AssistCommand::ListModes,
        ("help" | "?", None) => AssistCommand::Help,
        ("quit" | "exit" | "q", None) => AssistCommand::Quit,
        ("modes" | "help" | "?" | "quit" | "exit" | "q", Some(_)) => {
            AssistCommand::Invalid(format!("/{command} takes no arguments"))
        }
        _ => AssistCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /mode <name>           Switch mode (debug, explain, data)
  /modes                 List the available modes
  /help                  Show this help message
  /quit                  Exit the assistant

In Code Debugger mode, paste your code and finish with a line containing
only /end."#
}
