//! Slash command parsing for the healthcare chat.
//!
//! Input starting with `/` controls the session and is never sent to the
//! model.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start over with a fresh transcript.
    Clear,

    /// Replay the conversation so far.
    History,

    /// Display session statistics.
    Stats,

    /// Show the model configuration.
    ShowConfig,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be treated as a question.
///
/// # Examples
///
/// ```
/// # use geminus::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("What causes a fever?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match (command.as_str(), argument) {
        ("clear" | "reset", None) => ChatCommand::Clear,
        ("history", None) => ChatCommand::History,
        ("stats" | "status", None) => ChatCommand::Stats,
        ("config", None) => ChatCommand::ShowConfig,
        ("help" | "?", None) => ChatCommand::Help,
        ("quit" | "exit" | "q", None) => ChatCommand::Quit,
        (
            "clear" | "reset" | "history" | "stats" | "status" | "config" | "help" | "?" | "quit"
            | "exit" | "q",
            Some(_),
        ) => ChatCommand::Invalid(format!("/{command} takes no arguments")),
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Start a new conversation
  /history               Show the conversation so far
  /stats                 Show session statistics
  /config                Show the model configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_clear() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/CLEAR"), Some(ChatCommand::Clear));
    }

    #[test]
    fn parse_history_stats_and_config() {
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/config"), Some(ChatCommand::ShowConfig));
    }

    #[test]
    fn arguments_are_rejected() {
        assert!(matches!(
            parse_command("/clear everything"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("takes no arguments")
        ));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("/model gemini-2.5-pro"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("What is a fever?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_lists_commands() {
        let help = help_text();
        for command in ["/clear", "/history", "/stats", "/config", "/help", "/quit"] {
            assert!(help.contains(command), "missing {command}");
        }
    }
}
