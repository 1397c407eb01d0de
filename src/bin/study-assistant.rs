//! Mode-driven study assistant backed by Gemini.
//!
//! Each submission is wrapped in the template of the current mode and sent
//! as a single request; the reply is printed once it is complete.
//!
//! # Usage
//!
//! ```bash
//! # Start in Code Debugger mode; reads GEMINI_API_KEY or GOOGLE_API_KEY
//! study-assistant
//!
//! # Start in Topic Explainer mode
//! study-assistant --mode explain
//! ```
//!
//! # Commands
//!
//! - `/mode <name>` - Switch to `debug`, `explain` or `data`
//! - `/modes` - List the available modes
//! - `/help` - Show available commands
//! - `/quit` - Exit the application
//!
//! In Code Debugger mode, input spans several lines and ends with a line
//! containing only `/end`.

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use geminus::assist::{
    AssistArgs, AssistCommand, AssistConfig, AssistSession, InputWidget, LineAction, Mode,
    PlainTextRenderer, Renderer, classify_line, help_text,
};
use geminus::{Gemini, GenerativeModel, StderrLogger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = AssistArgs::from_command_line_relaxed("study-assistant [OPTIONS]");
    let config = AssistConfig::from(&args);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    let mode = match args.initial_mode() {
        Ok(mode) => mode,
        Err(err) => {
            renderer.print_error(&err.to_string());
            std::process::exit(1);
        }
    };
    let model_config = match args.model_config() {
        Ok(model_config) => model_config,
        Err(err) => {
            renderer.print_error(&err.to_string());
            std::process::exit(1);
        }
    };
    let api_key = match args.api_key() {
        Ok(api_key) => api_key,
        Err(err) => {
            renderer.print_error(&err.to_string());
            std::process::exit(1);
        }
    };

    let mut client = Gemini::new(Some(api_key.into_string()))?;
    if config.verbose {
        client = client.with_logger(Arc::new(StderrLogger));
    }
    let model = GenerativeModel::new(client, model_config);
    let mut session = AssistSession::new(model, config.with_mode(mode));
    let mut rl = DefaultEditor::new()?;

    renderer.print_title(&session.config().title, &session.config().subtitle);
    renderer.print_info("Type /help for commands, /quit to exit\n");
    announce_mode(&mut renderer, session.mode());

    loop {
        let prompt = format!("[{}] > ", session.mode().spec().name);
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        };

        let input = match classify_line(session.widget(), &line) {
            LineAction::Command(cmd) => {
                let _ = rl.add_history_entry(line.trim());
                match cmd {
                    AssistCommand::Quit => {
                        println!("Goodbye!");
                        break;
                    }
                    AssistCommand::SetMode(mode) => {
                        session.set_mode(mode);
                        announce_mode(&mut renderer, mode);
                    }
                    AssistCommand::ListModes => {
                        print_modes(session.mode());
                    }
                    AssistCommand::Help => {
                        for line in help_text().lines() {
                            println!("    {}", line);
                        }
                    }
                    AssistCommand::Invalid(message) => {
                        renderer.print_error(&message);
                    }
                }
                continue;
            }
            LineAction::Submit(input) => input,
            LineAction::StartBlock(first) => {
                let InputWidget::MultiLine { terminator, .. } = session.widget() else {
                    continue;
                };
                match read_until(&mut rl, first, terminator) {
                    Some(input) => input,
                    None => continue,
                }
            }
        };

        // Failures are already reported by the session, with the hint.
        let _ = session.submit(&input, &mut renderer).await;
    }

    Ok(())
}

/// Collect lines after `first` until one equals `terminator`.
///
/// Returns `None` if reading was interrupted; end of input submits what was
/// collected so far.
fn read_until(rl: &mut DefaultEditor, first: String, terminator: &str) -> Option<String> {
    let mut lines = Vec::new();
    let mut next = Ok(first);
    loop {
        match next {
            Ok(line) if line.trim() == terminator => break,
            Ok(line) => lines.push(line),
            Err(ReadlineError::Eof) => break,
            Err(_) => return None,
        }
        next = rl.readline("... ");
    }
    Some(lines.join("\n"))
}

fn announce_mode(renderer: &mut dyn Renderer, mode: Mode) {
    renderer.print_info(&format!("Mode: {} ({})", mode, mode.widget().placeholder()));
}

fn print_modes(current: Mode) {
    println!("    Available modes:");
    for mode in Mode::ALL {
        let spec = mode.spec();
        let marker = if mode == current { "*" } else { " " };
        println!("    {} {:<8} {}", marker, spec.name, spec.description);
    }
}
