//! Interactive healthcare chat backed by Gemini.
//!
//! This binary provides a streaming REPL: each question is sent with the
//! conversation so far and the reply is drawn as it arrives.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; reads GEMINI_API_KEY or GOOGLE_API_KEY
//! healthcare-chat
//!
//! # Specify a model
//! healthcare-chat --model gemini-2.5-flash
//!
//! # Override generation and safety settings
//! healthcare-chat --config model.yaml
//!
//! # Disable colors (useful for piping output)
//! healthcare-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Start a new conversation
//! - `/history` - Show the conversation so far
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use geminus::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use geminus::{Gemini, GenerativeModel, ModelConfig, StderrLogger};

/// Main entry point for the healthcare-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("healthcare-chat [OPTIONS]");
    let config = ChatConfig::from(&args);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    // Nothing is read from the user until the credential and model are known.
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
    let model = GenerativeModel::new(client, model_config.clone());
    let mut session = ChatSession::new(model, config);
    let mut rl = DefaultEditor::new()?;

    renderer.print_title(&session.config().title, &session.config().subtitle);
    renderer.print_info("Type /help for commands, /quit to exit\n");
    session.replay(&mut renderer);

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Started a new conversation.");
                            session.replay(&mut renderer);
                        }
                        ChatCommand::History => {
                            session.replay(&mut renderer);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&model_config);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Failures are already reported by the session, with the hint.
                let _ = session.send_streaming(line, &mut renderer).await;
            }
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
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession<GenerativeModel>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Turns: {}", stats.turn_count);
    println!("      Answered: {}", stats.exchanges);
    println!("      Failed: {}", stats.failed_requests);
    println!("      Last request: {}", stats.phase);
}

fn print_config(config: &ModelConfig) {
    let generation = &config.generation;
    println!("    Current Configuration:");
    println!("      Model: {}", config.model);
    println!("      Temperature: {:.2}", generation.temperature);
    println!("      Top-p: {:.2}", generation.top_p);
    println!("      Top-k: {}", generation.top_k);
    println!("      Max output tokens: {}", generation.max_output_tokens);
    if config.safety_settings.is_empty() {
        println!("      Safety settings: (service defaults)");
    } else {
        println!("      Safety settings:");
        for setting in &config.safety_settings {
            println!("        - {:?}: {:?}", setting.category, setting.threshold);
        }
    }
}
