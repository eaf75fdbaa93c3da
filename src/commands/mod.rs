//! Slash-command parsing and execution for the chat loop.
//!
//! Input starting with `/` is dispatched against the static registry;
//! anything else, including unknown commands and a bare `/`, falls
//! through as chat text.

mod registry;

pub use registry::{all_commands, CommandInvocation};

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

use crate::core::app::App;
use crate::core::persona::all_personas;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(app, invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from(
        "Controls:\n- Enter sends, Ctrl+C quits\n- Up/Down and the mouse wheel scroll the transcript\n\nCommands:",
    );
    for command in all_commands() {
        help.push_str(&format!("\n- /{} — {}", command.name, command.help));
    }
    help.push_str(&format!(
        "\n\nTranscript logging: {}",
        app.session.logging.status_string()
    ));
    app.conversation().add_system_message(help);
    CommandResult::Continue
}

pub(super) fn handle_persona(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        let active = app.session.persona.id;
        let mut listing = String::from("Available personas:");
        for persona in all_personas() {
            let marker = if persona.id == active { " (active)" } else { "" };
            listing.push_str(&format!(
                "\n- {} ({}){}",
                persona.display_name, persona.id, marker
            ));
        }
        app.conversation().add_system_message(listing);
        return CommandResult::Continue;
    }

    let selection = app.conversation().select_persona(invocation.args);
    match selection {
        Ok(display_name) => {
            app.conversation()
                .set_status(format!("Persona: {display_name}"));
        }
        Err(e) => {
            app.conversation().set_status(e);
        }
    }
    CommandResult::Continue
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();

    match parts.len() {
        1 => match app.session.logging.toggle_logging() {
            Ok(message) => {
                app.conversation().set_status(message);
                CommandResult::Continue
            }
            Err(e) => {
                app.conversation().set_status(format!("Log error: {}", e));
                CommandResult::Continue
            }
        },
        2 => {
            let filename = parts[1];
            match app.session.logging.set_log_file(filename.to_string()) {
                Ok(message) => {
                    app.conversation().set_status(message);
                    CommandResult::Continue
                }
                Err(e) => {
                    app.conversation()
                        .set_status(format!("Logfile error: {}", e));
                    CommandResult::Continue
                }
            }
        }
        _ => {
            app.conversation().set_status("Usage: /log [filename]");
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_dump(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let filename = if invocation.args.is_empty() {
        let timestamp = Utc::now().format("%Y-%m-%d").to_string();
        format!("charade-log-{}.txt", timestamp)
    } else {
        invocation.args.to_string()
    };

    match dump_conversation(app, &filename) {
        Ok(()) => {
            app.conversation()
                .set_status(format!("Conversation dumped to: {filename}"));
        }
        Err(e) => {
            app.conversation().set_status(format!("Dump error: {e}"));
        }
    }
    CommandResult::Continue
}

fn dump_conversation(app: &App, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    if app.ui.messages.is_empty() {
        return Err("No conversation to dump".into());
    }

    let file = match OpenOptions::new().write(true).create_new(true).open(filename) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(format!("File already exists: {filename}").into());
        }
        Err(e) => return Err(e.into()),
    };
    let mut writer = BufWriter::new(file);

    for msg in &app.ui.messages {
        writeln!(writer, "{}: {}", msg.sender.label(), msg.text)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
