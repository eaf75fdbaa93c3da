//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the
//! appropriate commands before (or instead of) entering the chat loop.

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::core::app::App;
use crate::core::backend::{ChatBackend, DEFAULT_SERVER_URL};
use crate::core::config::Config;
use crate::core::persona::{all_personas, default_persona, resolve_persona, Persona};
use crate::core::session::SessionContext;
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")"
);

#[derive(Parser)]
#[command(name = "charade")]
#[command(version = VERSION)]
#[command(about = "A terminal chat interface for fictional character personas")]
#[command(
    long_about = "Charade is a full-screen terminal chat interface that talks to a \
character-chat backend. Pick a persona, type, and the backend replies in \
character.\n\n\
Environment Variables:\n\
  CHARADE_SERVER    Backend base URL (optional, defaults to http://127.0.0.1:8000)\n\
  RUST_LOG          Diagnostic filter for tracing output on stderr\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show commands and keyboard shortcuts\n\
  /persona <name>   Switch persona (or list the roster with no name)\n\
  /log <filename>   Enable transcript logging to the specified file\n\
  /log              Toggle logging pause/resume\n\
  /dump [filename]  Export the conversation to a file"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL
    #[arg(short = 's', long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Persona to chat with (id or display name)
    #[arg(short = 'p', long, global = true, value_name = "PERSONA")]
    pub persona: Option<String>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List the persona roster
    Personas,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (can be multiple words for default-persona)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let Args {
        command,
        server,
        persona,
        log,
    } = Args::parse();

    match command {
        Some(Commands::Personas) => {
            list_personas();
            Ok(())
        }
        Some(Commands::Set { key, value }) => set_config_value(&key, &value),
        Some(Commands::Unset { key }) => unset_config_value(&key),
        Some(Commands::Chat) | None => start_chat(server, persona, log).await,
    }
}

/// Diagnostics go to stderr and only when RUST_LOG asks for them; the
/// transcript logger in `utils::logging` is a separate concern.
fn init_tracing() {
    if let Ok(filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn list_personas() {
    println!("Available personas:");
    for persona in all_personas() {
        println!("  {:<14} {}", persona.id, persona.display_name);
    }
}

fn set_config_value(key: &str, value: &[String]) -> Result<(), Box<dyn Error>> {
    let value = value.join(" ");
    if value.is_empty() {
        return Err(format!("No value given for '{key}'").into());
    }

    let mut config = Config::load()?;
    match key {
        "server-url" => config.server_url = Some(value.clone()),
        "default-persona" => {
            let persona = resolve_persona(&value)?;
            config.default_persona = Some(persona.id.to_string());
        }
        "theme" => {
            if Theme::find(&value).is_none() {
                return Err(format!("Unknown theme '{value}' (dark, light)").into());
            }
            config.theme = Some(value.to_lowercase());
        }
        _ => {
            return Err(format!(
                "Unknown configuration key '{key}' (server-url, default-persona, theme)"
            )
            .into())
        }
    }
    config.save()?;
    println!("Set {key}");
    config.print_all();
    Ok(())
}

fn unset_config_value(key: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    match key {
        "server-url" => config.server_url = None,
        "default-persona" => config.default_persona = None,
        "theme" => config.theme = None,
        _ => {
            return Err(format!(
                "Unknown configuration key '{key}' (server-url, default-persona, theme)"
            )
            .into())
        }
    }
    config.save()?;
    println!("Unset {key}");
    config.print_all();
    Ok(())
}

async fn start_chat(
    server: Option<String>,
    persona: Option<String>,
    log: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    let server_url = server
        .or_else(|| std::env::var("CHARADE_SERVER").ok())
        .or(config.server_url)
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let persona = resolve_startup_persona(persona.as_deref(), config.default_persona.as_deref())?;

    let theme = config
        .theme
        .as_deref()
        .and_then(Theme::find)
        .unwrap_or_else(Theme::dark_default);

    let backend = ChatBackend::new(&server_url);
    let session_id = backend
        .new_session_with_retry()
        .await
        .map_err(|e| format!("Could not reach backend at {}: {e}", backend.base_url()))?;

    let logging = LoggingState::new(log)?;
    let session = SessionContext::new(backend, session_id, persona, logging);
    let app = App::new(session, theme);

    run_chat(app).await
}

fn resolve_startup_persona(
    flag: Option<&str>,
    configured: Option<&str>,
) -> Result<&'static Persona, Box<dyn Error>> {
    match flag.or(configured) {
        Some(name) => Ok(resolve_persona(name)?),
        None => Ok(default_persona()),
    }
}
