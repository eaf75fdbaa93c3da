//! Charade is a terminal chat client for talking to fictional character
//! personas through a character-chat backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the session context, the persona roster,
//!   the conversation controller that serializes sends, and the backend
//!   call service.
//! - [`ui`] renders the terminal interface, formats reply text into
//!   paragraph and list blocks, and runs the interactive event loop.
//! - [`commands`] implements slash-command parsing and execution used by
//!   the chat loop.
//! - [`api`] defines the wire payloads exchanged with the backend.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`core::app`] and
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
