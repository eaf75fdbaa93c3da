use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
///
/// The log never stores free-form sender strings: user and system entries
/// are fixed variants, and persona entries carry the display name that was
/// active when the reply arrived. Re-selecting a persona later never
/// relabels entries already in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Persona(String),
    System,
}

impl Sender {
    /// Label shown in the transcript and written by the logger.
    pub fn label(&self) -> &str {
        match self {
            Sender::User => "You",
            Sender::Persona(name) => name,
            Sender::System => "System",
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Sender::User)
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Sender::System)
    }
}

/// One transcript entry. Entries are append-only and never mutated after
/// creation; formatting happens at render time from the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn persona(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Sender::Persona(name.into()), text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Sender::System, text)
    }
}
