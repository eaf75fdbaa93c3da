use crate::core::backend::ChatBackend;
use crate::core::persona::Persona;
use crate::utils::logging::LoggingState;

/// Process-wide chat session state.
///
/// `session_id` is minted once at startup and never changes. The
/// in-flight discipline lives here: `awaiting_reply` serializes sends and
/// `current_turn` tags each outbound call so outcomes for superseded
/// turns can be dropped.
pub struct SessionContext {
    pub backend: ChatBackend,
    pub session_id: String,
    pub persona: &'static Persona,
    pub logging: LoggingState,
    pub awaiting_reply: bool,
    pub current_turn: u64,
}

impl SessionContext {
    pub fn new(
        backend: ChatBackend,
        session_id: String,
        persona: &'static Persona,
        logging: LoggingState,
    ) -> Self {
        Self {
            backend,
            session_id,
            persona,
            logging,
            awaiting_reply: false,
            current_turn: 0,
        }
    }
}
