use tracing::debug;

use crate::api::ChatRequest;
use crate::core::app::UiState;
use crate::core::message::{Message, Sender};
use crate::core::persona::resolve_persona;
use crate::core::session::SessionContext;

/// Fixed transcript text for failed sends. Network errors, non-2xx
/// statuses and malformed replies all collapse to this one entry;
/// diagnostic detail goes to tracing only.
pub const SEND_FAILED_TEXT: &str = "Error fetching response.";

/// Serializes user turns against the session and appends transcript
/// entries. Every accepted turn produces exactly two appends: the user
/// entry at `begin_turn` and either a persona or a System entry when the
/// outcome arrives.
pub struct ConversationController<'a> {
    session: &'a mut SessionContext,
    ui: &'a mut UiState,
}

impl<'a> ConversationController<'a> {
    pub fn new(session: &'a mut SessionContext, ui: &'a mut UiState) -> Self {
        Self { session, ui }
    }

    /// Start a user turn. Returns the outbound request and its turn id
    /// when the turn was accepted: the input must be non-empty after
    /// trimming and no other turn may be in flight. The transcript keeps
    /// the literal text, not the trimmed form.
    pub fn begin_turn(&mut self, input: &str) -> Option<(ChatRequest, u64)> {
        if input.trim().is_empty() {
            return None;
        }
        if self.session.awaiting_reply {
            return None;
        }

        self.clear_status();
        self.log_line(&Sender::User, input);
        self.ui.messages.push_back(Message::user(input));
        self.session.awaiting_reply = true;
        self.session.current_turn += 1;

        let request = ChatRequest {
            session_id: self.session.session_id.clone(),
            character: self.session.persona.display_name.to_string(),
            user_message: input.to_string(),
        };
        Some((request, self.session.current_turn))
    }

    /// Record the reply for `turn_id`, labeled with the currently
    /// selected persona.
    pub fn complete_turn(&mut self, turn_id: u64, reply: String) {
        if !self.accepts(turn_id) {
            return;
        }
        let sender = Sender::Persona(self.session.persona.display_name.to_string());
        self.log_line(&sender, &reply);
        self.ui.messages.push_back(Message::new(sender, reply));
        self.session.awaiting_reply = false;
    }

    /// Record a failed send for `turn_id` as a single System entry.
    pub fn fail_turn(&mut self, turn_id: u64) {
        if !self.accepts(turn_id) {
            return;
        }
        self.log_line(&Sender::System, SEND_FAILED_TEXT);
        self.ui.messages.push_back(Message::system(SEND_FAILED_TEXT));
        self.session.awaiting_reply = false;
    }

    fn accepts(&self, turn_id: u64) -> bool {
        if !self.session.awaiting_reply || turn_id != self.session.current_turn {
            debug!(
                "dropping outcome for turn {turn_id} (current turn {})",
                self.session.current_turn
            );
            return false;
        }
        true
    }

    /// Switch the active persona. Only the label attached to subsequent
    /// replies changes; existing entries keep the sender they were
    /// recorded with.
    pub fn select_persona(&mut self, name: &str) -> Result<&'static str, String> {
        let persona = resolve_persona(name)?;
        self.session.persona = persona;
        Ok(persona.display_name)
    }

    pub fn awaiting_reply(&self) -> bool {
        self.session.awaiting_reply
    }

    pub fn add_system_message(&mut self, text: impl Into<String>) {
        self.ui.messages.push_back(Message::system(text));
    }

    pub fn set_status<S: Into<String>>(&mut self, s: S) {
        self.ui.status = Some(s.into());
    }

    pub fn clear_status(&mut self) {
        self.ui.status = None;
    }

    fn log_line(&self, sender: &Sender, text: &str) {
        if let Err(e) = self
            .session
            .logging
            .log_message(&format!("{}: {}", sender.label(), text))
        {
            eprintln!("Failed to log message: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_app;

    #[test]
    fn accepted_turn_appends_user_entry_and_builds_request() {
        let mut app = create_test_app();

        let (request, turn_id) = app
            .conversation()
            .begin_turn("  hello there  ")
            .expect("turn should be accepted");

        assert_eq!(turn_id, 1);
        assert_eq!(request.session_id, "test-session");
        assert_eq!(request.character, "Iron Man");
        // The literal text goes out and into the log, untrimmed.
        assert_eq!(request.user_message, "  hello there  ");

        assert_eq!(app.ui.messages.len(), 1);
        assert_eq!(app.ui.messages[0], Message::user("  hello there  "));
        assert!(app.session.awaiting_reply);
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let mut app = create_test_app();

        assert!(app.conversation().begin_turn("").is_none());
        assert!(app.conversation().begin_turn("   \t \n").is_none());

        assert_eq!(app.ui.messages.len(), 0);
        assert!(!app.session.awaiting_reply);
        assert_eq!(app.session.current_turn, 0);
    }

    #[test]
    fn second_send_while_awaiting_reply_is_rejected() {
        let mut app = create_test_app();

        assert!(app.conversation().begin_turn("first").is_some());
        assert!(app.conversation().begin_turn("second").is_none());

        // Only the accepted turn appended, and no second request went out.
        assert_eq!(app.ui.messages.len(), 1);
        assert_eq!(app.session.current_turn, 1);
    }

    #[test]
    fn successful_turn_appends_exactly_user_then_persona() {
        let mut app = create_test_app();

        let (_, turn_id) = app.conversation().begin_turn("hello").unwrap();
        app.conversation()
            .complete_turn(turn_id, "Obviously, I'm a genius.".to_string());

        assert_eq!(app.ui.messages.len(), 2);
        assert_eq!(app.ui.messages[0].sender, Sender::User);
        assert_eq!(
            app.ui.messages[1],
            Message::persona("Iron Man", "Obviously, I'm a genius.")
        );
        assert!(!app.session.awaiting_reply);
    }

    #[test]
    fn failed_turn_appends_exactly_user_then_system() {
        let mut app = create_test_app();

        let (_, turn_id) = app.conversation().begin_turn("hello").unwrap();
        app.conversation().fail_turn(turn_id);

        assert_eq!(app.ui.messages.len(), 2);
        assert_eq!(app.ui.messages[0].sender, Sender::User);
        assert_eq!(app.ui.messages[1], Message::system(SEND_FAILED_TEXT));
        assert!(!app.session.awaiting_reply);
    }

    #[test]
    fn awaiting_reply_is_true_strictly_between_begin_and_outcome() {
        let mut app = create_test_app();

        assert!(!app.conversation().awaiting_reply());
        let (_, turn_id) = app.conversation().begin_turn("hi").unwrap();
        assert!(app.conversation().awaiting_reply());
        app.conversation().complete_turn(turn_id, "Hi!".to_string());
        assert!(!app.conversation().awaiting_reply());

        let (_, turn_id) = app.conversation().begin_turn("again").unwrap();
        assert!(app.conversation().awaiting_reply());
        app.conversation().fail_turn(turn_id);
        assert!(!app.conversation().awaiting_reply());
    }

    #[test]
    fn stale_turn_outcomes_are_dropped() {
        let mut app = create_test_app();

        let (_, turn_id) = app.conversation().begin_turn("hello").unwrap();

        // An outcome for a turn that is not current never appends.
        app.conversation().complete_turn(turn_id + 1, "late".to_string());
        assert_eq!(app.ui.messages.len(), 1);
        assert!(app.session.awaiting_reply);

        app.conversation().complete_turn(turn_id, "on time".to_string());
        assert_eq!(app.ui.messages.len(), 2);

        // After the turn settled, a duplicate outcome is also dropped.
        app.conversation().fail_turn(turn_id);
        assert_eq!(app.ui.messages.len(), 2);
    }

    #[test]
    fn persona_switch_relabels_only_subsequent_replies() {
        let mut app = create_test_app();

        let (_, turn_id) = app.conversation().begin_turn("hello").unwrap();
        app.conversation().complete_turn(turn_id, "I am Iron Man.".to_string());

        app.conversation()
            .select_persona("yoda")
            .expect("roster persona should resolve");

        let (request, turn_id) = app.conversation().begin_turn("and now?").unwrap();
        assert_eq!(request.character, "Yoda");
        app.conversation()
            .complete_turn(turn_id, "Changed, things have.".to_string());

        // The earlier entry keeps the sender it was recorded with.
        assert_eq!(app.ui.messages[1].sender, Sender::Persona("Iron Man".to_string()));
        assert_eq!(app.ui.messages[3].sender, Sender::Persona("Yoda".to_string()));
    }

    #[test]
    fn selecting_an_unknown_persona_reports_the_roster() {
        let mut app = create_test_app();

        let err = app.conversation().select_persona("sherlock").unwrap_err();
        assert!(err.contains("Persona 'sherlock' not found"));
        assert_eq!(app.session.persona.display_name, "Iron Man");
    }

    #[test]
    fn system_messages_do_not_touch_the_send_state() {
        let mut app = create_test_app();

        app.conversation().add_system_message("Persona roster: ...");
        assert_eq!(app.ui.messages.len(), 1);
        assert!(!app.session.awaiting_reply);
        assert_eq!(app.session.current_turn, 0);
    }
}
