use std::collections::VecDeque;

use crate::core::conversation::ConversationController;
use crate::core::message::Message;
use crate::core::session::SessionContext;
use crate::ui::theme::Theme;

/// Mutable interface state: the transcript, the input buffer, and the
/// scroll position. Mutated only through [`ConversationController`] and
/// the event loop's input handling.
pub struct UiState {
    pub messages: VecDeque<Message>,
    pub input: String,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub status: Option<String>,
    pub theme: Theme,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            messages: VecDeque::new(),
            input: String::new(),
            scroll_offset: 0,
            auto_scroll: true,
            status: None,
            theme,
        }
    }
}

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
}

impl App {
    pub fn new(session: SessionContext, theme: Theme) -> Self {
        Self {
            session,
            ui: UiState::new(theme),
        }
    }

    pub fn conversation(&mut self) -> ConversationController<'_> {
        ConversationController::new(&mut self.session, &mut self.ui)
    }
}
