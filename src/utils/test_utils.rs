#[cfg(test)]
use crate::core::app::App;
#[cfg(test)]
use crate::core::backend::ChatBackend;
#[cfg(test)]
use crate::core::message::{Message, Sender};
#[cfg(test)]
use crate::core::persona::default_persona;
#[cfg(test)]
use crate::core::session::SessionContext;
#[cfg(test)]
use crate::ui::theme::Theme;
#[cfg(test)]
use crate::utils::logging::LoggingState;

#[cfg(test)]
pub fn create_test_app() -> App {
    let session = SessionContext::new(
        ChatBackend::new("http://127.0.0.1:8000"),
        "test-session".to_string(),
        default_persona(),
        LoggingState::new(None).unwrap(),
    );

    App::new(session, Theme::dark_default())
}

#[cfg(test)]
pub fn create_test_message(sender: Sender, text: &str) -> Message {
    Message::new(sender, text)
}
