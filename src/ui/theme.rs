use ratatui::style::{Color, Modifier, Style};

/// Styles the chat loop actually draws. Selected by the `theme` config
/// key; unknown names fall back to the dark default.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background_color: Color,
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub persona_prefix_style: Style,
    pub persona_text_style: Style,
    pub system_text_style: Style,
    pub title_style: Style,
    pub waiting_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            persona_prefix_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            persona_text_style: Style::default().fg(Color::White),
            system_text_style: Style::default().fg(Color::DarkGray),
            title_style: Style::default().fg(Color::Gray),
            waiting_indicator_style: Style::default().fg(Color::DarkGray),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            persona_prefix_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            persona_text_style: Style::default().fg(Color::Black),
            system_text_style: Style::default().fg(Color::Gray),
            title_style: Style::default().fg(Color::DarkGray),
            waiting_indicator_style: Style::default().fg(Color::Gray),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
        }
    }

    pub fn find(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark_default()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}
