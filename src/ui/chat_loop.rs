//! Interactive chat session: terminal lifecycle and the event loop.
//!
//! One logical thread of state transitions: draw, poll input events,
//! drain backend call outcomes, repeat. The only suspended work is the
//! spawned backend call; while it is outstanding the input bar is
//! disabled, which is the whole concurrency discipline.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use unicode_width::UnicodeWidthStr;

use crate::commands::{self, CommandResult};
use crate::core::app::App;
use crate::core::backend::{CallOutcome, CallParams, ChatCallService};
use crate::ui::render;
use crate::utils::input::sanitize_line;

const INPUT_AREA_HEIGHT: u16 = 3;
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let (service, mut rx) = ChatCallService::new();

    loop {
        terminal.draw(|f| draw(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Enter => submit_input(app, &service),
                    KeyCode::Char(c) if !app.session.awaiting_reply => {
                        app.ui.input.push(c);
                    }
                    KeyCode::Backspace if !app.session.awaiting_reply => {
                        app.ui.input.pop();
                    }
                    KeyCode::Up => scroll_up(app, 1),
                    KeyCode::Down => scroll_down(app, 1, terminal.size()?.height),
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => scroll_up(app, 3),
                    MouseEventKind::ScrollDown => scroll_down(app, 3, terminal.size()?.height),
                    _ => {}
                },
                _ => {}
            }
        }

        // Drain every outcome that arrived since the last tick.
        while let Ok((outcome, turn_id)) = rx.try_recv() {
            match outcome {
                CallOutcome::Reply(text) => app.conversation().complete_turn(turn_id, text),
                CallOutcome::Failed(_) => app.conversation().fail_turn(turn_id),
            }
        }
    }
}

fn submit_input(app: &mut App, service: &ChatCallService) {
    if app.session.awaiting_reply {
        return;
    }

    let input = sanitize_line(&app.ui.input);
    match commands::process_input(app, &input) {
        CommandResult::Continue => {
            app.ui.input.clear();
        }
        CommandResult::ProcessAsMessage(text) => {
            if let Some((request, turn_id)) = app.conversation().begin_turn(&text) {
                app.ui.input.clear();
                app.ui.auto_scroll = true;
                service.spawn_call(CallParams {
                    backend: app.session.backend.clone(),
                    request,
                    turn_id,
                });
            }
        }
    }
}

fn scroll_up(app: &mut App, amount: u16) {
    app.ui.auto_scroll = false;
    app.ui.scroll_offset = app.ui.scroll_offset.saturating_sub(amount);
}

fn scroll_down(app: &mut App, amount: u16, terminal_height: u16) {
    let available_height = transcript_height(terminal_height);
    let total_lines =
        render::build_display_lines(&app.ui.messages, &app.ui.theme).len() as u16;
    let max_offset = render::max_scroll_offset(total_lines, available_height);

    app.ui.scroll_offset = app.ui.scroll_offset.saturating_add(amount).min(max_offset);
    // Reaching the bottom re-enables follow mode.
    if app.ui.scroll_offset >= max_offset {
        app.ui.auto_scroll = true;
    }
}

fn transcript_height(terminal_height: u16) -> u16 {
    terminal_height
        .saturating_sub(INPUT_AREA_HEIGHT)
        .saturating_sub(1)
}

fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_AREA_HEIGHT)])
        .split(f.area());

    let lines = render::build_display_lines(&app.ui.messages, &app.ui.theme);
    let available_height = chunks[0].height.saturating_sub(1);
    let max_offset = render::max_scroll_offset(lines.len() as u16, available_height);

    if app.ui.auto_scroll {
        app.ui.scroll_offset = max_offset;
    } else {
        app.ui.scroll_offset = app.ui.scroll_offset.min(max_offset);
    }

    let title = format!("Charade - {}", app.session.persona.display_name);
    let transcript = Paragraph::new(lines)
        .style(Style::default().bg(app.ui.theme.background_color))
        .block(Block::default().title_style(app.ui.theme.title_style).title(title))
        .wrap(Wrap { trim: true })
        .scroll((app.ui.scroll_offset, 0));
    f.render_widget(transcript, chunks[0]);

    let input_title = if let Some(status) = &app.ui.status {
        status.clone()
    } else if app.session.awaiting_reply {
        format!("Waiting for {}...", app.session.persona.display_name)
    } else {
        "Type your message (Enter to send, Ctrl+C to quit)".to_string()
    };
    let input_style = if app.session.awaiting_reply {
        app.ui.theme.waiting_indicator_style
    } else {
        app.ui.theme.input_text_style
    };

    let input = Paragraph::new(app.ui.input.as_str())
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.ui.theme.input_border_style)
                .title_style(app.ui.theme.input_title_style)
                .title(input_title),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(input, chunks[1]);

    if !app.session.awaiting_reply {
        f.set_cursor_position((
            chunks[1].x + app.ui.input.width() as u16 + 1,
            chunks[1].y + 1,
        ));
    }
}
