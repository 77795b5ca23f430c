//! Terminal UI components
//!
//! Built with ratatui. Rendering is a pure function of [`App`]: every frame
//! is drawn from the controllers' current state, nothing is cached here.
//! Keyboard-first navigation throughout.

pub mod browser;
pub mod detail;
pub mod search;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::{App, InputMode, View};

/// Main render function - dispatches to view-specific renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::text()), area);

    let banner_height = if app.banner().is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    search::render_input(frame, chunks[0], app);

    if let Some(banner) = app.banner() {
        let line = Line::from(vec![
            Span::styled(" ✖ ", Theme::error()),
            Span::styled(banner.to_string(), Theme::error()),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[1]);
    }

    match app.view() {
        View::List => browser::render(frame, chunks[2], app),
        View::Detail => detail::render(frame, chunks[2], app),
    }

    render_status_bar(frame, chunks[3], app);

    // Dropdown overlays whatever is below the search box
    if app.search.dropdown_visible() {
        search::render_dropdown(frame, chunks[0], area, app);
    }
}

/// Keybind hints for the current mode and view
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = match (&app.input_mode, app.view()) {
        (InputMode::Editing, _) => &[("↑↓", "pick"), ("Enter", "open"), ("Esc", "leave")],
        (InputMode::Normal, View::List) => &[
            ("/", "search"),
            ("1-4/Tab", "list"),
            ("←→", "grid/favorites"),
            ("Enter", "open"),
            ("f", "favorite"),
            ("r", "suggest"),
            ("q", "quit"),
        ],
        (InputMode::Normal, View::Detail) => &[
            ("Esc", "back"),
            ("↑↓", "similar"),
            ("Enter", "open similar"),
            ("f", "favorite"),
            ("r", "suggest"),
            ("q", "quit"),
        ],
    };

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (key, desc) in hints {
        spans.push(Span::styled(format!(" {} ", key), Theme::keybind()));
        spans.push(Span::styled(desc.to_string(), Theme::keybind_desc()));
        spans.push(Span::raw(" "));
    }
    if app.suggest.is_busy() {
        spans.push(Span::styled("⟳ picking a movie...", Theme::loading()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::status_bar()), area);
}
