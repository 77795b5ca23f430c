//! Search box and results dropdown
//!
//! The dropdown shows a spinner while a query is pending or in flight, the
//! settled results otherwise, and "No results" for an empty settled query.

use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::models::SEARCH_RESULT_LIMIT;
use crate::ui::Theme;

/// Text shown when a settled query matched nothing
pub const NO_RESULTS: &str = "No results";

const PLACEHOLDER: &str = "Search movies...";

/// Render the search input line
pub fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.input_mode == InputMode::Editing;
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(" 🎬 MOVIEMAGIC ", Theme::title()));

    let line = if app.input.text().is_empty() && !focused {
        Line::from(vec![
            Span::styled(" / ", Theme::keybind()),
            Span::styled(PLACEHOLDER, Theme::dimmed()),
        ])
    } else {
        let (before, after) = app.input.split();
        let mut chars = after.chars();
        let under_cursor = chars.next().map(String::from).unwrap_or_else(|| " ".into());
        let mut spans = vec![Span::styled(" ", Theme::input()), Span::styled(before.to_string(), Theme::input())];
        if focused {
            spans.push(Span::styled(under_cursor, Theme::input_cursor()));
            spans.push(Span::styled(chars.as_str().to_string(), Theme::input()));
        } else {
            spans.push(Span::styled(after.to_string(), Theme::input()));
        }
        if app.search.is_busy() {
            spans.push(Span::styled("  ⟳", Theme::loading()));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render the dropdown under the search box, clipped to `screen`
pub fn render_dropdown(frame: &mut Frame, input_area: Rect, screen: Rect, app: &App) {
    let results = app.search.results();
    let rows = if app.search.is_busy() || results.is_empty() {
        1
    } else {
        results.len().min(SEARCH_RESULT_LIMIT) as u16
    };

    let y = input_area.y + input_area.height;
    let height = (rows + 2).min(screen.height.saturating_sub(y));
    if height < 3 {
        return;
    }
    let x = input_area.x + 1;
    let width = input_area.width.saturating_sub(2).min(72);
    let area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .style(Theme::input());

    if app.search.is_busy() {
        let spinner = Paragraph::new(Span::styled("Searching...", Theme::loading()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(spinner, area);
        return;
    }

    if results.is_empty() {
        let empty = Paragraph::new(Span::styled(NO_RESULTS, Theme::dimmed()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|movie| {
            let year = movie.year().map(|y| format!(" ({})", y)).unwrap_or_default();
            let mut spans = vec![
                Span::styled(movie.title.clone(), Theme::text()),
                Span::styled(year, Theme::year()),
                Span::raw("  "),
                Span::styled(
                    format!("★ {:.1}", movie.vote_average),
                    Theme::rating(movie.vote_average, false),
                ),
            ];
            if app.is_favorite(movie.id) {
                spans.push(Span::styled(" ♥", Theme::favorite()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▸ ")
        .highlight_style(Theme::list_item_selected().add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(Some(app.dropdown.selected));
    frame.render_stateful_widget(list, area, &mut state);
}
