//! List view: filter tabs, movie grid and favorites strip
//!
//! The grid shows the active filter's movies; the strip to its right shows
//! favorites in the order they were added. Both share one row renderer so a
//! movie looks the same (including its ♥ marker) wherever it appears.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::{Filter, MovieSummary};
use crate::ui::Theme;

/// Render the list view
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_filter_tabs(frame, chunks[0], app.list.filter());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(chunks[1]);

    render_grid(frame, body[0], app);
    render_favorites(frame, body[1], app);
}

/// One tab per filter, active one highlighted
pub fn render_filter_tabs(frame: &mut Frame, area: Rect, active: Filter) {
    let titles: Vec<Line> = Filter::ALL
        .iter()
        .enumerate()
        .map(|(i, f)| Line::from(format!("{} {}", i + 1, f.label())))
        .collect();
    let selected = Filter::ALL.iter().position(|f| *f == active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Theme::dimmed())
        .highlight_style(Theme::highlighted())
        .divider(Span::styled("│", Theme::dimmed()));
    frame.render_widget(tabs, area);
}

fn panel(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(title, Theme::title()))
        .title_alignment(Alignment::Left)
}

fn render_message(frame: &mut Frame, area: Rect, block: Block<'static>, text: &str, style: ratatui::style::Style) {
    let paragraph = Paragraph::new(Span::styled(text.to_string(), style))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Grid;
    let movies = app.list.movies();
    let label = app.list.filter().label().to_uppercase();

    if app.list.is_loading() {
        let block = panel(format!(" {} ", label), focused);
        render_message(frame, area, block, "Loading movies...", Theme::loading());
        return;
    }
    if movies.is_empty() {
        let block = panel(format!(" {} ", label), focused);
        let text = if app.list.has_failed() {
            "Could not load this list. Press the filter again to retry."
        } else {
            "No movies to show"
        };
        render_message(frame, area, block, text, Theme::dimmed());
        return;
    }

    let title = format!(" {} ({}/{}) ", label, app.grid.selected + 1, movies.len());
    render_movie_list(frame, area, panel(title, focused), movies, app, focused.then_some(app.grid.selected));
}

fn render_favorites(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Favorites;
    let movies = app.favorites.movies();
    let title = format!(" ♥ FAVORITES ({}) ", movies.len());

    if movies.is_empty() {
        render_message(
            frame,
            area,
            panel(title, focused),
            "No favorites yet. Press f on a movie.",
            Theme::dimmed(),
        );
        return;
    }

    render_movie_list(
        frame,
        area,
        panel(title, focused),
        movies,
        app,
        focused.then_some(app.favorites_list.selected),
    );
}

fn render_movie_list(
    frame: &mut Frame,
    area: Rect,
    block: Block<'static>,
    movies: &[MovieSummary],
    app: &App,
    selected: Option<usize>,
) {
    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, m)| movie_row(m, app.is_favorite(m.id), selected == Some(i)))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Theme::text())
        .highlight_symbol("▸ ")
        .highlight_style(Theme::list_item_selected());
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

/// Format: Title (Year)  ★ 8.5 ♥
pub fn movie_row(movie: &MovieSummary, favorite: bool, is_selected: bool) -> ListItem<'static> {
    let year_str = movie.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    let mut spans = vec![
        Span::styled(
            movie.title.clone(),
            if is_selected { Theme::list_item_selected() } else { Theme::text() },
        ),
        Span::styled(year_str, Theme::year()),
        Span::raw("  "),
        Span::styled(
            format!("★ {:.1}", movie.vote_average),
            Theme::rating(movie.vote_average, is_selected),
        ),
    ];
    if favorite {
        spans.push(Span::styled(" ♥", Theme::favorite()));
    }
    ListItem::new(Line::from(spans))
}
