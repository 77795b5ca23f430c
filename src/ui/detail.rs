//! Detail view: info, cast, reviews and similar movies
//!
//! Each panel renders its own section of the selection cascade, so a slow or
//! failed query only affects its own box.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::api::ErrorKind;
use crate::app::App;
use crate::cascade::Section;
use crate::ui::browser::movie_row;
use crate::ui::Theme;

pub const NO_CAST: &str = "No cast info found.";
pub const NO_REVIEWS: &str = "No reviews found.";
pub const NO_SIMILAR: &str = "No similar movies found.";

/// Render the detail view
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    // Split into info (left 60%) and the lists (right 40%)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
        ])
        .split(chunks[1]);

    render_info_panel(frame, chunks[0], app);
    render_cast_panel(frame, right[0], app);
    render_reviews_panel(frame, right[1], app);
    render_similar_panel(frame, right[2], app);
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(format!(" {} ", title), Theme::title()))
}

/// Placeholder text for a section that has no data to show
fn section_message<T>(section: &Section<T>, what: &str) -> Option<(String, Style)> {
    match section {
        Section::Idle => Some((String::new(), Theme::dimmed())),
        Section::Loading => Some((format!("Loading {}...", what), Theme::loading())),
        Section::Failed(ErrorKind::ParseFailure) => {
            Some((format!("Unexpected data for {}.", what), Theme::error()))
        }
        Section::Failed(_) => Some((format!("Could not load {}.", what), Theme::error())),
        Section::Ready(_) => None,
    }
}

fn render_message(frame: &mut Frame, area: Rect, block: Block<'static>, text: String, style: Style) {
    let paragraph = Paragraph::new(Text::styled(text, style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Render the info panel (title, rating, overview, link)
fn render_info_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel("INFO", false);

    let detail = match &app.cascade.detail {
        Section::Ready(detail) => detail,
        other => {
            let title = app
                .cascade
                .selected()
                .map(|m| m.title.clone())
                .filter(|t| !t.is_empty());
            let (text, style) = section_message(other, "details").unwrap_or_default();
            let text = match title {
                Some(title) => format!("{}\n\n{}", title, text),
                None => text,
            };
            render_message(frame, area, block, text, style);
            return;
        }
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();

    // Title line
    let year_str = detail.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    let mut title_spans = vec![
        Span::styled("▶ ", Theme::accent()),
        Span::styled(detail.title.clone(), Theme::title()),
        Span::styled(year_str, Theme::secondary()),
    ];
    if app.is_favorite(detail.id) {
        title_spans.push(Span::styled("  ♥ favorite", Theme::favorite()));
    }
    lines.push(Line::from(title_spans));

    // Rating, votes, runtime, language
    let mut meta_spans = vec![
        Span::styled(
            format!("★ {:.1}", detail.vote_average),
            Theme::rating(detail.vote_average, false),
        ),
        Span::styled(format!(" ({} votes)", detail.vote_count), Theme::dimmed()),
    ];
    for extra in [detail.runtime_str(), detail.language_str()].into_iter().flatten() {
        meta_spans.push(Span::styled(" │ ", Theme::dimmed()));
        meta_spans.push(Span::styled(extra, Theme::secondary()));
    }
    lines.push(Line::from(meta_spans));

    if !detail.genres.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Genre: ", Theme::dimmed()),
            Span::styled(detail.genres_str(), Theme::genre()),
        ]));
    }

    lines.push(Line::from(Span::styled(
        "─".repeat(inner.width as usize),
        Theme::dimmed(),
    )));

    lines.push(Line::from(Span::styled("OVERVIEW", Theme::accent())));
    lines.push(Line::from(""));
    for line in detail.overview_text().lines() {
        lines.push(Line::from(Span::styled(line.to_string(), Theme::text())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("TMDB: ", Theme::dimmed()),
        Span::styled(detail.canonical_url(), Theme::secondary()),
    ]));

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn render_cast_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel("CAST", false);
    if let Some((text, style)) = section_message(&app.cascade.cast, "cast") {
        return render_message(frame, area, block, text, style);
    }
    let cast = app.cascade.cast.ready().map(Vec::as_slice).unwrap_or_default();
    if cast.is_empty() {
        return render_message(frame, area, block, NO_CAST.into(), Theme::dimmed());
    }

    let items: Vec<ListItem> = cast
        .iter()
        .map(|member| {
            let mut spans = vec![Span::styled(member.name.clone(), Theme::text())];
            if !member.character.is_empty() {
                spans.push(Span::styled(" as ", Theme::dimmed()));
                spans.push(Span::styled(member.character.clone(), Theme::secondary()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn render_reviews_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel("REVIEWS", false);
    if let Some((text, style)) = section_message(&app.cascade.reviews, "reviews") {
        return render_message(frame, area, block, text, style);
    }
    let reviews = app.cascade.reviews.ready().map(Vec::as_slice).unwrap_or_default();
    if reviews.is_empty() {
        return render_message(frame, area, block, NO_REVIEWS.into(), Theme::dimmed());
    }

    let mut lines = Vec::new();
    for review in reviews {
        lines.push(Line::from(Span::styled(review.author.clone(), Theme::accent())));
        lines.push(Line::from(Span::styled(review.excerpt().into_owned(), Theme::text())));
        lines.push(Line::from(""));
    }
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_similar_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel("SIMILAR", true);
    if let Some((text, style)) = section_message(&app.cascade.similar, "similar movies") {
        return render_message(frame, area, block, text, style);
    }
    let similar = app.cascade.similar.ready().map(Vec::as_slice).unwrap_or_default();
    if similar.is_empty() {
        return render_message(frame, area, block, NO_SIMILAR.into(), Theme::dimmed());
    }

    let items: Vec<ListItem> = similar
        .iter()
        .enumerate()
        .map(|(i, m)| movie_row(m, app.is_favorite(m.id), i == app.similar.selected))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("▸ ")
        .highlight_style(Theme::list_item_selected());
    let mut state = ListState::default().with_selected(Some(app.similar.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_messages() {
        let loading: Section<Vec<u8>> = Section::Loading;
        assert_eq!(section_message(&loading, "cast").unwrap().0, "Loading cast...");

        let failed: Section<Vec<u8>> = Section::Failed(ErrorKind::NetworkFailure);
        assert_eq!(section_message(&failed, "cast").unwrap().0, "Could not load cast.");

        let ready: Section<Vec<u8>> = Section::Ready(Vec::new());
        assert!(section_message(&ready, "cast").is_none());
    }
}
