//! App state and core application logic
//!
//! `App` is the single owner of every piece of observable state: the filtered
//! list, the search box, the selection cascade, the suggestion flag and the
//! favorites. User actions are the only way in; each returns the [`Effect`]s
//! the runtime must execute, and [`App::apply`] routes every completion back
//! through the staleness guard of the controller that issued it.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cascade::SelectionCascade;
use crate::effect::{CascadePayload, Commit, Completion, Effect};
use crate::favorites::FavoritesStore;
use crate::listing::FilteredList;
use crate::models::{Filter, MovieSummary};
use crate::search::{SearchController, DEFAULT_QUIET_INTERVAL};
use crate::suggest::{RandomSuggestion, Suggestion};

/// Banner shown when the primary list cannot be fetched
pub const LIST_ERROR: &str = "Failed to fetch movies. Please try again.";
/// Banner shown when a random suggestion fails
pub const SUGGEST_ERROR: &str = "Failed to fetch movie. Please try again.";
/// Banner shown when favorites cannot be written
pub const FAVORITES_ERROR: &str = "Could not save favorites.";

// =============================================================================
// View / Focus / Input Mode
// =============================================================================

/// Which main view is rendered; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Movie grid and favorites strip
    List,
    /// Detail panel for the selected movie
    Detail,
}

/// Keyboard focus inside the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Grid,
    Favorites,
}

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Selection State (per-list)
// =============================================================================

/// Cursor over a list of `len` items
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Move selection up
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Reset selection
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        // Clamp selected to valid range
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Search Input Line
// =============================================================================

/// Editable text of the search box; the cursor counts characters
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    text: String,
    cursor: usize,
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Replace the whole text, cursor at the end
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_len();
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    /// Delete character at cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Text split at the cursor, for rendering
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.byte_index(self.cursor))
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Focused list in the list view
    pub focus: Focus,
    banner: Option<String>,

    // Controllers
    pub list: FilteredList,
    pub search: SearchController,
    pub cascade: SelectionCascade,
    pub suggest: RandomSuggestion,
    pub favorites: FavoritesStore,

    // Cursors
    pub grid: ListState,
    pub favorites_list: ListState,
    pub dropdown: ListState,
    pub similar: ListState,
    pub input: InputLine,

    rng: StdRng,
}

impl Default for App {
    fn default() -> Self {
        Self::new(FavoritesStore::in_memory())
    }
}

impl App {
    /// Create a new App around a loaded favorites store
    pub fn new(favorites: FavoritesStore) -> Self {
        let favorites_list = ListState::new(favorites.len());
        Self {
            running: true,
            input_mode: InputMode::Normal,
            focus: Focus::Grid,
            banner: None,

            list: FilteredList::new(Filter::default()),
            search: SearchController::new(DEFAULT_QUIET_INTERVAL),
            cascade: SelectionCascade::new(),
            suggest: RandomSuggestion::new(),
            favorites,

            grid: ListState::default(),
            favorites_list,
            dropdown: ListState::default(),
            similar: ListState::default(),
            input: InputLine::default(),

            rng: StdRng::from_entropy(),
        }
    }

    /// Filter fetched by [`start`](Self::start)
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.list = FilteredList::new(filter);
        self
    }

    pub fn with_quiet_interval(mut self, interval: Duration) -> Self {
        self.search = SearchController::new(interval);
        self
    }

    /// Use a fixed random source (reproducible suggestions)
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    // -------------------------------------------------------------------------
    // Derived State
    // -------------------------------------------------------------------------

    pub fn view(&self) -> View {
        if self.cascade.selected().is_some() {
            View::Detail
        } else {
            View::List
        }
    }

    /// Banner-level error for primary actions
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites.contains(id)
    }

    /// Movie under the grid cursor
    pub fn grid_movie(&self) -> Option<&MovieSummary> {
        self.list.movies().get(self.grid.selected)
    }

    /// Movie under the favorites cursor
    pub fn favorites_movie(&self) -> Option<&MovieSummary> {
        self.favorites.movies().get(self.favorites_list.selected)
    }

    /// Similar movie under the carousel cursor
    pub fn similar_movie(&self) -> Option<&MovieSummary> {
        self.cascade
            .similar
            .ready()
            .and_then(|s| s.get(self.similar.selected))
    }

    /// Movie the detail panel's favorite toggle acts on
    pub fn detail_movie(&self) -> Option<MovieSummary> {
        match self.cascade.detail.ready() {
            Some(detail) => Some(detail.summary()),
            None => self.cascade.selected().cloned(),
        }
    }

    /// Earliest instant a timer needs servicing via [`tick`](Self::tick)
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.next_deadline()
    }

    // -------------------------------------------------------------------------
    // User Actions
    // -------------------------------------------------------------------------

    /// Initial fetch of the primary list
    pub fn start(&mut self) -> Vec<Effect> {
        self.select_filter(self.list.filter())
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Switch the primary list filter
    pub fn select_filter(&mut self, filter: Filter) -> Vec<Effect> {
        self.banner = None;
        self.grid.reset();
        let ticket = self.list.set_filter(filter);
        vec![Effect::FetchList { ticket }]
    }

    /// New search text; the query is sent later by [`tick`](Self::tick)
    pub fn type_query(&mut self, text: impl Into<String>, now: Instant) {
        self.input.set(text);
        self.sync_query(now);
    }

    fn sync_query(&mut self, now: Instant) {
        self.search.input(self.input.text(), now);
        self.dropdown.reset();
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Editing;
        self.search.focus();
    }

    /// Leave the search input; the dropdown hides after a short grace delay
    pub fn blur_search(&mut self, now: Instant) {
        self.input_mode = InputMode::Normal;
        self.search.blur(now);
    }

    /// Pick a dropdown entry: clears the search and selects the movie
    pub fn choose_search_result(&mut self, index: usize) -> Vec<Effect> {
        let Some(movie) = self.search.choose(index) else {
            return Vec::new();
        };
        self.input.clear();
        self.dropdown.set_len(0);
        self.input_mode = InputMode::Normal;
        self.select_movie(Some(movie))
    }

    /// Change the selection; `None` returns to the list view
    pub fn select_movie(&mut self, movie: Option<MovieSummary>) -> Vec<Effect> {
        self.similar = ListState::default();
        self.cascade
            .select(movie)
            .into_iter()
            .map(|(ticket, query)| Effect::Cascade { ticket, query })
            .collect()
    }

    /// Close the detail panel
    pub fn close_detail(&mut self) -> Vec<Effect> {
        self.select_movie(None)
    }

    /// Ask for a random popular movie; ignored while one is in flight
    pub fn suggest(&mut self) -> Vec<Effect> {
        if self.suggest.is_busy() {
            return Vec::new();
        }
        self.banner = None;
        self.select_movie(None);
        let (ticket, page) = self.suggest.begin(self.cascade.generation(), &mut self.rng);
        vec![Effect::FetchPopular { ticket, page }]
    }

    /// Flip favorite membership of `movie`; returns whether it is now a favorite
    pub fn toggle_favorite(&mut self, movie: &MovieSummary) -> bool {
        match self.favorites.toggle(movie) {
            Ok(now_favorite) => {
                if self.banner.as_deref() == Some(FAVORITES_ERROR) {
                    self.banner = None;
                }
                self.favorites_list.set_len(self.favorites.len());
                if self.favorites.is_empty() {
                    self.focus = Focus::Grid;
                }
                now_favorite
            }
            Err(e) => {
                tracing::error!(error = %e, movie_id = movie.id, "favorites write failed");
                self.banner = Some(FAVORITES_ERROR.to_string());
                self.favorites.contains(movie.id)
            }
        }
    }

    /// Service timers; returns the search query when the quiet interval expired
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        self.search
            .tick(now)
            .map(|ticket| Effect::Search { ticket })
            .into_iter()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Completions
    // -------------------------------------------------------------------------

    /// Route a settled request to its controller; may yield follow-up work
    pub fn apply(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::List { ticket, result } => {
                match self.list.commit(&ticket, result) {
                    Commit::Applied => self.grid.set_len(self.list.movies().len()),
                    Commit::Failed(_) => {
                        self.grid.set_len(0);
                        self.banner = Some(LIST_ERROR.to_string());
                    }
                    Commit::Stale => {}
                }
                Vec::new()
            }
            Completion::Search { ticket, result } => {
                if self.search.commit(&ticket, result) != Commit::Stale {
                    self.dropdown.set_len(self.search.results().len());
                }
                Vec::new()
            }
            Completion::Cascade { ticket, payload } => {
                let is_similar = matches!(payload, CascadePayload::Similar(_));
                let outcome = self.cascade.commit(&ticket, payload);
                if is_similar && outcome != Commit::Stale {
                    let len = self.cascade.similar.ready().map_or(0, |s| s.len());
                    self.similar.set_len(len);
                }
                Vec::new()
            }
            Completion::Popular { ticket, result } => {
                let live = self.cascade.generation();
                match self.suggest.resolve(&ticket, result, live, &mut self.rng) {
                    Suggestion::Picked(movie) => self.select_movie(Some(movie)),
                    Suggestion::Failed(_) => {
                        self.banner = Some(SUGGEST_ERROR.to_string());
                        Vec::new()
                    }
                    Suggestion::Stale => Vec::new(),
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event; returns the effects the key triggered
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Vec::new();
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key, now)
        } else {
            self.handle_normal_key(key, now)
        }
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => self.blur_search(now),
            KeyCode::Enter => {
                if self.search.dropdown_visible() && !self.search.is_busy() {
                    return self.choose_search_result(self.dropdown.selected);
                }
            }
            KeyCode::Up => self.dropdown.up(),
            KeyCode::Down => self.dropdown.down(),
            KeyCode::Char(c) => {
                self.input.insert(c);
                self.sync_query(now);
            }
            KeyCode::Backspace => {
                if self.input.backspace() {
                    self.sync_query(now);
                }
            }
            KeyCode::Delete => {
                if self.input.delete() {
                    self.sync_query(now);
                }
            }
            KeyCode::Left => self.input.cursor_left(),
            KeyCode::Right => self.input.cursor_right(),
            KeyCode::Home => self.input.cursor_home(),
            KeyCode::End => self.input.cursor_end(),
            _ => {}
        }
        Vec::new()
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return Vec::new();
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.focus_search();
                return Vec::new();
            }
            KeyCode::Char('r') => return self.suggest(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as usize) - ('1' as usize);
                return self.select_filter(Filter::ALL[idx]);
            }
            _ => {}
        }

        match self.view() {
            View::List => self.handle_list_key(key, now),
            View::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, _now: Instant) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => return self.select_filter(self.list.filter().next()),
            KeyCode::BackTab => return self.select_filter(self.list.filter().prev()),
            KeyCode::Up | KeyCode::Char('k') => self.focused_list().up(),
            KeyCode::Down | KeyCode::Char('j') => self.focused_list().down(),
            KeyCode::Left | KeyCode::Char('h') => self.focus = Focus::Grid,
            KeyCode::Right | KeyCode::Char('l') => {
                if !self.favorites.is_empty() {
                    self.focus = Focus::Favorites;
                }
            }
            KeyCode::Enter => {
                if let Some(movie) = self.focused_movie().cloned() {
                    return self.select_movie(Some(movie));
                }
            }
            KeyCode::Char('f') => {
                if let Some(movie) = self.focused_movie().cloned() {
                    self.toggle_favorite(&movie);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => return self.close_detail(),
            KeyCode::Up | KeyCode::Char('k') => self.similar.up(),
            KeyCode::Down | KeyCode::Char('j') => self.similar.down(),
            KeyCode::Enter => {
                if let Some(movie) = self.similar_movie().cloned() {
                    return self.select_movie(Some(movie));
                }
            }
            KeyCode::Char('f') => {
                if let Some(movie) = self.detail_movie() {
                    self.toggle_favorite(&movie);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn focused_list(&mut self) -> &mut ListState {
        match self.focus {
            Focus::Grid => &mut self.grid,
            Focus::Favorites => &mut self.favorites_list,
        }
    }

    fn focused_movie(&self) -> Option<&MovieSummary> {
        match self.focus {
            Focus::Grid => self.grid_movie(),
            Focus::Favorites => self.favorites_movie(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogError;
    use crate::cascade::CascadeQuery;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            vote_average: 7.0,
            release_date: "2024-01-01".into(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn list_ticket(effects: &[Effect]) -> crate::listing::ListTicket {
        match effects.first() {
            Some(Effect::FetchList { ticket }) => *ticket,
            other => panic!("expected list fetch, got {:?}", other),
        }
    }

    // -------------------------------------------------------------------------
    // ListState / InputLine Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(3);
        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 2);
        list.up();
        assert_eq!(list.selected, 1);

        list.set_len(1);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_list_state_empty() {
        let mut list = ListState::new(0);
        list.down();
        assert_eq!(list.selected, 0);
        list.up();
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_input_line_editing() {
        let mut input = InputLine::default();
        for c in "héllo".chars() {
            input.insert(c);
        }
        assert_eq!(input.text(), "héllo");
        assert_eq!(input.cursor(), 5);

        input.cursor_left();
        input.cursor_left();
        input.insert('X');
        assert_eq!(input.text(), "hélXlo");

        input.backspace();
        assert_eq!(input.text(), "héllo");

        input.cursor_home();
        assert!(!input.backspace());
        assert!(input.delete());
        assert_eq!(input.text(), "éllo");

        let (before, after) = input.split();
        assert_eq!((before, after), ("", "éllo"));

        input.cursor_end();
        assert!(!input.delete());
    }

    // -------------------------------------------------------------------------
    // Action Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_start_fetches_default_filter() {
        let mut app = App::default().with_filter(Filter::Upcoming);
        let effects = app.start();
        assert_eq!(list_ticket(&effects).filter, Filter::Upcoming);
        assert!(app.list.is_loading());
    }

    #[test]
    fn test_list_failure_sets_banner_and_filter_change_clears_it() {
        let mut app = App::default();
        let ticket = list_ticket(&app.start());
        app.apply(Completion::List {
            ticket,
            result: Err(CatalogError::Status(500)),
        });
        assert_eq!(app.banner(), Some(LIST_ERROR));

        app.select_filter(Filter::TopRated);
        assert!(app.banner().is_none());
    }

    #[test]
    fn test_view_follows_selection() {
        let mut app = App::default();
        assert_eq!(app.view(), View::List);

        let effects = app.select_movie(Some(movie(1)));
        assert_eq!(effects.len(), 4);
        assert_eq!(app.view(), View::Detail);

        assert!(app.close_detail().is_empty());
        assert_eq!(app.view(), View::List);
    }

    #[test]
    fn test_suggest_clears_selection_and_is_single_flight() {
        let mut app = App::default().with_rng(StdRng::seed_from_u64(9));
        app.select_movie(Some(movie(1)));

        let effects = app.suggest();
        assert!(matches!(effects[..], [Effect::FetchPopular { page: 1..=5, .. }]));
        assert_eq!(app.view(), View::List);
        assert!(app.suggest().is_empty(), "busy suggestion ignores repeat clicks");
    }

    #[test]
    fn test_suggest_pick_starts_cascade() {
        let mut app = App::default().with_rng(StdRng::seed_from_u64(3));
        let ticket = match app.suggest().pop() {
            Some(Effect::FetchPopular { ticket, .. }) => ticket,
            other => panic!("unexpected {:?}", other),
        };

        let effects = app.apply(Completion::Popular {
            ticket,
            result: Ok(vec![movie(10), movie(11), movie(12)]),
        });
        assert_eq!(effects.len(), 4);
        let picked = app.cascade.selected().map(|m| m.id).unwrap();
        assert!((10..=12).contains(&picked));
        assert!(!app.suggest.is_busy());
    }

    #[test]
    fn test_suggest_failure_sets_banner_and_stays_on_list() {
        let mut app = App::default();
        app.select_movie(Some(movie(1)));
        let ticket = match app.suggest().pop() {
            Some(Effect::FetchPopular { ticket, .. }) => ticket,
            other => panic!("unexpected {:?}", other),
        };

        let effects = app.apply(Completion::Popular {
            ticket,
            result: Ok(Vec::new()),
        });
        assert!(effects.is_empty());
        assert_eq!(app.banner(), Some(SUGGEST_ERROR));
        assert_eq!(app.view(), View::List);
    }

    #[test]
    fn test_toggle_favorite_from_grid_and_detail_agree() {
        let mut app = App::default();
        let ticket = list_ticket(&app.start());
        app.apply(Completion::List {
            ticket,
            result: Ok(vec![movie(1), movie(2)]),
        });

        app.handle_key(key(KeyCode::Char('f')), Instant::now());
        assert!(app.is_favorite(1));

        app.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(app.view(), View::Detail);

        // Detail toggle removes the same movie; grid sees it too
        app.handle_key(key(KeyCode::Char('f')), Instant::now());
        assert!(!app.is_favorite(1));
        assert!(app.favorites.is_empty());
    }

    // -------------------------------------------------------------------------
    // Key Handling Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_app_quit_key() {
        let mut app = App::new(FavoritesStore::in_memory());
        app.handle_key(key(KeyCode::Char('q')), Instant::now());
        assert!(!app.running);
    }

    #[test]
    fn test_app_quit_ctrl_c() {
        let mut app = App::default();
        app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(!app.running);
    }

    #[test]
    fn test_typing_schedules_search_and_escape_blurs() {
        let t0 = Instant::now();
        let mut app = App::default();
        app.handle_key(key(KeyCode::Char('/')), t0);
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "up".chars() {
            assert!(app.handle_key(key(KeyCode::Char(c)), t0).is_empty());
        }
        assert_eq!(app.search.query(), "up");
        assert!(app.search.dropdown_visible());

        let effects = app.tick(t0 + DEFAULT_QUIET_INTERVAL);
        assert!(matches!(&effects[..], [Effect::Search { ticket }] if ticket.query == "up"));

        app.handle_key(key(KeyCode::Esc), t0);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_enter_in_dropdown_selects_result() {
        let t0 = Instant::now();
        let mut app = App::default();
        app.focus_search();
        app.type_query("alien", t0);
        let ticket = match app.tick(t0 + DEFAULT_QUIET_INTERVAL).pop() {
            Some(Effect::Search { ticket }) => ticket,
            other => panic!("unexpected {:?}", other),
        };
        app.apply(Completion::Search {
            ticket,
            result: Ok(vec![movie(348), movie(679)]),
        });

        app.handle_key(key(KeyCode::Down), t0);
        let effects = app.handle_key(key(KeyCode::Enter), t0);

        assert_eq!(effects.len(), 4);
        assert!(effects.iter().all(|e| matches!(
            e,
            Effect::Cascade { ticket, .. } if ticket.movie_id == 679
        )));
        assert_eq!(app.input.text(), "");
        assert!(!app.search.dropdown_visible());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_number_keys_select_filter() {
        let mut app = App::default();
        let effects = app.handle_key(key(KeyCode::Char('3')), Instant::now());
        assert_eq!(list_ticket(&effects).filter, Filter::Upcoming);

        let effects = app.handle_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(list_ticket(&effects).filter, Filter::NowPlaying);
    }

    #[test]
    fn test_detail_escape_closes_and_similar_enter_reselects() {
        let mut app = App::default();
        let effects = app.select_movie(Some(movie(1)));
        let ticket = match effects
            .iter()
            .find(|e| matches!(e, Effect::Cascade { query: CascadeQuery::Similar, .. }))
        {
            Some(Effect::Cascade { ticket, .. }) => *ticket,
            _ => panic!("missing similar query"),
        };
        app.apply(Completion::Cascade {
            ticket,
            payload: CascadePayload::Similar(Ok(vec![movie(2), movie(3)])),
        });

        app.handle_key(key(KeyCode::Down), Instant::now());
        let effects = app.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(effects.len(), 4);
        assert_eq!(app.cascade.selected().map(|m| m.id), Some(3));

        app.handle_key(key(KeyCode::Esc), Instant::now());
        assert_eq!(app.view(), View::List);
    }
}
