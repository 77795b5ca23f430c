//! Debounced search controller
//!
//! Turns a burst of keystrokes into at most one query per quiet interval and
//! drops responses that no longer match what the user is looking at. Time is
//! passed in by the caller so the timers can be driven deterministically.

use std::time::{Duration, Instant};

use crate::api::{CatalogError, ErrorKind};
use crate::effect::Commit;
use crate::models::{MovieSummary, SEARCH_RESULT_LIMIT};

/// Quiet interval after the last keystroke before a query is sent
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(400);

/// Delay between losing focus and hiding the dropdown
pub const BLUR_GRACE: Duration = Duration::from_millis(200);

/// Lifecycle of the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Empty query, nothing scheduled
    #[default]
    Idle,
    /// Waiting for the quiet interval to elapse
    Pending,
    /// Query sent, waiting for the response
    Loading,
    /// Results for the current text are displayed
    Settled,
}

/// Stamp carried by a search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug)]
pub struct SearchController {
    query: String,
    phase: SearchPhase,
    results: Vec<MovieSummary>,
    last_error: Option<ErrorKind>,
    dropdown_visible: bool,
    quiet_interval: Duration,
    fire_at: Option<Instant>,
    hide_at: Option<Instant>,
    seq: u64,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_INTERVAL)
    }
}

impl SearchController {
    pub fn new(quiet_interval: Duration) -> Self {
        Self {
            query: String::new(),
            phase: SearchPhase::Idle,
            results: Vec::new(),
            last_error: None,
            dropdown_visible: false,
            quiet_interval,
            fire_at: None,
            hide_at: None,
            seq: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Results for the settled query, at most seven
    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    /// Pending or loading: the dropdown shows a spinner instead of results
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, SearchPhase::Pending | SearchPhase::Loading)
    }

    pub fn dropdown_visible(&self) -> bool {
        self.dropdown_visible
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.fire_at, self.hide_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Record new input text and (re)arm the quiet-interval timer
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.query = text.into();
        self.dropdown_visible = !self.query.is_empty();

        if self.query.is_empty() {
            self.phase = SearchPhase::Idle;
            self.fire_at = None;
            self.results.clear();
            self.last_error = None;
            return;
        }

        self.phase = SearchPhase::Pending;
        self.fire_at = Some(now + self.quiet_interval);
    }

    /// Advance timers; returns the query to issue when the quiet interval expired
    pub fn tick(&mut self, now: Instant) -> Option<SearchTicket> {
        if self.hide_at.is_some_and(|at| at <= now) {
            self.hide_at = None;
            self.dropdown_visible = false;
        }

        let due = self.fire_at.is_some_and(|at| at <= now);
        if !due {
            return None;
        }
        self.fire_at = None;

        self.seq += 1;
        self.phase = SearchPhase::Loading;
        let ticket = SearchTicket {
            seq: self.seq,
            query: self.query.clone(),
        };
        tracing::debug!(query = %ticket.query, seq = ticket.seq, "search dispatched");
        Some(ticket)
    }

    /// Apply a search response if it still answers the current text
    pub fn commit(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<MovieSummary>, CatalogError>,
    ) -> Commit {
        if ticket.seq != self.seq || ticket.query != self.query {
            tracing::debug!(query = %ticket.query, current = %self.query, "stale search response dropped");
            return Commit::Stale;
        }

        self.phase = SearchPhase::Settled;
        match result {
            Ok(mut movies) => {
                movies.truncate(SEARCH_RESULT_LIMIT);
                self.results = movies;
                self.last_error = None;
                Commit::Applied
            }
            Err(e) => {
                tracing::warn!(query = %ticket.query, error = %e, "search failed");
                self.results.clear();
                self.last_error = Some(e.kind());
                Commit::Failed(e.kind())
            }
        }
    }

    /// Take the result at `index` and reset the search box
    pub fn choose(&mut self, index: usize) -> Option<MovieSummary> {
        let movie = self.results.get(index).cloned()?;
        self.clear();
        Some(movie)
    }

    /// Clear text and results, hide the dropdown and cancel both timers
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.last_error = None;
        self.phase = SearchPhase::Idle;
        self.dropdown_visible = false;
        self.fire_at = None;
        self.hide_at = None;
    }

    /// Input gained focus
    pub fn focus(&mut self) {
        self.hide_at = None;
        self.dropdown_visible = !self.query.is_empty();
    }

    /// Input lost focus; the dropdown hides after [`BLUR_GRACE`]
    pub fn blur(&mut self, now: Instant) {
        if self.dropdown_visible {
            self.hide_at = Some(now + BLUR_GRACE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            vote_average: 7.0,
            release_date: "2020-01-01".into(),
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_issues_single_query_for_final_text() {
        let t0 = Instant::now();
        let mut search = SearchController::default();

        search.input("b", t0);
        assert!(search.tick(t0 + ms(90)).is_none());
        search.input("ba", t0 + ms(100));
        assert!(search.tick(t0 + ms(190)).is_none());
        search.input("bat", t0 + ms(200));

        // 400ms after "ba" but only 300ms after "bat"
        assert!(search.tick(t0 + ms(500)).is_none());
        assert_eq!(search.phase(), SearchPhase::Pending);

        let ticket = search.tick(t0 + ms(600)).unwrap();
        assert_eq!(ticket.query, "bat");
        assert_eq!(search.phase(), SearchPhase::Loading);

        // Timer is consumed
        assert!(search.tick(t0 + ms(2000)).is_none());
    }

    #[test]
    fn test_empty_text_goes_idle_without_query() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("x", t0);
        search.input("", t0 + ms(50));

        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(!search.dropdown_visible());
        assert!(search.next_deadline().is_none());
        assert!(search.tick(t0 + ms(1000)).is_none());
    }

    #[test]
    fn test_commit_settles_and_caps_results() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("alien", t0);
        let ticket = search.tick(t0 + ms(400)).unwrap();

        let movies: Vec<_> = (1..=12).map(movie).collect();
        assert_eq!(search.commit(&ticket, Ok(movies)), Commit::Applied);
        assert_eq!(search.phase(), SearchPhase::Settled);
        assert_eq!(search.results().len(), SEARCH_RESULT_LIMIT);
    }

    #[test]
    fn test_response_for_superseded_text_is_dropped() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("ba", t0);
        let old = search.tick(t0 + ms(400)).unwrap();

        // User keeps typing while "ba" is in flight
        search.input("bat", t0 + ms(450));
        assert_eq!(search.commit(&old, Ok(vec![movie(1)])), Commit::Stale);
        assert!(search.results().is_empty());
        assert_eq!(search.phase(), SearchPhase::Pending);

        let new = search.tick(t0 + ms(850)).unwrap();
        assert_eq!(search.commit(&new, Ok(vec![movie(2)])), Commit::Applied);
        assert_eq!(search.results()[0].id, 2);
    }

    #[test]
    fn test_older_query_arriving_late_is_dropped() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("bat", t0);
        let first = search.tick(t0 + ms(400)).unwrap();
        search.input("batman", t0 + ms(500));
        search.input("bat", t0 + ms(600));
        let second = search.tick(t0 + ms(1000)).unwrap();

        assert_eq!(search.commit(&second, Ok(vec![movie(2)])), Commit::Applied);
        assert_eq!(search.commit(&first, Ok(vec![movie(1)])), Commit::Stale);
        assert_eq!(search.results()[0].id, 2);
    }

    #[test]
    fn test_failure_settles_to_empty() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("q", t0);
        let ticket = search.tick(t0 + ms(400)).unwrap();

        let outcome = search.commit(&ticket, Err(CatalogError::Status(503)));
        assert_eq!(outcome, Commit::Failed(ErrorKind::NetworkFailure));
        assert_eq!(search.phase(), SearchPhase::Settled);
        assert!(search.results().is_empty());
        assert!(search.dropdown_visible());
    }

    #[test]
    fn test_choose_clears_and_cancels_pending_timer() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("dune", t0);
        let ticket = search.tick(t0 + ms(400)).unwrap();
        search.commit(&ticket, Ok(vec![movie(1), movie(2)]));

        // Another keystroke arms the timer again, then a result is chosen
        search.input("dune ", t0 + ms(500));
        let chosen = search.choose(1).unwrap();
        assert_eq!(chosen.id, 2);

        // The stale expiry must not repopulate the dropdown
        assert!(search.tick(t0 + ms(5000)).is_none());
        assert!(!search.dropdown_visible());
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_choose_resets_state() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("dune", t0);
        let ticket = search.tick(t0 + ms(400)).unwrap();
        search.commit(&ticket, Ok(vec![movie(1), movie(2)]));

        let chosen = search.choose(1).unwrap();
        assert_eq!(chosen.id, 2);
        assert_eq!(search.query(), "");
        assert!(search.results().is_empty());
        assert!(!search.dropdown_visible());
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_clear_invalidates_pending_timer_and_in_flight() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("dun", t0);
        let in_flight = search.tick(t0 + ms(400)).unwrap();
        search.input("dune", t0 + ms(450));

        search.clear();
        assert!(search.tick(t0 + ms(5000)).is_none());
        assert_eq!(search.commit(&in_flight, Ok(vec![movie(1)])), Commit::Stale);
        assert!(!search.dropdown_visible());
        assert!(search.results().is_empty());
    }

    #[test]
    fn test_blur_hides_after_grace_and_focus_cancels() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("heat", t0);
        assert!(search.dropdown_visible());

        search.blur(t0 + ms(10));
        search.tick(t0 + ms(100));
        assert!(search.dropdown_visible(), "still within grace delay");

        search.focus();
        search.tick(t0 + ms(400));
        assert!(search.dropdown_visible(), "focus cancelled the hide");

        search.blur(t0 + ms(500));
        search.tick(t0 + ms(700));
        assert!(!search.dropdown_visible());

        // Query is kept; refocusing shows the dropdown again
        search.focus();
        assert!(search.dropdown_visible());
    }

    #[test]
    fn test_next_deadline_is_earliest_timer() {
        let t0 = Instant::now();
        let mut search = SearchController::default();
        search.input("up", t0);
        search.blur(t0);
        assert_eq!(search.next_deadline(), Some(t0 + BLUR_GRACE));
    }
}
