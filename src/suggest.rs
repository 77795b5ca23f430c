//! Random suggestion controller
//!
//! Picks a random page of popular movies, then a random movie from that page,
//! and hands it back to become the new selection. The random source is passed
//! in, so a seeded generator makes the pick reproducible.

use rand::Rng;

use crate::api::{CatalogError, ErrorKind};
use crate::models::MovieSummary;

/// Popular pages to choose from (1..=POPULAR_PAGES)
pub const POPULAR_PAGES: u8 = 5;

/// Stamp carried by a suggestion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestTicket {
    pub seq: u64,
    /// Selection generation right after the suggestion cleared the selection
    pub selection_generation: u64,
}

/// What happened to a suggestion response
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    Picked(MovieSummary),
    Failed(ErrorKind),
    /// Superseded, or the user selected something else meanwhile
    Stale,
}

#[derive(Debug, Default)]
pub struct RandomSuggestion {
    busy: bool,
    seq: u64,
}

impl RandomSuggestion {
    pub fn new() -> Self {
        Self::default()
    }

    /// A suggestion is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start a suggestion; returns the ticket and the page to fetch
    pub fn begin<R: Rng>(&mut self, selection_generation: u64, rng: &mut R) -> (SuggestTicket, u8) {
        self.seq += 1;
        self.busy = true;
        let page = rng.gen_range(1..=POPULAR_PAGES);
        let ticket = SuggestTicket {
            seq: self.seq,
            selection_generation,
        };
        tracing::debug!(page, seq = ticket.seq, "suggestion dispatched");
        (ticket, page)
    }

    /// Resolve a popular-page response into a pick
    pub fn resolve<R: Rng>(
        &mut self,
        ticket: &SuggestTicket,
        result: Result<Vec<MovieSummary>, CatalogError>,
        live_generation: u64,
        rng: &mut R,
    ) -> Suggestion {
        if ticket.seq != self.seq {
            return Suggestion::Stale;
        }
        self.busy = false;

        if ticket.selection_generation != live_generation {
            tracing::debug!("suggestion abandoned, selection changed meanwhile");
            return Suggestion::Stale;
        }

        let movies = match result {
            Ok(movies) if !movies.is_empty() => movies,
            Ok(_) => return Suggestion::Failed(CatalogError::Empty.kind()),
            Err(e) => {
                tracing::warn!(error = %e, "suggestion fetch failed");
                return Suggestion::Failed(e.kind());
            }
        };

        let idx = rng.gen_range(0..movies.len());
        match movies.into_iter().nth(idx) {
            Some(movie) => {
                tracing::info!(movie_id = movie.id, title = %movie.title, "suggested");
                Suggestion::Picked(movie)
            }
            None => Suggestion::Failed(ErrorKind::EmptyResult),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            vote_average: 7.0,
            release_date: String::new(),
        }
    }

    #[test]
    fn test_page_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut suggest = RandomSuggestion::new();
        for _ in 0..50 {
            let (_, page) = suggest.begin(0, &mut rng);
            assert!((1..=POPULAR_PAGES).contains(&page));
        }
    }

    #[test]
    fn test_pick_is_deterministic_for_seed() {
        let pages: Vec<MovieSummary> = (1..=20).map(movie).collect();

        let pick = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut suggest = RandomSuggestion::new();
            let (ticket, _) = suggest.begin(3, &mut rng);
            suggest.resolve(&ticket, Ok(pages.clone()), 3, &mut rng)
        };

        assert_eq!(pick(42), pick(42));
        assert!(matches!(pick(7), Suggestion::Picked(_)));
    }

    #[test]
    fn test_empty_page_fails() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut suggest = RandomSuggestion::new();
        let (ticket, _) = suggest.begin(1, &mut rng);

        let outcome = suggest.resolve(&ticket, Ok(Vec::new()), 1, &mut rng);
        assert_eq!(outcome, Suggestion::Failed(ErrorKind::EmptyResult));
        assert!(!suggest.is_busy());
    }

    #[test]
    fn test_selection_change_abandons_suggestion() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut suggest = RandomSuggestion::new();
        let (ticket, _) = suggest.begin(1, &mut rng);
        assert!(suggest.is_busy());

        let outcome = suggest.resolve(&ticket, Ok(vec![movie(1)]), 2, &mut rng);
        assert_eq!(outcome, Suggestion::Stale);
        assert!(!suggest.is_busy());
    }

    #[test]
    fn test_superseded_suggestion_is_stale() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut suggest = RandomSuggestion::new();
        let (first, _) = suggest.begin(1, &mut rng);
        let (_second, _) = suggest.begin(2, &mut rng);

        let outcome = suggest.resolve(&first, Ok(vec![movie(1)]), 1, &mut rng);
        assert_eq!(outcome, Suggestion::Stale);
        assert!(suggest.is_busy());
    }
}
