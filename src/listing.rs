//! Filtered list controller
//!
//! Fetches the main grid for the active filter. Each fetch supersedes the
//! previous one; a response is written only if it belongs to the latest fetch.

use crate::api::CatalogError;
use crate::effect::Commit;
use crate::models::{Filter, MovieSummary};

/// Stamp carried by a list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket {
    pub seq: u64,
    pub filter: Filter,
}

#[derive(Debug, Default)]
pub struct FilteredList {
    filter: Filter,
    movies: Vec<MovieSummary>,
    loading: bool,
    failed: bool,
    seq: u64,
}

impl FilteredList {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last fetch for the active filter failed
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Switch filter and start a fetch for it; re-selecting the active filter refetches
    pub fn set_filter(&mut self, filter: Filter) -> ListTicket {
        self.filter = filter;
        self.reload()
    }

    /// Start a fetch for the active filter
    pub fn reload(&mut self) -> ListTicket {
        self.seq += 1;
        self.loading = true;
        self.failed = false;
        let ticket = ListTicket {
            seq: self.seq,
            filter: self.filter,
        };
        tracing::debug!(filter = %ticket.filter.as_str(), seq = ticket.seq, "list dispatched");
        ticket
    }

    /// Apply a list response if it belongs to the latest fetch
    pub fn commit(
        &mut self,
        ticket: &ListTicket,
        result: Result<Vec<MovieSummary>, CatalogError>,
    ) -> Commit {
        if ticket.seq != self.seq {
            tracing::debug!(filter = %ticket.filter.as_str(), "stale list response dropped");
            return Commit::Stale;
        }

        self.loading = false;
        match result {
            Ok(movies) => {
                tracing::info!(filter = %ticket.filter.as_str(), count = movies.len(), "list loaded");
                self.movies = movies;
                Commit::Applied
            }
            Err(e) => {
                tracing::warn!(filter = %ticket.filter.as_str(), error = %e, "list fetch failed");
                // Never leave another filter's movies under the active filter
                self.movies.clear();
                self.failed = true;
                Commit::Failed(e.kind())
            }
        }
    }
}
