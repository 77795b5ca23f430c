//! Selection cascade controller
//!
//! Selecting a movie fans out four independent queries (detail, credits,
//! reviews, similar). Every query is stamped with the selection it was issued
//! for, and a response is only written if that selection is still live. This
//! is what keeps a slow response for an earlier click from overwriting the
//! panel of the movie the user has since moved on to.

use std::fmt;

use crate::api::{CatalogError, ErrorKind};
use crate::effect::{CascadePayload, Commit};
use crate::models::{CastMember, MovieDetail, MovieSummary, Review};

/// The dependent queries fired for a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeQuery {
    Detail,
    Credits,
    Reviews,
    Similar,
}

impl CascadeQuery {
    pub const ALL: [CascadeQuery; 4] = [
        CascadeQuery::Detail,
        CascadeQuery::Credits,
        CascadeQuery::Reviews,
        CascadeQuery::Similar,
    ];
}

impl fmt::Display for CascadeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CascadeQuery::Detail => "detail",
            CascadeQuery::Credits => "credits",
            CascadeQuery::Reviews => "reviews",
            CascadeQuery::Similar => "similar",
        };
        write!(f, "{}", name)
    }
}

/// Stamp carried by every cascade query
///
/// `generation` increases on every selection change, so re-selecting the same
/// movie still invalidates the queries of the earlier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionTicket {
    pub movie_id: u64,
    pub generation: u64,
}

/// Load state of one detail panel section
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    /// Nothing selected
    Idle,
    Loading,
    Ready(T),
    Failed(ErrorKind),
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Section::Idle
    }
}

impl<T> Section<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Section::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Section::Idle)
    }

    fn settle(&mut self, result: Result<T, CatalogError>) -> Commit {
        match result {
            Ok(value) => {
                *self = Section::Ready(value);
                Commit::Applied
            }
            Err(e) => {
                *self = Section::Failed(e.kind());
                Commit::Failed(e.kind())
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionCascade {
    selected: Option<MovieSummary>,
    generation: u64,
    pub detail: Section<MovieDetail>,
    pub cast: Section<Vec<CastMember>>,
    pub reviews: Section<Vec<Review>>,
    pub similar: Section<Vec<MovieSummary>>,
}

impl SelectionCascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&MovieSummary> {
        self.selected.as_ref()
    }

    /// Bumped on every selection change, including deselection
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticket for the live selection, if any
    pub fn current_ticket(&self) -> Option<SelectionTicket> {
        self.selected.as_ref().map(|m| SelectionTicket {
            movie_id: m.id,
            generation: self.generation,
        })
    }

    /// Change the selection and return the queries to issue for it
    ///
    /// Previously displayed sections are cleared immediately; selecting `None`
    /// issues nothing.
    pub fn select(&mut self, movie: Option<MovieSummary>) -> Vec<(SelectionTicket, CascadeQuery)> {
        self.generation += 1;
        self.detail = Section::Idle;
        self.cast = Section::Idle;
        self.reviews = Section::Idle;
        self.similar = Section::Idle;
        self.selected = movie;

        let Some(ticket) = self.current_ticket() else {
            tracing::debug!(generation = self.generation, "selection cleared");
            return Vec::new();
        };

        self.detail = Section::Loading;
        self.cast = Section::Loading;
        self.reviews = Section::Loading;
        self.similar = Section::Loading;
        tracing::debug!(movie_id = ticket.movie_id, generation = ticket.generation, "cascade dispatched");

        CascadeQuery::ALL.iter().map(|q| (ticket, *q)).collect()
    }

    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        self.current_ticket().as_ref() == Some(ticket)
    }

    /// Write a cascade response into its section if its selection is still live
    pub fn commit(&mut self, ticket: &SelectionTicket, payload: CascadePayload) -> Commit {
        if !self.is_current(ticket) {
            tracing::debug!(
                movie_id = ticket.movie_id,
                query = %payload.query(),
                "stale cascade response dropped"
            );
            return Commit::Stale;
        }

        let query = payload.query();
        let outcome = match payload {
            CascadePayload::Detail(result) => self.detail.settle(result),
            CascadePayload::Credits(result) => self.cast.settle(result),
            CascadePayload::Reviews(result) => self.reviews.settle(result),
            CascadePayload::Similar(result) => self.similar.settle(result),
        };
        if let Commit::Failed(kind) = outcome {
            tracing::warn!(movie_id = ticket.movie_id, %query, ?kind, "cascade query failed");
        }
        outcome
    }

    /// True while any of the four sections is still loading
    pub fn is_loading(&self) -> bool {
        self.detail.is_loading()
            || self.cast.is_loading()
            || self.reviews.is_loading()
            || self.similar.is_loading()
    }
}
