//! Effects emitted by the controllers and the completions that answer them
//!
//! Controllers never touch the network. A user action yields a list of
//! [`Effect`]s, each stamped with the ticket it was issued for; the runtime
//! executes them and feeds a [`Completion`] carrying the same ticket back into
//! [`App::apply`](crate::app::App::apply), where the owning controller decides
//! whether the result is still wanted.

use crate::api::{CatalogError, ErrorKind};
use crate::cascade::{CascadeQuery, SelectionTicket};
use crate::listing::ListTicket;
use crate::models::{CastMember, MovieDetail, MovieSummary, Review};
use crate::search::SearchTicket;
use crate::suggest::SuggestTicket;

/// Network work requested by a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Primary list for the ticket's filter
    FetchList { ticket: ListTicket },
    /// Search for the ticket's query text
    Search { ticket: SearchTicket },
    /// One of the four cascade queries for the ticket's movie
    Cascade {
        ticket: SelectionTicket,
        query: CascadeQuery,
    },
    /// Page of popular movies for a random suggestion
    FetchPopular { ticket: SuggestTicket, page: u8 },
}

/// Settled network work, routed back to the issuing controller
#[derive(Debug)]
pub enum Completion {
    List {
        ticket: ListTicket,
        result: Result<Vec<MovieSummary>, CatalogError>,
    },
    Search {
        ticket: SearchTicket,
        result: Result<Vec<MovieSummary>, CatalogError>,
    },
    Cascade {
        ticket: SelectionTicket,
        payload: CascadePayload,
    },
    Popular {
        ticket: SuggestTicket,
        result: Result<Vec<MovieSummary>, CatalogError>,
    },
}

/// Result of one cascade query
#[derive(Debug)]
pub enum CascadePayload {
    Detail(Result<MovieDetail, CatalogError>),
    Credits(Result<Vec<CastMember>, CatalogError>),
    Reviews(Result<Vec<Review>, CatalogError>),
    Similar(Result<Vec<MovieSummary>, CatalogError>),
}

impl CascadePayload {
    pub fn query(&self) -> CascadeQuery {
        match self {
            CascadePayload::Detail(_) => CascadeQuery::Detail,
            CascadePayload::Credits(_) => CascadeQuery::Credits,
            CascadePayload::Reviews(_) => CascadeQuery::Reviews,
            CascadePayload::Similar(_) => CascadeQuery::Similar,
        }
    }
}

/// What a controller did with a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Result written into state
    Applied,
    /// Result still wanted, but the request failed
    Failed(ErrorKind),
    /// Result no longer wanted; state untouched
    Stale,
}
