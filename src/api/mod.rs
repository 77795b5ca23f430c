//! API clients for external services
//!
//! - TMDB: movie lists, search, details, credits, reviews and similar titles

pub mod tmdb;

pub use tmdb::{CatalogError, ErrorKind, TmdbClient};
