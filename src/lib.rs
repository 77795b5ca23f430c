//! MovieMagic - terminal movie browser backed by TMDB
//!
//! Browse curated lists, search as you type, open a full movie page and keep
//! favorites. All network work is asynchronous; responses that arrive after
//! the user has moved on are discarded instead of overwriting newer state.
//!
//! # Modules
//!
//! - `models` - Movie, cast and review records
//! - `api` - TMDB client
//! - `search`, `cascade`, `listing`, `suggest`, `favorites` - state controllers
//! - `effect` - requests emitted by controllers and their completions
//! - `app` - Application state and key handling
//! - `runtime` - Executes effects on tokio tasks
//! - `ui` - TUI components
//! - `cli`, `commands`, `config` - Command line surface

pub mod api;
pub mod app;
pub mod cascade;
pub mod cli;
pub mod commands;
pub mod config;
pub mod effect;
pub mod favorites;
pub mod listing;
pub mod models;
pub mod runtime;
pub mod search;
pub mod suggest;
pub mod ui;

// Re-export commonly used types
pub use models::{CastMember, Filter, MovieDetail, MovieSummary, Review};

pub use api::{CatalogError, ErrorKind, TmdbClient};
pub use app::{App, View};
pub use effect::{Completion, Effect};
pub use favorites::{FavoritesStore, FileStorage, MemoryStorage, Storage};
pub use runtime::Runtime;
