//! CLI - Command Line Interface for MovieMagic
//!
//! Every browsing action of the TUI is scriptable. All output is
//! JSON-parseable with `--json` (the default when stdout is not a TTY).
//!
//! # Examples
//!
//! ```bash
//! # Browse lists
//! moviemagic list --filter top-rated --limit 5
//!
//! # Search and inspect
//! moviemagic search "blade runner"
//! moviemagic info 78
//!
//! # Random pick and favorites
//! moviemagic suggest
//! moviemagic favorites add 78
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{
    CastMember, Filter, MovieDetail, MovieSummary, Review, SEARCH_RESULT_LIMIT,
};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Catalog returned nothing usable
    NoResults = 4,
    /// Missing or invalid configuration
    ConfigError = 5,
    /// Favorites could not be saved
    StorageError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// MovieMagic - browse TMDB from the terminal
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "moviemagic",
    version,
    about = "Browse, search and bookmark movies from TMDB",
    long_about = "A terminal movie browser: trending and curated lists, \
                  as-you-type search, full movie pages and favorites.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  moviemagic                          Launch interactive TUI\n\
                  moviemagic list -f upcoming         Upcoming releases\n\
                  moviemagic search \"blade runner\"    Search by title\n\
                  moviemagic info 78 --json           Full movie page as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show one of the curated lists
    #[command(visible_alias = "ls")]
    List(ListCmd),

    /// Search movies by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Full movie page: details, cast, reviews, similar
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Pick a random popular movie
    #[command(visible_alias = "r")]
    Suggest(SuggestCmd),

    /// Manage favorites
    #[command(visible_alias = "fav")]
    Favorites(FavoritesCmd),
}

// =============================================================================
// List Command
// =============================================================================

/// Show the first page of a curated list
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Which list to show
    #[arg(long, short = 'f', value_enum)]
    pub filter: Option<FilterArg>,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Curated list selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    /// Trending this week
    Trending,
    /// Highest rated
    TopRated,
    /// Coming soon
    Upcoming,
    /// In theaters
    NowPlaying,
}

impl From<FilterArg> for Filter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Trending => Filter::Trending,
            FilterArg::TopRated => Filter::TopRated,
            FilterArg::Upcoming => Filter::Upcoming,
            FilterArg::NowPlaying => Filter::NowPlaying,
        }
    }
}

// =============================================================================
// Search Command
// =============================================================================

/// Search movies by title
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value_t = SEARCH_RESULT_LIMIT)]
    pub limit: usize,
}

// =============================================================================
// Info Command
// =============================================================================

/// Get the full page of a movie
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB movie ID (e.g., 78)
    #[arg(required = true)]
    pub id: String,
}

// =============================================================================
// Suggest Command
// =============================================================================

/// Pick a random movie from the popular pages
#[derive(Args, Debug)]
pub struct SuggestCmd {
    /// Only print the picked movie, skip the full page
    #[arg(long, short = 'b')]
    pub brief: bool,
}

// =============================================================================
// Favorites Command
// =============================================================================

/// Manage the favorites list
#[derive(Args, Debug)]
pub struct FavoritesCmd {
    #[command(subcommand)]
    pub action: FavoritesAction,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List favorites in the order they were added
    #[command(visible_alias = "ls")]
    List,

    /// Add a movie by TMDB ID
    Add {
        /// TMDB movie ID
        id: String,
    },

    /// Remove a movie by TMDB ID
    #[command(visible_alias = "rm")]
    Remove {
        /// TMDB movie ID
        id: String,
    },
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Full movie page; sections that failed to load are `null`
#[derive(Debug, Serialize, Deserialize)]
pub struct MovieInfo {
    pub movie: MovieDetail,
    pub url: String,
    pub favorite: bool,
    pub cast: Option<Vec<CastMember>>,
    pub reviews: Option<Vec<Review>>,
    pub similar: Option<Vec<MovieSummary>>,
}

/// Result of a favorites mutation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FavoriteChange {
    pub id: u64,
    pub favorite: bool,
    /// False when the movie was already in (or absent from) the list
    pub changed: bool,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data; `human` renders it when not in JSON mode
    pub fn print<T: Serialize>(&self, data: T, human: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", human(&data));
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Movie ID Validation
// =============================================================================

/// Validate a TMDB movie ID (positive integer)
pub fn validate_movie_id(id: &str) -> Result<u64, &'static str> {
    match id.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err("Invalid movie ID (expected a positive TMDB ID, e.g. 78)"),
    }
}

// =============================================================================
// Tests
// =============================================================================
