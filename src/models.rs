//! Data structures and types for MovieMagic
//!
//! Contains the shared catalog models used across the application:
//! - **Summaries**: list/search/similar entries and the favorites payload
//! - **Details**: the full record shown in the detail panel
//! - **Credits & Reviews**: cast entries and user reviews for a movie
//! - **Filters**: which list endpoint drives the main grid

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Base URL for poster and profile images
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Public movie page, suffixed with the TMDB id
pub const MOVIE_PAGE_URL: &str = "https://www.themoviedb.org/movie";

/// Maximum entries shown in the search dropdown
pub const SEARCH_RESULT_LIMIT: usize = 7;
/// Maximum cast entries kept per movie
pub const CAST_LIMIT: usize = 10;
/// Maximum reviews kept per movie
pub const REVIEW_LIMIT: usize = 3;
/// Maximum similar movies kept per movie
pub const SIMILAR_LIMIT: usize = 10;
/// Review bodies longer than this are cut and suffixed with "..."
pub const REVIEW_EXCERPT_CHARS: usize = 300;

/// Shown when a movie has no overview text
pub const NO_OVERVIEW: &str = "No overview available.";

// =============================================================================
// Filters
// =============================================================================

/// List endpoint driving the main grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    Trending,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl Filter {
    /// All filters in display order
    pub const ALL: [Filter; 4] = [
        Filter::Trending,
        Filter::TopRated,
        Filter::Upcoming,
        Filter::NowPlaying,
    ];

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Filter::Trending => "Trending",
            Filter::TopRated => "Top Rated",
            Filter::Upcoming => "Upcoming",
            Filter::NowPlaying => "Now Playing",
        }
    }

    /// Stable identifier (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::Trending => "trending",
            Filter::TopRated => "top_rated",
            Filter::Upcoming => "upcoming",
            Filter::NowPlaying => "now_playing",
        }
    }

    /// Next filter, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous filter, wrapping around
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Images
// =============================================================================

/// Placeholder flavours, one per image slot in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Grid cards, similar carousel and the detail poster
    Poster,
    /// Search dropdown thumbnails
    Thumb,
    /// Cast profile pictures
    Profile,
}

impl Placeholder {
    pub fn url(&self) -> &'static str {
        match self {
            Placeholder::Poster => "https://via.placeholder.com/300x450?text=No+Image",
            Placeholder::Thumb => "https://via.placeholder.com/40x60?text=No+Image",
            Placeholder::Profile => "https://via.placeholder.com/80x120?text=No+Image",
        }
    }
}

/// Resolve an optional TMDB image path into a displayable URL
pub fn image_url(path: Option<&str>, placeholder: Placeholder) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{}{}", IMAGE_BASE_URL, p),
        _ => placeholder.url().to_string(),
    }
}

/// Cut `text` to at most `max` characters, appending "..." when shortened
pub fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}...", &text[..byte_idx])),
        None => Cow::Borrowed(text),
    }
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

// =============================================================================
// Movie Summary
// =============================================================================

/// Movie as it appears in lists, search results and the favorites set
///
/// Two summaries with the same `id` describe the same movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    /// ISO date or empty
    #[serde(default)]
    pub release_date: String,
}

impl MovieSummary {
    /// Bare summary for a known id; the cascade fills in the rest
    pub fn from_id(id: u64) -> Self {
        Self {
            id,
            title: String::new(),
            poster_path: None,
            vote_average: 0.0,
            release_date: String::new(),
        }
    }

    pub fn poster_url(&self) -> String {
        image_url(self.poster_path.as_deref(), Placeholder::Poster)
    }

    pub fn thumb_url(&self) -> String {
        image_url(self.poster_path.as_deref(), Placeholder::Thumb)
    }

    pub fn year(&self) -> Option<u16> {
        extract_year(&self.release_date)
    }
}

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} ⭐ {:.1}", self.title, year_str, self.vote_average)
    }
}

// =============================================================================
// Movie Detail
// =============================================================================

/// Full movie record for the detail panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: f32,
    pub vote_count: u32,
    pub release_date: String,
    pub overview: Option<String>,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub original_language: Option<String>,
    pub imdb_id: Option<String>,
}

impl MovieDetail {
    /// Summary view of this movie, used when toggling it as a favorite
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            vote_average: self.vote_average,
            release_date: self.release_date.clone(),
        }
    }

    pub fn poster_url(&self) -> String {
        image_url(self.poster_path.as_deref(), Placeholder::Poster)
    }

    /// Overview text or the placeholder
    pub fn overview_text(&self) -> &str {
        match self.overview.as_deref() {
            Some(o) if !o.trim().is_empty() => o,
            _ => NO_OVERVIEW,
        }
    }

    /// Runtime like "148 min", if known
    pub fn runtime_str(&self) -> Option<String> {
        self.runtime.filter(|r| *r > 0).map(|r| format!("{} min", r))
    }

    /// Original language code, uppercased
    pub fn language_str(&self) -> Option<String> {
        self.original_language
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| l.to_uppercase())
    }

    pub fn genres_str(&self) -> String {
        self.genres.join(", ")
    }

    /// Link to the public TMDB page for this movie
    pub fn canonical_url(&self) -> String {
        format!("{}/{}", MOVIE_PAGE_URL, self.id)
    }

    pub fn year(&self) -> Option<u16> {
        extract_year(&self.release_date)
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} - ⭐ {:.1}", self.title, year_str, self.vote_average)?;
        if let Some(runtime) = self.runtime_str() {
            write!(f, " - {}", runtime)?;
        }
        Ok(())
    }
}

// =============================================================================
// Credits & Reviews
// =============================================================================

/// One entry of a movie's cast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub cast_id: Option<u64>,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

impl CastMember {
    /// Disambiguating key: `cast_id` when present, person id otherwise
    pub fn key(&self) -> u64 {
        self.cast_id.unwrap_or(self.id)
    }

    pub fn profile_url(&self) -> String {
        image_url(self.profile_path.as_deref(), Placeholder::Profile)
    }
}

impl fmt::Display for CastMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.character.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} as {}", self.name, self.character)
        }
    }
}

/// User review of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    pub url: String,
}

impl Review {
    /// Body as displayed: at most 300 characters, "..." when cut
    pub fn excerpt(&self) -> Cow<'_, str> {
        truncate_chars(&self.content, REVIEW_EXCERPT_CHARS)
    }
}
