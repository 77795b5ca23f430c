//! TMDB (The Movie Database) API client
//!
//! Thin typed wrapper over the v3 REST API. Every call normalizes the payload
//! into the crate's models and reports failures as [`CatalogError`]. The client
//! never retries; callers decide what a failure means for the user.
//! API docs: https://developer.themoviedb.org/docs

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    CastMember, Filter, MovieDetail, MovieSummary, Review, CAST_LIMIT, REVIEW_LIMIT,
    SIMILAR_LIMIT,
};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Catalog failure as seen by the controllers
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    Parse(String),

    #[error("No results")]
    Empty,
}

/// Coarse failure taxonomy used for user-facing decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    EmptyResult,
    ParseFailure,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Request(e) if e.is_decode() => ErrorKind::ParseFailure,
            CatalogError::Request(_) | CatalogError::Status(_) => ErrorKind::NetworkFailure,
            CatalogError::Parse(_) => ErrorKind::ParseFailure,
            CatalogError::Empty => ErrorKind::EmptyResult,
        }
    }
}

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: build_http_client(DEFAULT_TIMEOUT),
        }
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    /// Make a keyed GET request and decode the JSON body
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(endpoint, "tmdb request");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| {
                    tracing::warn!(endpoint, error = %e, "tmdb payload rejected");
                    CatalogError::Parse(format!("JSON parse error: {}", e))
                })
            }
            status => {
                tracing::warn!(endpoint, status = status.as_u16(), "tmdb request failed");
                Err(CatalogError::Status(status.as_u16()))
            }
        }
    }

    /// First page of the list behind `filter`
    pub async fn list(&self, filter: Filter) -> Result<Vec<MovieSummary>, CatalogError> {
        let endpoint = match filter {
            Filter::Trending => "/trending/movie/week".to_string(),
            other => format!("/movie/{}?language=en-US&page=1", other.as_str()),
        };
        let response: ListResponse = self.get(&endpoint).await?;
        Ok(response.into_summaries(None))
    }

    /// Search movies by title
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let endpoint = format!(
            "/search/movie?language=en-US&query={}&page=1&include_adult=false",
            urlencoding::encode(query)
        );
        let response: ListResponse = self.get(&endpoint).await?;
        Ok(response.into_summaries(None))
    }

    /// Get movie details by ID
    pub async fn movie_detail(&self, id: u64) -> Result<MovieDetail, CatalogError> {
        let endpoint = format!("/movie/{}?language=en-US", id);
        let response: DetailResponse = self.get(&endpoint).await?;
        Ok(response.into_detail())
    }

    /// Top-billed cast of a movie
    pub async fn credits(&self, id: u64) -> Result<Vec<CastMember>, CatalogError> {
        let endpoint = format!("/movie/{}/credits?language=en-US", id);
        let response: CreditsResponse = self.get(&endpoint).await?;
        Ok(response.into_cast())
    }

    /// First reviews of a movie
    pub async fn reviews(&self, id: u64) -> Result<Vec<Review>, CatalogError> {
        let endpoint = format!("/movie/{}/reviews?language=en-US&page=1", id);
        let response: ReviewsResponse = self.get(&endpoint).await?;
        Ok(response.into_reviews())
    }

    /// Movies similar to `id`
    pub async fn similar(&self, id: u64) -> Result<Vec<MovieSummary>, CatalogError> {
        let endpoint = format!("/movie/{}/similar?language=en-US&page=1", id);
        let response: ListResponse = self.get(&endpoint).await?;
        Ok(response.into_summaries(Some(SIMILAR_LIMIT)))
    }

    /// One page of popular movies
    pub async fn popular(&self, page: u8) -> Result<Vec<MovieSummary>, CatalogError> {
        let endpoint = format!("/movie/popular?language=en-US&page={}", page);
        let response: ListResponse = self.get(&endpoint).await?;
        Ok(response.into_summaries(None))
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Option<Vec<MovieRaw>>,
}

impl ListResponse {
    fn into_summaries(self, limit: Option<usize>) -> Vec<MovieSummary> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .filter_map(MovieRaw::into_summary)
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: Option<u64>,
    title: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
    release_date: Option<String>,
}

impl MovieRaw {
    fn into_summary(self) -> Option<MovieSummary> {
        Some(MovieSummary {
            id: self.id?,
            title: self.title.unwrap_or_default(),
            poster_path: self.poster_path.filter(|p| !p.is_empty()),
            vote_average: self.vote_average.unwrap_or(0.0),
            release_date: self.release_date.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    id: u64,
    title: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    release_date: Option<String>,
    overview: Option<String>,
    runtime: Option<u32>,
    genres: Option<Vec<GenreRaw>>,
    original_language: Option<String>,
    imdb_id: Option<String>,
}

impl DetailResponse {
    fn into_detail(self) -> MovieDetail {
        MovieDetail {
            id: self.id,
            title: self.title.unwrap_or_default(),
            poster_path: self.poster_path.filter(|p| !p.is_empty()),
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            release_date: self.release_date.unwrap_or_default(),
            overview: self.overview,
            runtime: self.runtime,
            genres: self
                .genres
                .unwrap_or_default()
                .into_iter()
                .filter_map(|g| g.name)
                .filter(|name| !name.is_empty())
                .collect(),
            original_language: self.original_language,
            imdb_id: self.imdb_id.filter(|i| !i.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    cast: Option<Vec<CastRaw>>,
}

impl CreditsResponse {
    fn into_cast(self) -> Vec<CastMember> {
        self.cast
            .unwrap_or_default()
            .into_iter()
            .take(CAST_LIMIT)
            .map(CastRaw::into_member)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct CastRaw {
    id: Option<u64>,
    cast_id: Option<u64>,
    name: Option<String>,
    character: Option<String>,
    profile_path: Option<String>,
}

impl CastRaw {
    fn into_member(self) -> CastMember {
        CastMember {
            id: self.id.unwrap_or(0),
            cast_id: self.cast_id,
            name: self.name.unwrap_or_default(),
            character: self.character.unwrap_or_default(),
            profile_path: self.profile_path.filter(|p| !p.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    results: Option<Vec<ReviewRaw>>,
}

impl ReviewsResponse {
    fn into_reviews(self) -> Vec<Review> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .take(REVIEW_LIMIT)
            .map(ReviewRaw::into_review)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ReviewRaw {
    id: Option<String>,
    author: Option<String>,
    content: Option<String>,
    url: Option<String>,
}

impl ReviewRaw {
    fn into_review(self) -> Review {
        Review {
            id: self.id.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
        }
    }
}
