//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the same controllers the TUI uses.
//! Each handler takes CLI args and Output, returns ExitCode.

use crate::api::{ErrorKind, TmdbClient};
use crate::app::App;
use crate::cli::{
    validate_movie_id, ExitCode, FavoriteChange, FavoritesAction, FavoritesCmd, InfoCmd,
    ListCmd, MovieInfo, Output, SearchCmd, SuggestCmd,
};
use crate::cascade::Section;
use crate::config::{Config, ConfigError};
use crate::favorites::{FavoritesStore, FileStorage};
use crate::models::MovieSummary;
use crate::runtime::Runtime;

/// Build the catalog client described by `config`
pub fn client(config: &Config) -> Result<TmdbClient, ConfigError> {
    let key = config.api_key()?;
    Ok(TmdbClient::with_base_url(key, config.base_url()).with_timeout(config.request_timeout()))
}

/// Favorites persisted under the configured data directory
pub fn favorites_store(config: &Config) -> FavoritesStore {
    FavoritesStore::load(Box::new(FileStorage::new(config.data_dir())))
}

fn exit_code_for(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::NetworkFailure => ExitCode::NetworkError,
        ErrorKind::EmptyResult => ExitCode::NoResults,
        ErrorKind::ParseFailure => ExitCode::Error,
    }
}

fn summary_lines(movies: &[MovieSummary]) -> String {
    if movies.is_empty() {
        return "No results".to_string();
    }
    movies
        .iter()
        .map(|m| format!("{:>8}  {}", m.id, m))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// List Command
// =============================================================================

pub async fn list_cmd(cmd: ListCmd, config: &Config, client: &TmdbClient, output: &Output) -> ExitCode {
    let filter = cmd.filter.map(Into::into).unwrap_or_else(|| config.filter());
    output.info(format!("Fetching {}...", filter.label()));

    match client.list(filter).await {
        Ok(mut movies) => {
            movies.truncate(cmd.limit);
            if let Err(e) = output.print(&movies, |m| summary_lines(m)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(
            format!("Failed to fetch movies: {}", e),
            exit_code_for(e.kind()),
        ),
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, client: &TmdbClient, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    output.info(format!("Searching for: {}", query));

    match client.search(query).await {
        Ok(mut results) => {
            results.truncate(cmd.limit);
            if let Err(e) = output.print(&results, |r| summary_lines(r)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Search failed: {}", e), exit_code_for(e.kind())),
    }
}

// =============================================================================
// Info Command
// =============================================================================

/// Drive a selection cascade to completion and collect the page
async fn load_page(app: &mut App, runtime: &mut Runtime) -> Result<MovieInfo, ErrorKind> {
    runtime.settle(app).await;

    let detail = match &app.cascade.detail {
        Section::Ready(detail) => detail.clone(),
        Section::Failed(kind) => return Err(*kind),
        Section::Idle | Section::Loading => return Err(ErrorKind::EmptyResult),
    };

    Ok(MovieInfo {
        url: detail.canonical_url(),
        favorite: app.is_favorite(detail.id),
        cast: app.cascade.cast.ready().cloned(),
        reviews: app.cascade.reviews.ready().cloned(),
        similar: app.cascade.similar.ready().cloned(),
        movie: detail,
    })
}

fn render_info(info: &MovieInfo) -> String {
    let movie = &info.movie;
    let mut lines = vec![movie.to_string()];

    let mut facts = vec![format!("★ {:.1} ({} votes)", movie.vote_average, movie.vote_count)];
    facts.extend(movie.runtime_str());
    facts.extend(movie.language_str());
    lines.push(facts.join(" · "));
    if !movie.genres.is_empty() {
        lines.push(format!("Genres: {}", movie.genres_str()));
    }
    if info.favorite {
        lines.push("♥ In favorites".to_string());
    }
    lines.push(String::new());
    lines.push(movie.overview_text().to_string());
    lines.push(String::new());
    lines.push(info.url.clone());

    lines.push(String::new());
    lines.push("Cast:".to_string());
    match &info.cast {
        Some(cast) if !cast.is_empty() => {
            lines.extend(cast.iter().map(|c| format!("  {}", c)));
        }
        Some(_) => lines.push("  No cast info found.".to_string()),
        None => lines.push("  Could not load cast.".to_string()),
    }

    lines.push("Reviews:".to_string());
    match &info.reviews {
        Some(reviews) if !reviews.is_empty() => {
            lines.extend(
                reviews
                    .iter()
                    .map(|r| format!("  {}: {}", r.author, r.excerpt())),
            );
        }
        Some(_) => lines.push("  No reviews found.".to_string()),
        None => lines.push("  Could not load reviews.".to_string()),
    }

    lines.push("Similar:".to_string());
    match &info.similar {
        Some(similar) if !similar.is_empty() => {
            lines.extend(similar.iter().map(|m| format!("  {:>8}  {}", m.id, m)));
        }
        Some(_) => lines.push("  No similar movies found.".to_string()),
        None => lines.push("  Could not load similar movies.".to_string()),
    }

    lines.join("\n")
}

pub async fn info_cmd(
    cmd: InfoCmd,
    client: &TmdbClient,
    favorites: FavoritesStore,
    output: &Output,
) -> ExitCode {
    let id = match validate_movie_id(&cmd.id) {
        Ok(id) => id,
        Err(e) => return output.error(e, ExitCode::InvalidArgs),
    };

    output.info(format!("Getting info for: {}", id));

    let mut app = App::new(favorites);
    let mut runtime = Runtime::new(client.clone());
    let effects = app.select_movie(Some(MovieSummary::from_id(id)));
    runtime.dispatch(effects);

    match load_page(&mut app, &mut runtime).await {
        Ok(info) => {
            if let Err(e) = output.print(&info, |i| render_info(i)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(kind) => output.error(
            format!("Failed to fetch movie {}", id),
            exit_code_for(kind),
        ),
    }
}

// =============================================================================
// Suggest Command
// =============================================================================

pub async fn suggest_cmd(
    cmd: SuggestCmd,
    client: &TmdbClient,
    favorites: FavoritesStore,
    output: &Output,
) -> ExitCode {
    output.info("Picking a random movie...");

    let mut app = App::new(favorites);
    let mut runtime = Runtime::new(client.clone());
    let effects = app.suggest();
    runtime.dispatch(effects);
    runtime.settle(&mut app).await;

    if let Some(banner) = app.banner() {
        return output.error(banner, ExitCode::NetworkError);
    }
    let Some(picked) = app.cascade.selected().cloned() else {
        return output.error("No suggestion available", ExitCode::NoResults);
    };

    if cmd.brief {
        if let Err(e) = output.print(&picked, |m| format!("{:>8}  {}", m.id, m)) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    match load_page(&mut app, &mut runtime).await {
        Ok(info) => {
            if let Err(e) = output.print(&info, |i| render_info(i)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(kind) => output.error(
            format!("Failed to fetch movie {}", picked.id),
            exit_code_for(kind),
        ),
    }
}

// =============================================================================
// Favorites Command
// =============================================================================

pub async fn favorites_cmd(
    cmd: FavoritesCmd,
    client: Option<&TmdbClient>,
    favorites: &mut FavoritesStore,
    output: &Output,
) -> ExitCode {
    match cmd.action {
        FavoritesAction::List => {
            let movies = favorites.movies().to_vec();
            if let Err(e) = output.print(&movies, |m| {
                if m.is_empty() {
                    "No favorites yet.".to_string()
                } else {
                    summary_lines(m)
                }
            }) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }

        FavoritesAction::Add { id } => {
            let id = match validate_movie_id(&id) {
                Ok(id) => id,
                Err(e) => return output.error(e, ExitCode::InvalidArgs),
            };

            let changed = if favorites.contains(id) {
                false
            } else {
                let Some(client) = client else {
                    return output.error("TMDB API key required to add favorites", ExitCode::ConfigError);
                };
                let movie = match client.movie_detail(id).await {
                    Ok(detail) => detail.summary(),
                    Err(e) => {
                        return output.error(
                            format!("Failed to fetch movie {}: {}", id, e),
                            exit_code_for(e.kind()),
                        )
                    }
                };
                match favorites.add(movie) {
                    Ok(changed) => changed,
                    Err(e) => {
                        return output.error(
                            format!("Could not save favorites: {}", e),
                            ExitCode::StorageError,
                        )
                    }
                }
            };

            print_change(output, FavoriteChange { id, favorite: true, changed })
        }

        FavoritesAction::Remove { id } => {
            let id = match validate_movie_id(&id) {
                Ok(id) => id,
                Err(e) => return output.error(e, ExitCode::InvalidArgs),
            };

            match favorites.remove(id) {
                Ok(changed) => print_change(output, FavoriteChange { id, favorite: false, changed }),
                Err(e) => output.error(
                    format!("Could not save favorites: {}", e),
                    ExitCode::StorageError,
                ),
            }
        }
    }
}

fn print_change(output: &Output, change: FavoriteChange) -> ExitCode {
    let result = output.print(&change, |c| match (c.favorite, c.changed) {
        (true, true) => format!("Added {} to favorites", c.id),
        (true, false) => format!("{} is already a favorite", c.id),
        (false, true) => format!("Removed {} from favorites", c.id),
        (false, false) => format!("{} is not a favorite", c.id),
    });
    if let Err(e) = result {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieDetail, NO_OVERVIEW};

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code_for(ErrorKind::NetworkFailure), ExitCode::NetworkError);
        assert_eq!(exit_code_for(ErrorKind::EmptyResult), ExitCode::NoResults);
        assert_eq!(exit_code_for(ErrorKind::ParseFailure), ExitCode::Error);
    }

    #[test]
    fn test_render_info_empty_sections() {
        let info = MovieInfo {
            movie: MovieDetail {
                id: 78,
                title: "Blade Runner".into(),
                poster_path: None,
                vote_average: 7.9,
                vote_count: 13000,
                release_date: "1982-06-25".into(),
                overview: None,
                runtime: Some(117),
                genres: vec!["Science Fiction".into()],
                original_language: Some("en".into()),
                imdb_id: None,
            },
            url: "https://www.themoviedb.org/movie/78".into(),
            favorite: false,
            cast: Some(Vec::new()),
            reviews: None,
            similar: Some(Vec::new()),
        };
        let text = render_info(&info);
        assert!(text.contains(NO_OVERVIEW));
        assert!(text.contains("No cast info found."));
        assert!(text.contains("Could not load reviews."));
        assert!(text.contains("No similar movies found."));
    }

    #[test]
    fn test_summary_lines_empty() {
        assert_eq!(summary_lines(&[]), "No results");
    }
}
