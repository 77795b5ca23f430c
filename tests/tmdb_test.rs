//! TMDB API client tests
//!
//! Tests lists, search, the cascade endpoints and error handling.

use std::time::Duration;

use mockito::{Matcher, Server};
use moviemagic::api::{CatalogError, ErrorKind, TmdbClient};
use moviemagic::models::{Filter, NO_OVERVIEW};

fn list_body(ids: &[u64]) -> String {
    let entries: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"id": {id}, "title": "Movie {id}", "poster_path": "/p{id}.jpg", "vote_average": 7.1, "release_date": "2021-10-22"}}"#
            )
        })
        .collect();
    format!(r#"{{"page": 1, "results": [{}], "total_pages": 5}}"#, entries.join(","))
}

// =============================================================================
// List Tests
// =============================================================================

#[tokio::test]
async fn test_trending_uses_weekly_endpoint_and_key() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/trending/movie/week")
        .match_query(Matcher::UrlEncoded("api_key".into(), "test_key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(list_body(&[438631, 580489]))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let movies = client.list(Filter::Trending).await.unwrap();

    mock.assert_async().await;
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].id, 438631);
    assert_eq!(movies[0].year(), Some(2021));
    assert_eq!(movies[0].poster_url(), "https://image.tmdb.org/t/p/w500/p438631.jpg");
}

#[tokio::test]
async fn test_curated_filters_use_movie_endpoints() {
    let mut server = Server::new_async().await;

    for (filter, path) in [
        (Filter::TopRated, "/movie/top_rated"),
        (Filter::Upcoming, "/movie/upcoming"),
        (Filter::NowPlaying, "/movie/now_playing"),
    ] {
        let mock = server
            .mock("GET", path)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("language".into(), "en-US".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(list_body(&[1, 2, 3]))
            .create_async()
            .await;

        let client = TmdbClient::with_base_url("k", server.url());
        let movies = client.list(filter).await.unwrap();
        mock.assert_async().await;
        assert_eq!(movies.len(), 3, "{:?}", filter);
    }
}

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_sends_query_parameters() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "blade runner".into()),
            Matcher::UrlEncoded("include_adult".into(), "false".into()),
            Matcher::UrlEncoded("language".into(), "en-US".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("api_key".into(), "test_key".into()),
        ]))
        .with_status(200)
        .with_body(list_body(&[78, 335984]))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let results = client.search("blade runner").await.unwrap();

    mock.assert_async().await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].id, 335984);
}

#[tokio::test]
async fn test_search_tolerates_missing_fields() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": [{"id": 5, "title": "Bare", "poster_path": null}, {"title": "no id"}]}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    let results = client.search("bare").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].vote_average, 0.0);
    assert!(results[0].poster_url().contains("placeholder"));
    assert_eq!(results[0].year(), None);
}

// =============================================================================
// Detail / Cascade Tests
// =============================================================================

#[tokio::test]
async fn test_movie_detail_without_optional_fields() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": 42, "title": "Sparse"}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    let detail = client.movie_detail(42).await.unwrap();

    assert_eq!(detail.title, "Sparse");
    assert_eq!(detail.overview_text(), NO_OVERVIEW);
    assert!(detail.genres.is_empty());
    assert!(detail.poster_url().contains("placeholder"));
    assert_eq!(detail.canonical_url(), "https://www.themoviedb.org/movie/42");
}

#[tokio::test]
async fn test_movie_detail_tolerates_unnamed_genre() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/7")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": 7, "title": "X", "genres": [{"id": 1}, {"id": 18, "name": "Drama"}]}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    let detail = client.movie_detail(7).await.unwrap();

    assert_eq!(detail.title, "X");
    assert_eq!(detail.genres, vec!["Drama".to_string()]);
}

#[tokio::test]
async fn test_movie_detail_full() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/78")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "id": 78,
                "title": "Blade Runner",
                "overview": "In the smog-choked dystopian Los Angeles of 2019...",
                "poster_path": "/63N9uy8nd9j7Eog2axPQ8lbr3Wj.jpg",
                "release_date": "1982-06-25",
                "runtime": 117,
                "vote_average": 7.9,
                "vote_count": 13500,
                "original_language": "en",
                "imdb_id": "tt0083658",
                "genres": [{"id": 878, "name": "Science Fiction"}, {"id": 18, "name": "Drama"}]
            }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    let detail = client.movie_detail(78).await.unwrap();

    assert_eq!(detail.year(), Some(1982));
    assert_eq!(detail.runtime_str().as_deref(), Some("117 min"));
    assert_eq!(detail.language_str().as_deref(), Some("EN"));
    assert_eq!(detail.genres_str(), "Science Fiction, Drama");
    assert_eq!(detail.summary().id, 78);
}

#[tokio::test]
async fn test_credits_capped_at_ten() {
    let mut server = Server::new_async().await;

    let cast: Vec<String> = (1..=15)
        .map(|i| {
            format!(
                r#"{{"id": {i}, "cast_id": {}, "name": "Actor {i}", "character": "Role {i}"}}"#,
                i + 100
            )
        })
        .collect();
    let _mock = server
        .mock("GET", "/movie/78/credits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(format!(r#"{{"id": 78, "cast": [{}], "crew": []}}"#, cast.join(",")))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    let cast = client.credits(78).await.unwrap();

    assert_eq!(cast.len(), 10);
    assert_eq!(cast[0].name, "Actor 1");
    assert_eq!(cast[0].key(), 101);
}

#[tokio::test]
async fn test_reviews_capped_at_three() {
    let mut server = Server::new_async().await;

    let long = "x".repeat(500);
    let reviews: Vec<String> = (1..=5)
        .map(|i| format!(r#"{{"id": "r{i}", "author": "critic{i}", "content": "{long}", "url": "https://t/r{i}"}}"#))
        .collect();
    let _mock = server
        .mock("GET", "/movie/78/reviews")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(format!(r#"{{"results": [{}]}}"#, reviews.join(",")))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    let reviews = client.reviews(78).await.unwrap();

    assert_eq!(reviews.len(), 3);
    assert_eq!(reviews[0].excerpt().chars().count(), 303);
    assert!(reviews[0].excerpt().ends_with("..."));
}

#[tokio::test]
async fn test_similar_capped_at_ten() {
    let mut server = Server::new_async().await;

    let ids: Vec<u64> = (1..=20).collect();
    let _mock = server
        .mock("GET", "/movie/78/similar")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(list_body(&ids))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    assert_eq!(client.similar(78).await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_popular_requests_page() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::UrlEncoded("page".into(), "4".into()))
        .with_status(200)
        .with_body(list_body(&[9, 8, 7]))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    let movies = client.popular(4).await.unwrap();

    mock.assert_async().await;
    assert_eq!(movies.len(), 3);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_unauthorized_is_network_failure() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/trending/movie/week")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"status_code": 7, "status_message": "Invalid API key"}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("bad_key", server.url());
    let err = client.list(Filter::Trending).await.unwrap_err();

    assert!(matches!(err, CatalogError::Status(401)));
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
}

#[tokio::test]
async fn test_malformed_json_is_parse_failure() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    let err = client.movie_detail(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
}

#[tokio::test]
async fn test_missing_results_is_empty_list() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"page": 1}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("k", server.url());
    assert!(client.popular(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_network_failure() {
    // Nothing listens on port 9 of localhost
    let client = TmdbClient::with_base_url("k", "http://127.0.0.1:9")
        .with_timeout(Duration::from_secs(2));
    let err = client.list(Filter::Upcoming).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
}

#[tokio::test]
async fn test_silent_server_times_out_as_network_failure() {
    // Accepts connections but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _silent = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = TmdbClient::with_base_url("k", format!("http://{}", addr))
        .with_timeout(Duration::from_millis(300));
    let err = client.movie_detail(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
}
