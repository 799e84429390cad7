//! YouTube Music provider and identifier resolver against an HTTP double

use serde_json::json;
use songwire_search::{
    IdentifierResolver, SearchError, SearchFilter, SearchProvider, YouTubeMusicProvider,
};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{search_body, search_config, song_row};

const SONGS_PARAMS: &str = "EgWKAQIIAWoMEA4QChADEAQQCRAF";

#[tokio::test]
async fn test_songs_search_request_and_parse() {
    let oracle = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/search"))
        .and(query_param("prettyPrint", "false"))
        .and(body_partial_json(json!({
            "query": "Bohemian Rhapsody",
            "params": SONGS_PARAMS,
            "context": {"client": {"clientName": "WEB_REMIX"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![
            song_row("X1", "Bohemian Rhapsody", "Queen"),
            song_row("X2", "Bohemian Rhapsody (Live Aid)", "Queen"),
        ])))
        .expect(1)
        .mount(&oracle)
        .await;

    let provider = YouTubeMusicProvider::with_config(&search_config(&oracle)).unwrap();
    let hits = provider
        .search("Bohemian Rhapsody", Some(SearchFilter::Songs))
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].video_id.as_deref(), Some("X1"));
    assert_eq!(hits[0].title, "Bohemian Rhapsody");
    assert_eq!(hits[0].artists, vec!["Queen"]);
}

#[tokio::test]
async fn test_oracle_error_status() {
    let oracle = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&oracle)
        .await;

    let provider = YouTubeMusicProvider::with_config(&search_config(&oracle)).unwrap();
    let err = provider.search("anything", None).await.unwrap_err();

    assert!(matches!(err, SearchError::SearchFailed { .. }));
}

#[tokio::test]
async fn test_oracle_garbage_body() {
    let oracle = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html>"))
        .mount(&oracle)
        .await;

    let provider = YouTubeMusicProvider::with_config(&search_config(&oracle)).unwrap();
    let err = provider.search("anything", None).await.unwrap_err();

    assert!(matches!(err, SearchError::ParseError { .. }));
}

#[tokio::test]
async fn test_resolver_falls_back_to_unfiltered_search() {
    let oracle = MockServer::start().await;

    // Songs shelf is empty for this query
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"params": SONGS_PARAMS})))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![])))
        .expect(1)
        .mount(&oracle)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![
            song_row("V9", "obscure live recording", "Someone"),
        ])))
        .expect(1)
        .mount(&oracle)
        .await;

    let resolver = IdentifierResolver::from_config(&search_config(&oracle)).unwrap();
    let track = resolver.resolve("obscure live recording").await.unwrap();

    assert_eq!(track.id.as_str(), "V9");
}

#[tokio::test]
async fn test_resolver_absorbs_oracle_failure() {
    let oracle = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&oracle)
        .await;

    let resolver = IdentifierResolver::from_config(&search_config(&oracle)).unwrap();

    assert!(resolver.resolve("Bohemian Rhapsody").await.is_none());
}
