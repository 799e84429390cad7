//! Full request flow: query -> identifier -> mirror -> redirect

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{Value, json};
use songwire_core::SongwireConfig;
use songwire_web::AppState;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{mirror_config, mount_mirror, search_body, search_config, song_row, streams_body};

struct Harness {
    address: SocketAddr,
    client: reqwest::Client,
}

impl Harness {
    async fn start(oracle: &MockServer, mirrors: &[&MockServer]) -> Self {
        let config = SongwireConfig {
            mirrors: mirror_config(mirrors, Duration::from_secs(2)),
            search: search_config(oracle),
            ..SongwireConfig::default()
        };
        let state = AppState::from_config(&config).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(songwire_web::serve(listener, state));

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self { address, client }
    }

    async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(format!("http://{}{}", self.address, path_and_query))
            .send()
            .await
            .unwrap()
    }
}

async fn queen_oracle(expected_calls: u64) -> MockServer {
    let oracle = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"query": "Bohemian Rhapsody"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![song_row(
            "X1",
            "Bohemian Rhapsody",
            "Queen",
        )])))
        .expect(expected_calls)
        .mount(&oracle)
        .await;
    oracle
}

#[tokio::test]
async fn test_query_redirects_to_stream() {
    let oracle = queen_oracle(1).await;
    let mirror_a = MockServer::start().await;
    let mirror_b = MockServer::start().await;

    mount_mirror(&mirror_a, "X1", ResponseTemplate::new(503), 0..=1).await;
    mount_mirror(
        &mirror_b,
        "X1",
        ResponseTemplate::new(200).set_body_json(streams_body(&[
            ("WEBMA_OPUS", "https://cdn.example/opus"),
            ("M4A", "https://cdn.example/u"),
        ])),
        1,
    )
    .await;

    let harness = Harness::start(&oracle, &[&mirror_a, &mirror_b]).await;
    let response = harness.get("/stream?q=%22Bohemian%20Rhapsody%22").await;

    assert_eq!(response.status(), reqwest::StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[reqwest::header::LOCATION],
        "https://cdn.example/u"
    );
}

#[tokio::test]
async fn test_empty_query_touches_nothing() {
    let oracle = queen_oracle(0).await;
    let mirror = MockServer::start().await;
    mount_mirror(&mirror, "X1", ResponseTemplate::new(200), 0).await;

    let harness = Harness::start(&oracle, &[&mirror]).await;

    for path in ["/stream", "/stream?q=", "/stream?q=%22%20%22"] {
        let response = harness.get(path).await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>().await.unwrap(),
            json!({"detail": "Query empty"})
        );
    }
}

#[tokio::test]
async fn test_unknown_song_is_not_found() {
    let oracle = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![])))
        .expect(2)
        .mount(&oracle)
        .await;
    let mirror = MockServer::start().await;
    mount_mirror(&mirror, "X1", ResponseTemplate::new(200), 0).await;

    let harness = Harness::start(&oracle, &[&mirror]).await;
    let response = harness.get("/stream?q=zzzz%20no%20such%20song").await;

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "Song not found on YouTube Music"})
    );
}

#[tokio::test]
async fn test_all_mirrors_down() {
    let oracle = queen_oracle(1).await;
    let mirror_a = MockServer::start().await;
    let mirror_b = MockServer::start().await;
    mount_mirror(&mirror_a, "X1", ResponseTemplate::new(500), 1).await;
    mount_mirror(&mirror_b, "X1", ResponseTemplate::new(500), 1).await;

    let harness = Harness::start(&oracle, &[&mirror_a, &mirror_b]).await;
    let response = harness.get("/stream?q=Bohemian%20Rhapsody").await;

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "Stream unavailable"})
    );
}

#[tokio::test]
async fn test_health_and_status() {
    let oracle = queen_oracle(0).await;
    let mirror_a = MockServer::start().await;
    let mirror_b = MockServer::start().await;

    let harness = Harness::start(&oracle, &[&mirror_a, &mirror_b]).await;

    let health = harness.get("/health").await;
    assert_eq!(health.status(), reqwest::StatusCode::OK);
    assert_eq!(health.json::<Value>().await.unwrap(), json!({"status": "ok"}));

    let status: Value = harness.get("/").await.json().await.unwrap();
    assert_eq!(status["status"], "alive");
    assert_eq!(status["engine"], "Hybrid (YTM + Piped)");
    assert_eq!(status["mirrors"], 2);
    assert!(status["uptime_secs"].as_u64().is_some());
}
