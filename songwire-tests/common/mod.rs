//! Shared HTTP doubles for Songwire tests

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use songwire_core::config::{MirrorConfig, SearchConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body of a Piped `/streams/{id}` response offering the given audio streams.
pub fn streams_body(streams: &[(&str, &str)]) -> Value {
    let audio: Vec<Value> = streams
        .iter()
        .map(|(format, url)| json!({"format": format, "url": url, "bitrate": 128000}))
        .collect();

    json!({
        "title": "Bohemian Rhapsody",
        "audioStreams": audio,
        "videoStreams": [],
    })
}

/// Mounts a mirror answering `/streams/{id}` with `template`, called `times` times.
pub async fn mount_mirror(
    server: &MockServer,
    id: &str,
    template: ResponseTemplate,
    times: impl Into<wiremock::Times>,
) {
    Mock::given(method("GET"))
        .and(path(format!("/streams/{id}")))
        .respond_with(template)
        .expect(times)
        .mount(server)
        .await;
}

/// One song row as YouTube Music renders it in search results.
pub fn song_row(video_id: &str, title: &str, artist: &str) -> Value {
    json!({
        "musicResponsiveListItemRenderer": {
            "flexColumns": [
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [{"text": title}]}}},
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [
                    {
                        "text": artist,
                        "navigationEndpoint": {"browseEndpoint": {
                            "browseId": "UCartist",
                            "browseEndpointContextSupportedConfigs": {
                                "browseEndpointContextMusicConfig": {"pageType": "MUSIC_PAGE_TYPE_ARTIST"}
                            }
                        }}
                    },
                    {"text": " • "},
                    {"text": "5:55"}
                ]}}}
            ],
            "playlistItemData": {"videoId": video_id}
        }
    })
}

/// Search response wrapping `rows` in a single result shelf.
pub fn search_body(rows: Vec<Value>) -> Value {
    json!({
        "contents": {"tabbedSearchResultsRenderer": {"tabs": [{"tabRenderer": {"content": {
            "sectionListRenderer": {"contents": [{"musicShelfRenderer": {"contents": rows}}]}
        }}}]}}
    })
}

pub fn mirror_config(servers: &[&MockServer], attempt_timeout: Duration) -> MirrorConfig {
    MirrorConfig {
        endpoints: servers.iter().map(|server| server.uri()).collect(),
        attempt_timeout,
        ..MirrorConfig::default()
    }
}

pub fn search_config(oracle: &MockServer) -> SearchConfig {
    SearchConfig {
        base_url: oracle.uri(),
        timeout: Duration::from_secs(5),
        ..SearchConfig::default()
    }
}
