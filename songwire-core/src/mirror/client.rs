//! HTTP mirror transport for Piped-compatible `/streams/{id}` endpoints

use async_trait::async_trait;
use serde::Deserialize;

use super::registry::MirrorEndpoint;
use super::types::{MirrorMiss, MirrorTransport, StreamCandidate};
use crate::config::MirrorConfig;
use crate::identifier::CanonicalId;

/// Response body of `GET /streams/{id}`; everything but audio is ignored.
#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(rename = "audioStreams", default)]
    audio_streams: Option<Vec<AudioStream>>,
}

#[derive(Debug, Deserialize)]
struct AudioStream {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// HTTP mirror transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpMirrorTransport {
    client: reqwest::Client,
}

impl HttpMirrorTransport {
    /// Creates transport using mirror configuration for timeout and user agent.
    ///
    /// The client timeout mirrors the per-attempt timeout so a stalled socket
    /// is torn down even if the resolver's own deadline is not polled.
    ///
    /// # Errors
    /// - `SongwireError::Http` - TLS backend or client construction failed
    pub fn new(config: &MirrorConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.attempt_timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an existing client, keeping its settings.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Parse audio stream candidates from a `/streams` body.
    ///
    /// # Errors
    /// - `MirrorMiss::Malformed` - Body is not the expected JSON shape, or a
    ///   stream URL is not an absolute http(s) URL
    /// - `MirrorMiss::Empty` - No audio stream with a URL was present
    pub(crate) fn parse_streams(body: &[u8]) -> Result<Vec<StreamCandidate>, MirrorMiss> {
        let parsed: StreamsResponse =
            serde_json::from_slice(body).map_err(|e| MirrorMiss::Malformed {
                reason: e.to_string(),
            })?;

        let mut candidates = Vec::new();
        for stream in parsed.audio_streams.unwrap_or_default() {
            // Entries without a URL are skipped rather than failing the mirror
            let Some(raw_url) = stream.url.filter(|url| !url.is_empty()) else {
                continue;
            };
            let url = Self::stream_url(&raw_url)?;
            candidates.push(StreamCandidate::new(stream.format.unwrap_or_default(), url));
        }

        if candidates.is_empty() {
            return Err(MirrorMiss::Empty);
        }

        Ok(candidates)
    }

    /// Canonical form of a stream URL, usable as a `Location` header.
    fn stream_url(raw: &str) -> Result<String, MirrorMiss> {
        let parsed = url::Url::parse(raw).map_err(|e| MirrorMiss::Malformed {
            reason: format!("invalid stream URL '{raw}': {e}"),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MirrorMiss::Malformed {
                reason: format!("stream URL '{raw}' is not http(s)"),
            });
        }

        Ok(parsed.into())
    }
}

#[async_trait]
impl MirrorTransport for HttpMirrorTransport {
    /// Requests audio streams for `id` from one mirror.
    ///
    /// # Errors
    /// - `MirrorMiss::Transport` - Network error or body read failure
    /// - `MirrorMiss::Status` - Any status other than 200
    /// - `MirrorMiss::Malformed` - Body is not valid stream JSON
    /// - `MirrorMiss::Empty` - No audio streams offered
    async fn fetch_streams(
        &self,
        endpoint: &MirrorEndpoint,
        id: &CanonicalId,
    ) -> Result<Vec<StreamCandidate>, MirrorMiss> {
        let url = endpoint.streams_url(id);
        tracing::debug!("Requesting streams: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MirrorMiss::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(MirrorMiss::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| MirrorMiss::Transport {
            reason: format!("reading body failed: {e}"),
        })?;

        Self::parse_streams(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_streams_keeps_response_order() {
        let body = br#"{
            "title": "Bohemian Rhapsody",
            "audioStreams": [
                {"format": "WEBMA_OPUS", "url": "https://cdn.example/opus", "bitrate": 160000},
                {"format": "M4A", "url": "https://cdn.example/m4a", "bitrate": 128000}
            ],
            "videoStreams": []
        }"#;

        let candidates = HttpMirrorTransport::parse_streams(body).unwrap();
        assert_eq!(
            candidates,
            vec![
                StreamCandidate::new("WEBMA_OPUS", "https://cdn.example/opus"),
                StreamCandidate::new("M4A", "https://cdn.example/m4a"),
            ]
        );
    }

    #[test]
    fn test_parse_streams_missing_or_empty_list() {
        assert_eq!(
            HttpMirrorTransport::parse_streams(br#"{"audioStreams": []}"#),
            Err(MirrorMiss::Empty)
        );
        assert_eq!(
            HttpMirrorTransport::parse_streams(br#"{"error": "rate limited"}"#),
            Err(MirrorMiss::Empty)
        );
        assert_eq!(
            HttpMirrorTransport::parse_streams(br#"{"audioStreams": null}"#),
            Err(MirrorMiss::Empty)
        );
    }

    #[test]
    fn test_parse_streams_drops_entries_without_url() {
        let body = br#"{"audioStreams": [{"format": "M4A"}, {"url": "https://cdn.example/x"}]}"#;
        let candidates = HttpMirrorTransport::parse_streams(body).unwrap();

        assert_eq!(candidates, vec![StreamCandidate::new("", "https://cdn.example/x")]);
    }

    #[test]
    fn test_parse_streams_rejects_unusable_url() {
        for body in [
            br#"{"audioStreams": [{"format": "M4A", "url": "/relative/path"}]}"#.as_slice(),
            br#"{"audioStreams": [{"format": "M4A", "url": "javascript:alert(1)"}]}"#.as_slice(),
            br#"{"audioStreams": [{"format": "M4A", "url": "https://cdn.example/ok"}, {"url": "not a url"}]}"#.as_slice(),
        ] {
            let result = HttpMirrorTransport::parse_streams(body);
            assert!(matches!(result, Err(MirrorMiss::Malformed { .. })), "{result:?}");
        }
    }

    #[test]
    fn test_parse_streams_canonicalizes_url() {
        let body = br#"{"audioStreams": [{"format": "M4A", "url": "https://CDN.example/a b?x=1"}]}"#;
        let candidates = HttpMirrorTransport::parse_streams(body).unwrap();

        assert_eq!(candidates[0].url, "https://cdn.example/a%20b?x=1");
    }

    #[test]
    fn test_parse_streams_malformed() {
        let result = HttpMirrorTransport::parse_streams(b"<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(MirrorMiss::Malformed { .. })));
    }
}
