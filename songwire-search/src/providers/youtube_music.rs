//! YouTube Music search provider for production use.

use async_trait::async_trait;
use serde_json::{Value, json};
use songwire_core::config::SearchConfig;

use super::SearchProvider;
use crate::errors::SearchError;
use crate::types::{SearchFilter, SearchHit};

/// Protobuf-encoded `params` token selecting the "Songs" result shelf.
const SONGS_FILTER_PARAMS: &str = "EgWKAQIIAWoMEA4QChADEAQQCRAF";
const CLIENT_NAME: &str = "WEB_REMIX";
const CLIENT_VERSION: &str = "1.20241111.01.00";
const ARTIST_PAGE_TYPE: &str = "MUSIC_PAGE_TYPE_ARTIST";
const BROWSE_PAGE_TYPE_POINTER: &str = "/navigationEndpoint/browseEndpoint/browseEndpointContextSupportedConfigs/browseEndpointContextMusicConfig/pageType";

/// YouTube Music search provider.
///
/// Talks to the web client's internal search endpoint and walks the
/// renderer tree for result rows, keeping the oracle's ranking intact.
#[derive(Debug, Clone)]
pub struct YouTubeMusicProvider {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl YouTubeMusicProvider {
    /// Create provider with default configuration.
    ///
    /// # Errors
    /// - `SearchError::ProviderSetup` - HTTP client construction failed
    pub fn new() -> Result<Self, SearchError> {
        Self::with_config(&SearchConfig::default())
    }

    /// Create provider with custom configuration.
    ///
    /// # Errors
    /// - `SearchError::ProviderSetup` - HTTP client construction failed
    pub fn with_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(
                "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
            )
            .build()
            .map_err(|e| SearchError::ProviderSetup {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    /// Build the search request body for the web client API.
    fn request_body(&self, query: &str, filter: Option<SearchFilter>) -> Value {
        let mut body = json!({
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                    "hl": self.language,
                }
            },
            "query": query,
        });

        if let Some(SearchFilter::Songs) = filter {
            body["params"] = Value::String(SONGS_FILTER_PARAMS.to_string());
        }

        body
    }

    /// Extract ranked hits from a search response, in document order.
    pub(crate) fn parse_hits(response: &Value) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        Self::collect_hits(response, &mut hits);
        hits
    }

    fn collect_hits(value: &Value, hits: &mut Vec<SearchHit>) {
        match value {
            Value::Object(map) => {
                if let Some(item) = map.get("musicResponsiveListItemRenderer") {
                    if let Some(hit) = Self::parse_list_item(item) {
                        hits.push(hit);
                    }
                    return;
                }

                // Unfiltered searches lead with a "top result" card
                if let Some(card) = map.get("musicCardShelfRenderer") {
                    if let Some(hit) = Self::parse_top_card(card) {
                        hits.push(hit);
                    }
                    if let Some(contents) = card.get("contents") {
                        Self::collect_hits(contents, hits);
                    }
                    return;
                }

                for child in map.values() {
                    Self::collect_hits(child, hits);
                }
            }
            Value::Array(items) => {
                for item in items {
                    Self::collect_hits(item, hits);
                }
            }
            _ => {}
        }
    }

    /// Parse one result row; rows without a title are skipped.
    fn parse_list_item(item: &Value) -> Option<SearchHit> {
        let columns = item.get("flexColumns")?.as_array()?;
        let title = Self::column_runs(columns, 0)
            .first()?
            .get("text")?
            .as_str()?
            .to_string();

        let video_id = item
            .pointer("/playlistItemData/videoId")
            .or_else(|| {
                item.pointer("/overlay/musicItemThumbnailOverlayRenderer/content/musicPlayButtonRenderer/playNavigationEndpoint/watchEndpoint/videoId")
            })
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(SearchHit {
            video_id,
            title,
            artists: Self::parse_artists(Self::column_runs(columns, 1)),
        })
    }

    fn column_runs(columns: &[Value], index: usize) -> &[Value] {
        columns
            .get(index)
            .and_then(|c| c.pointer("/musicResponsiveListItemFlexColumnRenderer/text/runs"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn parse_top_card(card: &Value) -> Option<SearchHit> {
        let title_run = card.pointer("/title/runs/0")?;
        let title = title_run.get("text")?.as_str()?.to_string();
        let video_id = title_run
            .pointer("/navigationEndpoint/watchEndpoint/videoId")
            .and_then(Value::as_str)
            .map(str::to_string);

        let subtitle = card
            .pointer("/subtitle/runs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        Some(SearchHit {
            video_id,
            title,
            artists: Self::parse_artists(subtitle),
        })
    }

    /// Artist names from a subtitle column.
    ///
    /// Prefers runs linking to artist pages. Without links, falls back to the
    /// text before the first ` • ` separator, minus the result-type label.
    fn parse_artists(runs: &[Value]) -> Vec<String> {
        let texts = runs.iter().filter_map(|run| run.get("text").and_then(Value::as_str));

        let linked: Vec<String> = runs
            .iter()
            .filter(|run| {
                run.pointer(BROWSE_PAGE_TYPE_POINTER).and_then(Value::as_str)
                    == Some(ARTIST_PAGE_TYPE)
            })
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        if !linked.is_empty() {
            return linked;
        }

        texts
            .take_while(|text| text.trim() != "•")
            .map(str::trim)
            .filter(|text| {
                !text.is_empty()
                    && !matches!(*text, "&" | "," | "Song" | "Video" | "Single" | "EP" | "Album")
            })
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl SearchProvider for YouTubeMusicProvider {
    async fn search(
        &self,
        query: &str,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/youtubei/v1/search", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[("prettyPrint", "false")])
            .header("Origin", &self.base_url)
            .header("Referer", format!("{}/", self.base_url))
            .json(&self.request_body(query, filter))
            .send()
            .await
            .map_err(|e| SearchError::NetworkError {
                reason: format!("YouTube Music request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(SearchError::SearchFailed {
                query: query.to_string(),
                reason: format!("YouTube Music HTTP {}", response.status()),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError {
                reason: format!("YouTube Music JSON parsing failed: {e}"),
            })?;

        Ok(Self::parse_hits(&body))
    }
}
