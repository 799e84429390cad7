//! Mirror-pool resolution: random order, bounded attempts, first success wins

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;

use super::client::HttpMirrorTransport;
use super::registry::{MirrorEndpoint, MirrorRegistry};
use super::types::{MirrorMiss, MirrorTransport, StreamCandidate};
use crate::config::MirrorConfig;
use crate::identifier::CanonicalId;

/// Stream chosen by a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStream {
    /// Direct stream URL to hand to the client
    pub url: String,
    /// Format label of the chosen stream
    pub format: String,
    /// Mirror that produced the stream
    pub endpoint: MirrorEndpoint,
}

/// Result of one full pass over the mirror pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// A mirror returned a usable stream
    Resolved(ResolvedStream),
    /// Every mirror missed
    Exhausted {
        /// Number of mirrors tried, always the registry size
        attempts: usize,
    },
}

impl ResolutionOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Consumes the outcome, yielding the stream URL on success.
    pub fn into_url(self) -> Option<String> {
        match self {
            Self::Resolved(stream) => Some(stream.url),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Picks the stream to serve from one mirror's candidates.
///
/// The first candidate in `preferred` format wins; otherwise the first
/// candidate in response order. Returns `None` only for an empty slice.
pub fn select_candidate<'a>(
    candidates: &'a [StreamCandidate],
    preferred: &str,
) -> Option<&'a StreamCandidate> {
    candidates
        .iter()
        .find(|candidate| candidate.has_format(preferred))
        .or_else(|| candidates.first())
}

/// Resolves canonical identifiers to stream URLs across a mirror pool.
///
/// Each call shuffles the registry, then asks mirrors one at a time, giving
/// each at most `attempt_timeout`. The first mirror that offers any audio
/// stream ends the search. Mirror failures are logged and absorbed; the only
/// failure a caller sees is exhaustion of the whole pool.
#[derive(Debug, Clone)]
pub struct MirrorPool {
    registry: Arc<MirrorRegistry>,
    transport: Arc<dyn MirrorTransport>,
    attempt_timeout: Duration,
    preferred_format: String,
}

impl MirrorPool {
    /// Creates resolver from explicit parts.
    pub fn new(
        registry: MirrorRegistry,
        transport: Arc<dyn MirrorTransport>,
        attempt_timeout: Duration,
        preferred_format: impl Into<String>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            transport,
            attempt_timeout,
            preferred_format: preferred_format.into(),
        }
    }

    /// Creates resolver backed by the HTTP transport.
    ///
    /// # Errors
    /// - `SongwireError::Configuration` - Invalid mirror registry
    /// - `SongwireError::Http` - HTTP client construction failed
    pub fn from_config(config: &MirrorConfig) -> crate::Result<Self> {
        let registry = config.registry()?;
        let transport = HttpMirrorTransport::new(config)?;

        Ok(Self::new(
            registry,
            Arc::new(transport),
            config.attempt_timeout,
            config.preferred_format.clone(),
        ))
    }

    pub fn registry(&self) -> &MirrorRegistry {
        &self.registry
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn preferred_format(&self) -> &str {
        &self.preferred_format
    }

    /// Returns a fresh uniformly random permutation of the registry.
    pub fn attempt_order(&self) -> Vec<MirrorEndpoint> {
        let mut order = self.registry.endpoints().to_vec();
        order.shuffle(&mut rand::rng());
        order
    }

    /// Resolves `id` to a stream URL, trying each mirror at most once.
    pub async fn resolve(&self, id: &CanonicalId) -> ResolutionOutcome {
        let order = self.attempt_order();
        let mut attempts = 0;

        tracing::debug!("Resolving {} across {} mirrors", id, order.len());

        for endpoint in order {
            attempts += 1;

            match self.attempt(&endpoint, id).await {
                Ok(candidates) => {
                    if let Some(chosen) = select_candidate(&candidates, &self.preferred_format) {
                        tracing::info!(
                            "Mirror {} served {} ({} streams, picked {})",
                            endpoint,
                            id,
                            candidates.len(),
                            if chosen.format.is_empty() {
                                "unlabelled"
                            } else {
                                chosen.format.as_str()
                            }
                        );
                        return ResolutionOutcome::Resolved(ResolvedStream {
                            url: chosen.url.clone(),
                            format: chosen.format.clone(),
                            endpoint,
                        });
                    }
                    tracing::debug!("Mirror {} returned no candidates for {}", endpoint, id);
                }
                Err(miss) => {
                    tracing::debug!("Mirror {} missed {}: {}", endpoint, id, miss);
                }
            }
        }

        tracing::warn!("All {attempts} mirrors missed {id}");
        ResolutionOutcome::Exhausted { attempts }
    }

    /// Runs one transport call under the per-attempt deadline.
    async fn attempt(
        &self,
        endpoint: &MirrorEndpoint,
        id: &CanonicalId,
    ) -> Result<Vec<StreamCandidate>, MirrorMiss> {
        match tokio::time::timeout(self.attempt_timeout, self.transport.fetch_streams(endpoint, id))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(MirrorMiss::Timeout {
                timeout: self.attempt_timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use proptest::prelude::*;

    use super::*;

    /// What a scripted mirror does when asked for streams.
    #[derive(Debug, Clone)]
    enum Script {
        Miss(MirrorMiss),
        Serve(Vec<StreamCandidate>),
        Stall(Duration),
    }

    /// Transport double that replays per-mirror scripts and records calls.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        scripts: HashMap<String, Script>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn with(mut self, base_url: &str, script: Script) -> Self {
            self.scripts.insert(base_url.to_string(), script);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MirrorTransport for ScriptedTransport {
        async fn fetch_streams(
            &self,
            endpoint: &MirrorEndpoint,
            _id: &CanonicalId,
        ) -> Result<Vec<StreamCandidate>, MirrorMiss> {
            self.calls
                .lock()
                .unwrap()
                .push(endpoint.base_url().to_string());

            match self.scripts.get(endpoint.base_url()) {
                Some(Script::Serve(candidates)) => Ok(candidates.clone()),
                Some(Script::Miss(miss)) => Err(miss.clone()),
                Some(Script::Stall(delay)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(vec![StreamCandidate::new("m4a", "https://late.example")])
                }
                None => Err(MirrorMiss::Status { status: 404 }),
            }
        }
    }

    fn pool(urls: &[&str], transport: Arc<ScriptedTransport>) -> MirrorPool {
        MirrorPool::new(
            MirrorRegistry::new(urls.iter().copied()).unwrap(),
            transport,
            Duration::from_millis(100),
            "m4a",
        )
    }

    fn id() -> CanonicalId {
        CanonicalId::new("X1").unwrap()
    }

    #[test]
    fn test_select_prefers_format_regardless_of_order() {
        let candidates = vec![
            StreamCandidate::new("WEBMA_OPUS", "https://cdn.example/opus"),
            StreamCandidate::new("M4A", "https://cdn.example/m4a"),
        ];

        let chosen = select_candidate(&candidates, "m4a").unwrap();
        assert_eq!(chosen.url, "https://cdn.example/m4a");
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let candidates = vec![
            StreamCandidate::new("WEBMA_OPUS", "https://cdn.example/opus"),
            StreamCandidate::new("WEBMA", "https://cdn.example/webm"),
        ];

        let chosen = select_candidate(&candidates, "m4a").unwrap();
        assert_eq!(chosen.url, "https://cdn.example/opus");
        assert!(select_candidate(&[], "m4a").is_none());
    }

    proptest! {
        #[test]
        fn prop_preferred_format_always_selected(
            others in proptest::collection::vec("[a-z]{3,6}", 0..8),
            position in 0usize..8,
        ) {
            let mut candidates: Vec<StreamCandidate> = others
                .iter()
                .filter(|format| !format.eq_ignore_ascii_case("m4a"))
                .enumerate()
                .map(|(i, format)| StreamCandidate::new(format.clone(), format!("https://cdn.example/{i}")))
                .collect();
            let index = position.min(candidates.len());
            candidates.insert(index, StreamCandidate::new("M4A", "https://cdn.example/preferred"));

            let chosen = select_candidate(&candidates, "m4a").unwrap();
            prop_assert_eq!(chosen.url.as_str(), "https://cdn.example/preferred");
        }
    }

    #[tokio::test]
    async fn test_first_success_after_miss() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .with("https://a.example", Script::Miss(MirrorMiss::Status { status: 500 }))
                .with(
                    "https://b.example",
                    Script::Serve(vec![StreamCandidate::new("m4a", "https://cdn.example/U")]),
                ),
        );
        let pool = pool(&["https://a.example", "https://b.example"], transport.clone());

        let outcome = pool.resolve(&id()).await;

        match outcome {
            ResolutionOutcome::Resolved(stream) => {
                assert_eq!(stream.url, "https://cdn.example/U");
                assert_eq!(stream.endpoint.base_url(), "https://b.example");
            }
            other => panic!("expected resolution, got {other:?}"),
        }
        assert!(transport.calls().len() <= 2);
        assert_eq!(transport.calls().last().unwrap(), "https://b.example");
    }

    #[tokio::test]
    async fn test_exhaustion_tries_each_mirror_once() {
        let urls = ["https://a.example", "https://b.example", "https://c.example"];
        let transport = Arc::new(
            ScriptedTransport::default()
                .with("https://a.example", Script::Miss(MirrorMiss::Status { status: 500 }))
                .with(
                    "https://b.example",
                    Script::Miss(MirrorMiss::Malformed {
                        reason: "expected value".to_string(),
                    }),
                )
                .with("https://c.example", Script::Miss(MirrorMiss::Empty)),
        );
        let pool = pool(&urls, transport.clone());

        let outcome = pool.resolve(&id()).await;

        assert_eq!(outcome, ResolutionOutcome::Exhausted { attempts: 3 });
        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        let unique: HashSet<&String> = calls.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_a_miss() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .with("https://a.example", Script::Serve(Vec::new()))
                .with(
                    "https://b.example",
                    Script::Serve(vec![StreamCandidate::new("webm", "https://cdn.example/b")]),
                ),
        );
        let mixed = pool(&["https://a.example", "https://b.example"], transport);

        let outcome = mixed.resolve(&id()).await;
        assert_eq!(outcome.into_url().as_deref(), Some("https://cdn.example/b"));

        let only_empty = Arc::new(
            ScriptedTransport::default().with("https://a.example", Script::Serve(Vec::new())),
        );
        let lone = pool(&["https://a.example"], only_empty.clone());

        assert_eq!(
            lone.resolve(&id()).await,
            ResolutionOutcome::Exhausted { attempts: 1 }
        );
        assert_eq!(only_empty.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_short_circuit_on_first_success() {
        let urls = ["https://a.example", "https://b.example", "https://c.example"];
        let serve = Script::Serve(vec![StreamCandidate::new("m4a", "https://cdn.example/ok")]);
        let transport = Arc::new(
            ScriptedTransport::default()
                .with("https://a.example", serve.clone())
                .with("https://b.example", serve.clone())
                .with("https://c.example", serve),
        );
        let pool = pool(&urls, transport.clone());

        let outcome = pool.resolve(&id()).await;

        assert!(outcome.is_resolved());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_stalled_mirror_counts_as_miss() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .with("https://slow.example", Script::Stall(Duration::from_secs(5)))
                .with(
                    "https://fast.example",
                    Script::Serve(vec![StreamCandidate::new("webm", "https://cdn.example/fast")]),
                ),
        );
        let pool = pool(&["https://slow.example", "https://fast.example"], transport.clone());

        let started = std::time::Instant::now();
        let outcome = pool.resolve(&id()).await;

        assert_eq!(outcome.into_url().as_deref(), Some("https://cdn.example/fast"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_all_stalled_exhausts_within_budget() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .with("https://a.example", Script::Stall(Duration::from_secs(5)))
                .with("https://b.example", Script::Stall(Duration::from_secs(5))),
        );
        let pool = pool(&["https://a.example", "https://b.example"], transport);

        let started = std::time::Instant::now();
        let outcome = pool.resolve(&id()).await;

        assert_eq!(outcome, ResolutionOutcome::Exhausted { attempts: 2 });
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_attempt_order_varies_between_calls() {
        let urls = [
            "https://a.example",
            "https://b.example",
            "https://c.example",
            "https://d.example",
        ];
        let transport = Arc::new(ScriptedTransport::default());
        let pool = pool(&urls, transport.clone());

        let mut orders = HashSet::new();
        let mut first_tried = HashSet::new();
        for _ in 0..200 {
            let before = transport.calls().len();
            let outcome = pool.resolve(&id()).await;
            assert_eq!(outcome, ResolutionOutcome::Exhausted { attempts: 4 });

            let run: Vec<String> = transport.calls()[before..].to_vec();
            first_tried.insert(run[0].clone());
            orders.insert(run);
        }

        assert!(orders.len() > 1, "attempt order never changed");
        assert_eq!(first_tried.len(), 4, "some mirror was never tried first");
    }

    #[test]
    fn test_attempt_order_is_permutation() {
        let urls = ["https://a.example", "https://b.example", "https://c.example"];
        let pool = pool(&urls, Arc::new(ScriptedTransport::default()));

        let mut order: Vec<String> = pool
            .attempt_order()
            .into_iter()
            .map(|e| e.base_url().to_string())
            .collect();
        order.sort();

        assert_eq!(order, urls.to_vec());
        // Registry itself keeps configured order
        assert_eq!(pool.registry().endpoints()[0].base_url(), "https://a.example");
    }
}
