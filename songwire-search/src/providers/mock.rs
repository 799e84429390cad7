//! Mock provider implementation for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::SearchProvider;
use crate::errors::SearchError;
use crate::types::{SearchFilter, SearchHit};

/// Scripted search provider that counts calls.
///
/// Filtered and unfiltered searches are scripted separately so fallback
/// behavior can be observed. Unscripted queries return no results.
#[derive(Debug, Default)]
pub struct MockProvider {
    songs: HashMap<String, Vec<SearchHit>>,
    broad: HashMap<String, Vec<SearchHit>>,
    failing: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, Option<SearchFilter>)>>,
}

impl MockProvider {
    /// Creates a mock provider with no scripted results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock provider whose every search fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Scripts the songs-only results for `query`.
    pub fn with_songs(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.songs.insert(query.to_string(), hits);
        self
    }

    /// Scripts the unfiltered results for `query`.
    pub fn with_broad(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.broad.insert(query.to_string(), hits);
        self
    }

    /// Number of searches issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every query received, with the filter it carried.
    pub fn queries(&self) -> Vec<(String, Option<SearchFilter>)> {
        match self.queries.lock() {
            Ok(queries) => queries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    async fn search(
        &self,
        query: &str,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((query.to_string(), filter));
        }

        if self.failing {
            return Err(SearchError::NetworkError {
                reason: "mock oracle unavailable".to_string(),
            });
        }

        let scripted = match filter {
            Some(SearchFilter::Songs) => &self.songs,
            None => &self.broad,
        };

        Ok(scripted.get(query).cloned().unwrap_or_default())
    }
}
