/*!
 * Slang enrichment through Urban Dictionary.
 *
 * The analysis model returns plain slang terms; this module turns each term
 * into definition cards. Lookups are cached per term for a fixed time to live.
 * Expired entries are evicted when they are read.
 */

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;

/// Default search endpoint of the unofficial Urban Dictionary API
pub const DEFAULT_ENDPOINT: &str = "https://unofficialurbandictionaryapi.com/api/search";

const NO_DEFINITION: &str = "No definition";
const NO_EXAMPLE: &str = "No example";

/// One dictionary definition for a slang term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlangCard {
    /// The term that was looked up
    pub term: String,
    pub definition: String,
    pub example: String,
    /// Link to the term's dictionary page
    pub permalink: String,
}

/// Capability that resolves a slang term into definition cards
#[async_trait]
pub trait SlangLookup: Send + Sync + Debug {
    /// Definitions for `term`; an empty list when the dictionary has none
    async fn lookup(&self, term: &str) -> Result<Vec<SlangCard>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    #[serde(default)]
    meaning: Option<String>,
    #[serde(default)]
    example: Option<String>,
}

/// Dictionary page URL for `term`
pub fn permalink_for(term: &str) -> String {
    match Url::parse_with_params("https://urbandictionary.com/define.php", &[("term", term)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("https://urbandictionary.com/define.php?term={}", term),
    }
}

/// Map a search response body into at most `limit` cards
pub fn cards_from_response(term: &str, body: &str, limit: usize) -> Result<Vec<SlangCard>, ProviderError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("Invalid Urban Dictionary response: {}", e)))?;

    let permalink = permalink_for(term);
    let non_empty = |value: Option<String>, fallback: &str| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    };

    Ok(response.data
        .into_iter()
        .take(limit)
        .map(|entry| SlangCard {
            term: term.to_string(),
            definition: non_empty(entry.meaning, NO_DEFINITION),
            example: non_empty(entry.example, NO_EXAMPLE),
            permalink: permalink.clone(),
        })
        .collect())
}

/// Per-term cache with a fixed time to live
#[derive(Debug, Clone)]
pub struct SlangCache {
    entries: Arc<RwLock<HashMap<String, (Instant, Vec<SlangCard>)>>>,
    ttl: Duration,
}

impl SlangCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Cached cards for `term`, evicting the entry if it has expired
    pub fn get(&self, term: &str) -> Option<Vec<SlangCard>> {
        {
            let entries = self.entries.read();
            match entries.get(term) {
                Some((stored_at, cards)) if stored_at.elapsed() < self.ttl => return Some(cards.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.entries.write().remove(term);
        debug!("Slang cache entry for '{}' expired", term);
        None
    }

    pub fn insert(&self, term: &str, cards: Vec<SlangCard>) {
        self.entries.write().insert(term.to_string(), (Instant::now(), cards));
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// Urban Dictionary client with a TTL cache
#[derive(Debug, Clone)]
pub struct UrbanDictionary {
    client: Client,
    endpoint: String,
    limit: usize,
    cache: SlangCache,
}

impl UrbanDictionary {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, limit: usize, cache_ttl: Duration, timeout: Duration) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint },
            limit,
            cache: SlangCache::new(cache_ttl),
        }
    }

    /// The lookup cache
    pub fn cache(&self) -> &SlangCache {
        &self.cache
    }

    fn search_url(&self, term: &str) -> Result<Url, ProviderError> {
        let limit = self.limit.to_string();
        Url::parse_with_params(&self.endpoint, &[("term", term), ("limit", limit.as_str())])
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid slang endpoint '{}': {}", self.endpoint, e)))
    }
}

#[async_trait]
impl SlangLookup for UrbanDictionary {
    async fn lookup(&self, term: &str) -> Result<Vec<SlangCard>, ProviderError> {
        if let Some(cards) = self.cache.get(term) {
            debug!("Slang cache hit for '{}'", term);
            return Ok(cards);
        }

        let url = self.search_url(term)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Urban Dictionary error for '{}': {}", term, status);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("Urban Dictionary lookup failed for '{}'", term),
            });
        }

        let body = response.text().await?;
        let cards = cards_from_response(term, &body, self.limit)?;
        self.cache.insert(term, cards.clone());
        Ok(cards)
    }
}
