//! api::cache
//!
//! Response cache for idempotent API reads.
//!
//! # Design
//!
//! The cache is keyed by [`RequestSignature`]: method, path, and the sorted
//! query pairs of the fully-resolved request. The `access_token` credential
//! never participates in the key, so the same read issued with different
//! tokens shares one entry.
//!
//! Only GET responses are stored (the client enforces this at the write
//! site). By default entries never expire: a cache holds at most one
//! network round-trip per distinct signature for its lifetime, and callers
//! that cannot tolerate stale reads opt into a TTL instead.
//!
//! Lock failures are treated as cache misses. A poisoned cache must not
//! block API traffic.
//!
//! # Example
//!
//! ```
//! use hubcap::api::cache::{RequestSignature, ResponseCache};
//! use reqwest::Method;
//! use serde_json::json;
//!
//! let cache = ResponseCache::new();
//! let sig = RequestSignature::new(Method::GET, "/user/repos", &[]);
//!
//! assert!(cache.get(&sig).is_none());
//! cache.put(sig.clone(), json!([{"name": "widget"}]));
//! assert!(cache.get(&sig).is_some());
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::Value;

/// Query parameter name carrying the access token credential.
pub(crate) const TOKEN_PARAM: &str = "access_token";

/// Identity of a fully-resolved API request.
///
/// Two requests with the same method, path, and query pairs (in any order)
/// produce equal signatures. The token credential is stripped during
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestSignature {
    /// HTTP method.
    method: Method,

    /// Request path, e.g. `/repos/octocat/widget/branches`.
    path: String,

    /// Sorted query pairs, credential excluded.
    query: Vec<(String, String)>,
}

impl RequestSignature {
    /// Build a signature from a method, path, and query pairs.
    ///
    /// Query pairs are sorted so parameter order does not split the cache;
    /// any `access_token` pair is dropped.
    pub fn new(method: Method, path: &str, query: &[(String, String)]) -> Self {
        let mut query: Vec<(String, String)> = query
            .iter()
            .filter(|(name, _)| name != TOKEN_PARAM)
            .cloned()
            .collect();
        query.sort();

        Self {
            method,
            path: path.to_string(),
            query,
        }
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A cached decoded response.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The decoded response body.
    value: Value,

    /// When this entry was stored, for TTL enforcement.
    cached_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(value: Value) -> Self {
        Self {
            value,
            cached_at: Utc::now(),
        }
    }

    /// Check whether this entry has outlived the cache's TTL.
    ///
    /// A cache without a TTL never expires entries.
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => Utc::now() - self.cached_at > ttl,
            None => false,
        }
    }
}

/// In-memory cache of decoded GET responses.
///
/// Shared across concurrent callers through the owning client; reads and
/// writes are serialized by an internal mutex. There is no single-flight
/// collapsing: two concurrent misses for the same signature both reach the
/// network and the last writer wins.
#[derive(Debug, Default)]
pub struct ResponseCache {
    /// Map of request signature to stored response.
    entries: Mutex<HashMap<RequestSignature, CacheEntry>>,

    /// Optional entry lifetime. `None` means entries never expire.
    ttl: Option<Duration>,
}

impl ResponseCache {
    /// Create a cache whose entries never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache whose entries expire after `ttl`.
    pub fn with_ttl(ttl: std::time::Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::from_std(ttl).ok(),
        }
    }

    /// Look up a stored response.
    ///
    /// Returns `None` for absent entries, expired entries, and lock
    /// failures.
    pub fn get(&self, signature: &RequestSignature) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(signature)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Store a decoded response.
    ///
    /// Replaces any existing entry for the signature.
    pub fn put(&self, signature: RequestSignature, value: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(signature, CacheEntry::new(value));
        }
    }

    /// Number of stored entries, including expired ones not yet replaced.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
