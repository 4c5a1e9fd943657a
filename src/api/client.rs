//! api::client
//!
//! Caching REST client for the GitHub API.
//!
//! # Design
//!
//! [`GitHubClient`] owns its HTTP transport and its response cache; there is
//! no process-global state. Consumers share one client by reference
//! (`Arc<GitHubClient>`), and entities constructed by the typed fetch
//! helpers hold that handle to resolve sub-resources on demand.
//!
//! GET responses are cached by request signature (method + path + sorted
//! query, credential excluded): for the lifetime of the cache, at most one
//! network round-trip is performed per distinct GET target. Non-GET
//! responses are never cached.
//!
//! # Failure mapping
//!
//! - The transport cannot send the request at all:
//!   [`ApiError::RequestDenied`].
//! - A response arrives but cannot be read at the transport level (aborted
//!   or malformed exchange): `Ok(None)`. Callers treat this as
//!   "temporarily unavailable", not as "resource absent".
//! - The body fails normalization: [`ApiError::Decode`].
//!
//! The client never retries internally. Response status is not interpreted
//! here: a provider error body decodes like any other body, and the typed
//! projection layer rejects it when required fields are missing.
//!
//! # Concurrency
//!
//! The cache is mutex-guarded and the transport is a pooled
//! [`reqwest::Client`], so overlapping calls never share an in-flight
//! connection. Concurrent misses for the same GET target are not collapsed:
//! both reach the network and the last writer wins the cache slot.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hubcap::api::GitHubClient;
//!
//! let client = Arc::new(GitHubClient::new());
//! let repo = client.fetch_repository("octocat", "hello-world", None).await?;
//! ```

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use super::cache::{RequestSignature, ResponseCache, TOKEN_PARAM};
use super::errors::ApiError;
use super::normalize::normalize;
use crate::config::Config;
use crate::model::{Branch, Repository, Tag};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "hubcap";

/// Caching client for the GitHub REST API.
#[derive(Debug)]
pub struct GitHubClient {
    /// HTTP transport. Pooled; safe to share across concurrent callers.
    client: Client,

    /// API base URL (overridable for tests and GitHub Enterprise).
    api_base: String,

    /// Decoded GET responses keyed by request signature.
    cache: ResponseCache,
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    ///
    /// Cache entries never expire; see [`with_cache_ttl`] when consumers
    /// cannot tolerate stale reads.
    ///
    /// [`with_cache_ttl`]: GitHubClient::with_cache_ttl
    pub fn new() -> Self {
        Self::build(DEFAULT_API_BASE.to_string(), ResponseCache::new())
    }

    /// Create a client against a custom API base URL.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self::build(api_base.into(), ResponseCache::new())
    }

    /// Create a client whose cache entries expire after `ttl`.
    pub fn with_cache_ttl(ttl: std::time::Duration) -> Self {
        Self::build(DEFAULT_API_BASE.to_string(), ResponseCache::with_ttl(ttl))
    }

    /// Create a client from loaded configuration.
    ///
    /// Uses the configured API base override when present.
    pub fn from_config(config: &Config) -> Self {
        match config.github.api_base.as_deref() {
            Some(base) => Self::with_api_base(base),
            None => Self::new(),
        }
    }

    fn build(api_base: String, cache: ResponseCache) -> Self {
        Self {
            client: Client::new(),
            api_base,
            cache,
        }
    }

    /// The API base URL this client targets.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// The response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Build common headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    /// Build the fully-qualified URL for a path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Issue an API request and decode the response body.
    ///
    /// The token, when present, is appended as the `access_token` query
    /// credential. GET requests consult the cache first and populate it on
    /// success.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` - decoded response body.
    /// - `Ok(None)` - a response arrived but could not be read at the
    ///   transport level. Temporarily unavailable; retry later.
    ///
    /// # Errors
    ///
    /// - [`ApiError::RequestDenied`] if the request could not be sent.
    /// - [`ApiError::Decode`] if the body fails normalization.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: &[(String, String)],
    ) -> Result<Option<Value>, ApiError> {
        let signature = RequestSignature::new(method.clone(), path, query);

        if method == Method::GET {
            if let Some(value) = self.cache.get(&signature) {
                debug!(path, "serving GET from cache");
                return Ok(Some(value));
            }
        }

        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .headers(self.headers())
            .query(query);
        if let Some(token) = token {
            request = request.query(&[(TOKEN_PARAM, token)]);
        }

        debug!(%method, path, "dispatching API request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_builder() || e.is_timeout() => {
                // without_url: reqwest error text may embed the full URL,
                // which carries the token credential.
                return Err(ApiError::RequestDenied(e.without_url().to_string()));
            }
            Err(e) => {
                warn!(path, error = %e.without_url(), "unreadable response, no data");
                return Ok(None);
            }
        };

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!(path, error = %e.without_url(), "response body aborted, no data");
                return Ok(None);
            }
        };

        let value = normalize(&body)?;

        if method == Method::GET {
            self.cache.put(signature, value.clone());
        }

        Ok(Some(value))
    }

    /// Issue a GET request. See [`request`] for the full contract.
    ///
    /// [`request`]: GitHubClient::request
    pub async fn get(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(String, String)],
    ) -> Result<Option<Value>, ApiError> {
        self.request(Method::GET, path, token, query).await
    }

    /// Fetch a single repository.
    pub async fn fetch_repository(
        self: &Arc<Self>,
        owner: &str,
        name: &str,
        token: Option<&str>,
    ) -> Result<Option<Repository>, ApiError> {
        let path = format!("/repos/{}/{}", owner, name);
        let Some(value) = self.get(&path, token, &[]).await? else {
            return Ok(None);
        };

        let repository = Repository::from_value(value, Arc::clone(self))
            .map_err(|e| entity_error(&path, e))?;
        Ok(Some(repository))
    }

    /// Fetch the public repositories of a user or organization.
    pub async fn fetch_user_repositories(
        self: &Arc<Self>,
        owner: &str,
        token: Option<&str>,
    ) -> Result<Option<Vec<Repository>>, ApiError> {
        let path = format!("/users/{}/repos", owner);
        self.fetch_repository_list(&path, token).await
    }

    /// Fetch the repositories of the authenticated user.
    ///
    /// Requires a token; the endpoint is scoped to the token's owner.
    pub async fn fetch_viewer_repositories(
        self: &Arc<Self>,
        token: &str,
    ) -> Result<Option<Vec<Repository>>, ApiError> {
        self.fetch_repository_list("/user/repos", Some(token)).await
    }

    async fn fetch_repository_list(
        self: &Arc<Self>,
        path: &str,
        token: Option<&str>,
    ) -> Result<Option<Vec<Repository>>, ApiError> {
        let Some(value) = self.get(path, token, &[]).await? else {
            return Ok(None);
        };

        let repositories =
            Repository::many_from_value(value, self).map_err(|e| entity_error(path, e))?;
        Ok(Some(repositories))
    }

    /// Fetch the branches of a repository.
    pub async fn fetch_branches(
        &self,
        owner: &str,
        name: &str,
        token: Option<&str>,
    ) -> Result<Option<Vec<Branch>>, ApiError> {
        let path = format!("/repos/{}/{}/branches", owner, name);
        let Some(value) = self.get(&path, token, &[]).await? else {
            return Ok(None);
        };

        let branches = serde_json::from_value(value).map_err(|e| entity_error(&path, e))?;
        Ok(Some(branches))
    }

    /// Fetch the tags of a repository.
    pub async fn fetch_tags(
        &self,
        owner: &str,
        name: &str,
        token: Option<&str>,
    ) -> Result<Option<Vec<Tag>>, ApiError> {
        let path = format!("/repos/{}/{}/tags", owner, name);
        let Some(value) = self.get(&path, token, &[]).await? else {
            return Ok(None);
        };

        let tags = serde_json::from_value(value).map_err(|e| entity_error(&path, e))?;
        Ok(Some(tags))
    }
}

fn entity_error(path: &str, source: impl std::fmt::Display) -> ApiError {
    ApiError::Entity {
        path: path.to_string(),
        message: source.to_string(),
    }
}
