//! auth::web_flow
//!
//! OAuth2 authorization-code flow against GitHub's web endpoints.
//!
//! # Flow
//!
//! One authentication attempt moves through these states:
//!
//! | State            | Step                                                |
//! |------------------|-----------------------------------------------------|
//! | START            | caller builds an [`AuthorizationState`]             |
//! | AWAITING_CODE    | caller redirects the user to [`authorize_url`]      |
//! | EXCHANGING_TOKEN | [`exchange_code`] POSTs to the token endpoint       |
//! | FETCHING_PROFILE | [`fetch_user`] GETs the user-info endpoint          |
//! | SUCCEEDED/FAILED | [`authenticate`] returns `Ok`/`Err` exactly once    |
//!
//! The chain is sequential awaited calls: the profile fetch never starts
//! before the exchange has succeeded, and each `authenticate` call resolves
//! to exactly one terminal outcome. A failure of the profile fetch discards
//! the token already obtained; it is neither retried nor surfaced.
//!
//! Short-circuiting an already-authenticated caller (session present) is
//! the integrating layer's responsibility, before the flow starts.
//!
//! # State validation
//!
//! [`exchange_code`] requires the `state` value returned by the provider
//! redirect to equal the anti-forgery token issued for the attempt, and
//! rejects a mismatch before any network call. Integrators must pass the
//! value straight from the callback query string.
//!
//! # Example
//!
//! ```ignore
//! use hubcap::auth::{AuthorizationState, WebFlowClient};
//!
//! let flow = WebFlowClient::new();
//! let state = AuthorizationState::new("client-id", "https://app.example/callback")
//!     .with_client_secret("client-secret");
//!
//! // Step 1: send the user to the provider.
//! let url = flow.authorize_url(&state)?;
//!
//! // Step 2: the callback arrives with ?code=...&state=...
//! let (profile, token) = flow.authenticate(&state, &code, &returned_state).await?;
//! ```
//!
//! [`authorize_url`]: WebFlowClient::authorize_url
//! [`exchange_code`]: WebFlowClient::exchange_code
//! [`fetch_user`]: WebFlowClient::fetch_user
//! [`authenticate`]: WebFlowClient::authenticate

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::errors::AuthError;
use super::state::AuthorizationState;
use super::AccessToken;
use crate::api::cache::TOKEN_PARAM;
use crate::api::normalize::normalize;
use crate::model::UserProfile;

/// Default OAuth web endpoint base.
const DEFAULT_OAUTH_BASE: &str = "https://github.com";

/// Default API endpoint base (user-info endpoint).
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for flow requests.
const USER_AGENT_VALUE: &str = "hubcap";

/// Per-request timeout. The chain has no other bound, so an unresponsive
/// provider must not hold an authentication attempt open forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Form body for the token exchange.
#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    code: &'a str,
    redirect_uri: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    state: &'a str,
}

/// Client for the OAuth2 authorization-code flow.
///
/// Owns its HTTP transport; flow responses are never cached. The endpoint
/// bases are configurable for tests and GitHub Enterprise.
#[derive(Debug, Clone)]
pub struct WebFlowClient {
    /// HTTP transport with a per-request timeout.
    client: Client,

    /// Web endpoint base (authorize + token endpoints).
    oauth_base: String,

    /// API endpoint base (user-info endpoint).
    api_base: String,
}

impl Default for WebFlowClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WebFlowClient {
    /// Create a flow client against public GitHub.
    pub fn new() -> Self {
        Self::with_endpoints(DEFAULT_OAUTH_BASE, DEFAULT_API_BASE)
    }

    /// Create a flow client against custom endpoint bases.
    pub fn with_endpoints(oauth_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            oauth_base: oauth_base.into(),
            api_base: api_base.into(),
        }
    }

    /// Create a flow client from loaded configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::with_endpoints(
            config
                .github
                .oauth_base
                .as_deref()
                .unwrap_or(DEFAULT_OAUTH_BASE),
            config
                .github
                .api_base
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE),
        )
    }

    /// Get the token endpoint URL.
    fn token_url(&self) -> String {
        format!("{}/login/oauth/access_token", self.oauth_base)
    }

    /// Get the user-info endpoint URL.
    fn user_url(&self) -> String {
        format!("{}/user", self.api_base)
    }

    /// Build headers for flow requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    /// The URL to redirect the user to for authorization.
    ///
    /// Carries `client_id`, `redirect_uri`, and the attempt's anti-forgery
    /// `state` token. This is a browser navigation target, not a
    /// server-side call.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Endpoint`] if the configured base does not form
    /// a valid URL.
    pub fn authorize_url(&self, state: &AuthorizationState) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            &format!("{}/login/oauth/authorize", self.oauth_base),
            &[
                ("client_id", state.client_id()),
                ("redirect_uri", state.redirect_uri()),
                ("state", state.state_token()),
            ],
        )
        .map_err(|e| AuthError::Endpoint(e.to_string()))?;

        Ok(url.into())
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Fails fast, before any network call, when the state has no client
    /// secret or the returned `state` value does not match the issued
    /// anti-forgery token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingClientSecret`] / [`AuthError::StateMismatch`] -
    ///   configuration failures, zero network calls issued.
    /// - [`AuthError::Provider`] - the response carries an `error` field,
    ///   lacks `access_token`, or has a non-success status.
    /// - [`AuthError::Network`] / [`AuthError::Decode`] - transport or
    ///   body-decoding failure.
    pub async fn exchange_code(
        &self,
        state: &AuthorizationState,
        code: &str,
        returned_state: &str,
    ) -> Result<AccessToken, AuthError> {
        let Some(client_secret) = state.client_secret() else {
            return Err(AuthError::MissingClientSecret);
        };
        if returned_state != state.state_token() {
            return Err(AuthError::StateMismatch);
        }

        debug!(client_id = state.client_id(), "exchanging authorization code");

        let request = TokenExchangeRequest {
            code,
            redirect_uri: state.redirect_uri(),
            client_id: state.client_id(),
            client_secret,
            state: state.state_token(),
        };

        let response = self
            .client
            .post(self.token_url())
            .headers(self.headers())
            .form(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Network(e.without_url().to_string()))?;
        let value = normalize(&body)?;

        let reported_error = value.get("error").is_some();
        let token = value
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string);

        match token {
            Some(token) if status.is_success() && !reported_error => {
                debug!("authorization code exchanged");
                Ok(AccessToken::new(token))
            }
            _ => Err(provider_error(status, value)),
        }
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Provider`] - non-success status from the provider.
    /// - [`AuthError::Profile`] - the payload does not decode into a
    ///   [`UserProfile`].
    /// - [`AuthError::Network`] / [`AuthError::Decode`] - transport or
    ///   body-decoding failure.
    pub async fn fetch_user(&self, token: &AccessToken) -> Result<UserProfile, AuthError> {
        let response = self
            .client
            .get(self.user_url())
            .headers(self.headers())
            .query(&[(TOKEN_PARAM, token.secret())])
            .send()
            .await?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Network(e.without_url().to_string()))?;
        let value = normalize(&body)?;

        if !status.is_success() {
            return Err(provider_error(status, value));
        }

        serde_json::from_value(value).map_err(|e| AuthError::Profile(e.to_string()))
    }

    /// Run the full exchange-then-fetch chain.
    ///
    /// The profile fetch starts only after the token exchange has
    /// succeeded. Exactly one terminal outcome is produced per call; on a
    /// profile-fetch failure the token already obtained is dropped, not
    /// retried and not returned.
    pub async fn authenticate(
        &self,
        state: &AuthorizationState,
        code: &str,
        returned_state: &str,
    ) -> Result<(UserProfile, AccessToken), AuthError> {
        let token = self.exchange_code(state, code, returned_state).await?;
        let profile = self.fetch_user(&token).await?;

        debug!(login = %profile.login, "authentication succeeded");
        Ok((profile, token))
    }
}

fn provider_error(status: StatusCode, body: Value) -> AuthError {
    let error = body
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string);

    AuthError::Provider {
        status: status.as_u16(),
        body: Some(body),
        error,
    }
}
