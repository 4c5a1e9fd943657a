//! Hubcap - GitHub OAuth web flow and caching REST client
//!
//! Hubcap authenticates a user against GitHub via the OAuth2
//! authorization-code flow, then serves repository, branch, tag, and user
//! metadata through a caching API client so the consuming application never
//! re-issues identical reads or re-authenticates per call.
//!
//! # Architecture
//!
//! - [`auth`] - the authorization-code flow: redirect URL, code exchange,
//!   profile fetch, one terminal outcome per attempt
//! - [`api`] - the REST client: authenticated requests, response
//!   normalization, GET caching by request signature
//! - [`model`] - read-only entities decoded from API payloads
//! - [`config`] - application identity and endpoint configuration
//!
//! The web layer (routing, sessions, rendering) is the consumer's concern:
//! it hands the callback's `code`/`state` parameters to [`auth`], stores
//! the resulting token and profile in its session, and reads data through
//! a shared [`api::GitHubClient`].
//!
//! # Correctness Invariants
//!
//! 1. One authentication attempt produces exactly one terminal outcome
//! 2. The profile fetch never starts before the token exchange succeeds
//! 3. Only GET responses enter the response cache
//! 4. Tokens and client secrets never appear in logs or error output
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hubcap::api::GitHubClient;
//! use hubcap::auth::{AuthorizationState, WebFlowClient};
//! use hubcap::config::Config;
//!
//! let config = Config::load()?;
//! let flow = WebFlowClient::from_config(&config);
//! let state = AuthorizationState::from_config(&config);
//!
//! // Redirect the user, then complete the flow from the callback:
//! let (profile, token) = flow.authenticate(&state, &code, &returned_state).await?;
//!
//! // Read data through the shared client:
//! let api = Arc::new(GitHubClient::from_config(&config));
//! let repos = api.fetch_viewer_repositories(token.secret()).await?;
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod model;
