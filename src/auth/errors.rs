//! auth::errors
//!
//! Error types for the authorization-code flow.
//!
//! # Design
//!
//! Configuration failures ([`AuthError::MissingClientSecret`],
//! [`AuthError::StateMismatch`]) are checked before any network call and
//! never reach the provider. Provider-reported failures carry the status
//! code plus whatever diagnostic body/error text was available, so the
//! integrating layer can display them; they are never routed to success.
//!
//! Error messages never contain token or secret values.

use serde_json::Value;
use thiserror::Error;

use crate::api::DecodeError;

/// Errors from authorization-flow operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token exchange was started without a client secret.
    #[error("client secret is not configured; token exchange cannot start")]
    MissingClientSecret,

    /// The returned `state` value does not match the issued anti-forgery
    /// token.
    #[error("returned state does not match the issued anti-forgery token")]
    StateMismatch,

    /// An endpoint base URL could not be parsed.
    #[error("invalid endpoint: {0}")]
    Endpoint(String),

    /// The provider reported a failure or returned an unusable exchange
    /// response.
    #[error("provider error: HTTP {status}")]
    Provider {
        /// HTTP status of the failing response.
        status: u16,
        /// Decoded diagnostic body, when one was available.
        body: Option<Value>,
        /// Provider `error` field, when present.
        error: Option<String>,
    },

    /// Network failure talking to the provider.
    #[error("network error: {0}")]
    Network(String),

    /// A response body failed normalization.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The user-info payload does not decode into a profile.
    #[error("malformed user profile: {0}")]
    Profile(String),
}

impl AuthError {
    /// Check whether this failure happened before any network call.
    ///
    /// Configuration errors are fixed by the integrator, not by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AuthError::MissingClientSecret | AuthError::StateMismatch | AuthError::Endpoint(_)
        )
    }

    /// Check whether the provider itself rejected the attempt.
    pub fn is_provider(&self) -> bool {
        matches!(self, AuthError::Provider { .. })
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        // without_url: reqwest error text may embed a URL carrying the
        // token credential.
        AuthError::Network(err.without_url().to_string())
    }
}
