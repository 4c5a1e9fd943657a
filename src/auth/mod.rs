//! auth - OAuth2 authorization-code authentication
//!
//! This module implements the web-application authorization-code flow:
//! redirect the user to the provider, exchange the returned code for an
//! access token, then fetch the authenticated user's profile.
//!
//! # Components
//!
//! - [`AuthorizationState`] - immutable per-attempt state (client identity,
//!   redirect URI, anti-forgery token)
//! - [`WebFlowClient`] - the three-step flow itself
//! - [`AccessToken`] - the obtained credential, owned by the caller's
//!   session once the flow completes
//! - [`AuthError`] - the flow's failure taxonomy
//!
//! # Security
//!
//! Tokens and client secrets never appear in logs, `Debug` output, or error
//! messages. [`AccessToken`] and [`AuthorizationState`] implement custom
//! `Debug` to redact their values, and the flow never persists a token; the
//! caller decides where it lives.

mod errors;
mod state;
mod web_flow;

pub use errors::AuthError;
pub use state::AuthorizationState;
pub use web_flow::WebFlowClient;

/// An OAuth access token obtained from the provider.
///
/// Produced once per successful exchange. The flow never stores it; the
/// caller owns it afterwards. `Debug` redacts the value, and there is no
/// `Display`: reaching the secret takes an explicit [`secret`] call.
///
/// [`secret`]: AccessToken::secret
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value, for use as a request credential.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_its_value() {
        let token = AccessToken::new("tok1");
        assert_eq!(token.secret(), "tok1");
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("very-secret-token");
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("very-secret-token"));
        assert!(rendered.contains("redacted"));
    }
}
