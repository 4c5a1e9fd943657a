//! auth::state
//!
//! Per-attempt authorization state.
//!
//! # Design
//!
//! One [`AuthorizationState`] is created per authentication attempt and is
//! immutable once constructed. It carries the OAuth application identity
//! (client id, optional client secret, redirect URI) and the opaque
//! anti-forgery `state` token round-tripped through the provider redirect.
//!
//! The client secret is only needed for the token exchange; redirect-only
//! callers may omit it. The secret never appears in `Debug` output.

use uuid::Uuid;

/// State for a single authorization attempt.
#[derive(Clone)]
pub struct AuthorizationState {
    /// OAuth application client id.
    client_id: String,

    /// OAuth application client secret; required for the token exchange.
    client_secret: Option<String>,

    /// Redirect URI registered with the provider.
    redirect_uri: String,

    /// Opaque anti-forgery token round-tripped through the redirect.
    state_token: String,
}

impl AuthorizationState {
    /// Create state for a new attempt with a freshly generated anti-forgery
    /// token.
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            state_token: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Create state from loaded configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(&config.github.client_id, &config.github.redirect_uri)
            .with_client_secret(&config.github.client_secret)
    }

    /// Attach the client secret needed for the token exchange.
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Replace the generated anti-forgery token with a caller-supplied one.
    pub fn with_state_token(mut self, state_token: impl Into<String>) -> Self {
        self.state_token = state_token.into();
        self
    }

    /// OAuth application client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Whether a client secret is attached.
    pub fn has_client_secret(&self) -> bool {
        self.client_secret.is_some()
    }

    pub(crate) fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Redirect URI registered with the provider.
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// The anti-forgery token issued for this attempt.
    pub fn state_token(&self) -> &str {
        &self.state_token
    }
}

// Custom Debug: the client secret must not leak through logs.
impl std::fmt::Debug for AuthorizationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationState")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("redirect_uri", &self.redirect_uri)
            .field("state_token", &self.state_token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_distinct_state_tokens() {
        let a = AuthorizationState::new("abc", "http://localhost/callback");
        let b = AuthorizationState::new("abc", "http://localhost/callback");

        assert!(!a.state_token().is_empty());
        assert_ne!(a.state_token(), b.state_token());
    }

    #[test]
    fn secret_is_optional_until_attached() {
        let state = AuthorizationState::new("abc", "http://localhost/callback");
        assert!(!state.has_client_secret());

        let state = state.with_client_secret("xyz");
        assert!(state.has_client_secret());
        assert_eq!(state.client_secret(), Some("xyz"));
    }

    #[test]
    fn state_token_can_be_supplied() {
        let state = AuthorizationState::new("abc", "http://localhost/callback")
            .with_state_token("fixed-token");
        assert_eq!(state.state_token(), "fixed-token");
    }

    #[test]
    fn debug_redacts_the_secret() {
        let state = AuthorizationState::new("abc", "http://localhost/callback")
            .with_client_secret("very-secret-value");

        let rendered = format!("{:?}", state);
        assert!(!rendered.contains("very-secret-value"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("abc"));
    }
}
