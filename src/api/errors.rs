//! api::errors
//!
//! Error types for the REST API client.
//!
//! # Design
//!
//! Failures map to the channel the caller must handle them on:
//!
//! - [`ApiError::RequestDenied`] - the transport could not send the request
//!   at all. Fatal for that call; never retried internally.
//! - [`ApiError::Decode`] - a response arrived but its body is not usable
//!   after normalization. Surfaced, never swallowed.
//! - [`ApiError::Entity`] - a decoded body does not carry the fields a
//!   typed projection requires.
//!
//! A response whose status line or body cannot be read at the transport
//! level is NOT an error: the client returns "no data" and the caller
//! treats it as temporarily unavailable. See `api::client`.

use thiserror::Error;

use super::normalize::DecodeError;

/// Errors from API client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not send the request.
    #[error("request could not be sent: {0}")]
    RequestDenied(String),

    /// The response body failed normalization or JSON parsing.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A decoded body is missing fields required by an entity projection.
    #[error("unexpected payload for {path}: {message}")]
    Entity {
        /// Request path whose payload was rejected.
        path: String,
        /// Decoder diagnostic.
        message: String,
    },
}

impl ApiError {
    /// Check whether retrying the same call later could succeed.
    ///
    /// Send failures are frequently transient (connection churn, DNS);
    /// decode and projection failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::RequestDenied(_))
    }
}
