//! api - caching GitHub REST client
//!
//! This module owns everything between a logical read ("give me this
//! repository") and the provider's wire format:
//!
//! - [`client::GitHubClient`] - authenticated requests, GET caching, typed
//!   fetch helpers
//! - [`cache`] - request signatures and the response cache
//! - [`normalize`] - best-effort body repair before JSON parsing
//! - [`errors::ApiError`] - the client's failure taxonomy
//!
//! The client is owned state, not a module-level global: construct one at
//! application startup and pass it by `Arc` to whatever needs it.

pub mod cache;
pub mod client;
pub mod errors;
pub mod normalize;

pub use cache::{RequestSignature, ResponseCache};
pub use client::GitHubClient;
pub use errors::ApiError;
pub use normalize::{normalize, DecodeError};
