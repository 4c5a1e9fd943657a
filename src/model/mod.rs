//! model - read-only views over decoded API payloads
//!
//! Entities project provider JSON onto explicit field sets:
//!
//! - [`repository::Repository`] - repository metadata plus on-demand
//!   branches/tags through the owning client
//! - [`repository::Branch`] / [`repository::Tag`] - list-endpoint elements
//! - [`user::UserProfile`] - the authenticated user
//! - [`timespan::TimeSpan`] - elapsed-time views for age/last-update display

pub mod repository;
pub mod timespan;
pub mod user;

pub use repository::{Branch, CommitRef, EntityError, Repository, Tag};
pub use timespan::{approximate, TimeParseError, TimeSpan};
pub use user::UserProfile;
