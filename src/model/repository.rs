//! model::repository
//!
//! Read-only repository, branch, and tag entities.
//!
//! # Design
//!
//! Entities are explicit projections of provider JSON: required fields fail
//! construction when absent, optional fields are `Option`. Nothing is
//! silently omitted or invented.
//!
//! A [`Repository`] keeps a handle to the client it was fetched through and
//! resolves `branches()`/`tags()` on demand by issuing a fresh GET per call.
//! The entity itself holds no sub-resource state; the client's response
//! cache decides whether a call reaches the network. These accessors block
//! on network I/O and are not pre-fetched at construction.
//!
//! Timestamps (`created_at`/`updated_at`) are validated at construction;
//! the derived age and last-update views defer and memoize their readable
//! form (see `model::timespan`).

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::timespan::{TimeParseError, TimeSpan};
use crate::api::{ApiError, GitHubClient};

/// Errors from entity construction.
#[derive(Debug, Error)]
pub enum EntityError {
    /// The payload is missing required fields or has the wrong shape.
    #[error("payload rejected: {0}")]
    Payload(#[from] serde_json::Error),

    /// A timestamp field does not match the provider wire pattern.
    #[error(transparent)]
    Timestamp(#[from] TimeParseError),
}

/// Raw repository fields accepted from the provider.
#[derive(Debug, Clone, Deserialize)]
struct RepositoryData {
    id: u64,
    name: String,
    owner: OwnerData,
    clone_url: String,
    created_at: String,
    updated_at: String,
    private: bool,
    fork: bool,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OwnerData {
    login: String,
}

/// A repository as seen through the API client it was fetched with.
pub struct Repository {
    data: RepositoryData,
    age: TimeSpan,
    last_update: TimeSpan,
    client: Arc<GitHubClient>,
}

impl Repository {
    /// Build a repository from a decoded payload.
    ///
    /// # Errors
    ///
    /// - [`EntityError::Payload`] when a required field is absent or
    ///   mistyped.
    /// - [`EntityError::Timestamp`] when `created_at`/`updated_at` do not
    ///   parse.
    pub fn from_value(value: Value, client: Arc<GitHubClient>) -> Result<Self, EntityError> {
        let data: RepositoryData = serde_json::from_value(value)?;
        let age = TimeSpan::parse(&data.created_at)?;
        let last_update = TimeSpan::parse(&data.updated_at)?;

        Ok(Self {
            data,
            age,
            last_update,
            client,
        })
    }

    /// Build a list of repositories from a decoded array payload.
    ///
    /// Fails on the first rejected element; a partially-decoded list is
    /// never returned.
    pub fn many_from_value(
        value: Value,
        client: &Arc<GitHubClient>,
    ) -> Result<Vec<Self>, EntityError> {
        let items: Vec<Value> = serde_json::from_value(value)?;
        items
            .into_iter()
            .map(|item| Self::from_value(item, Arc::clone(client)))
            .collect()
    }

    /// Provider id.
    pub fn id(&self) -> u64 {
        self.data.id
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Owner login.
    pub fn owner_login(&self) -> &str {
        &self.data.owner.login
    }

    /// `owner/name` form.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.data.owner.login, self.data.name)
    }

    /// HTTPS clone URL.
    pub fn clone_url(&self) -> &str {
        &self.data.clone_url
    }

    /// Primary language, when the provider has classified one.
    pub fn language(&self) -> Option<&str> {
        self.data.language.as_deref()
    }

    /// Repository description.
    pub fn description(&self) -> Option<&str> {
        self.data.description.as_deref()
    }

    /// Whether the repository is private.
    pub fn is_private(&self) -> bool {
        self.data.private
    }

    /// Whether the repository is a fork.
    pub fn is_fork(&self) -> bool {
        self.data.fork
    }

    /// A repository is releasable when it is neither a fork nor private.
    pub fn releasable(&self) -> bool {
        !self.data.fork && !self.data.private
    }

    /// Time since creation.
    pub fn age(&self) -> &TimeSpan {
        &self.age
    }

    /// Time since the last update.
    pub fn last_update(&self) -> &TimeSpan {
        &self.last_update
    }

    /// Fetch the repository's branches through the owning client.
    ///
    /// Issues a GET per call; the client's cache may serve it without a
    /// network round-trip. `Ok(None)` means no usable response arrived;
    /// retry later.
    pub async fn branches(&self) -> Result<Option<Vec<Branch>>, ApiError> {
        self.client
            .fetch_branches(self.owner_login(), self.name(), None)
            .await
    }

    /// Fetch the repository's tags through the owning client.
    ///
    /// Same contract as [`branches`].
    ///
    /// [`branches`]: Repository::branches
    pub async fn tags(&self) -> Result<Option<Vec<Tag>>, ApiError> {
        self.client
            .fetch_tags(self.owner_login(), self.name(), None)
            .await
    }
}

// Custom Debug: the owning client is infrastructure, not entity state.
impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("id", &self.data.id)
            .field("full_name", &self.full_name())
            .field("private", &self.data.private)
            .field("fork", &self.data.fork)
            .finish()
    }
}

/// A commit reference inside a branch or tag payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitRef {
    /// Commit SHA.
    pub sha: String,
}

/// A repository branch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,

    /// Tip commit.
    pub commit: CommitRef,
}

/// A repository tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,

    /// Tagged commit, when the provider includes it.
    #[serde(default)]
    pub commit: Option<CommitRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client() -> Arc<GitHubClient> {
        Arc::new(GitHubClient::with_api_base("http://127.0.0.1:1"))
    }

    fn repo_payload() -> Value {
        json!({
            "id": 1296269,
            "name": "widget",
            "owner": {"login": "octocat"},
            "clone_url": "https://github.com/octocat/widget.git",
            "created_at": "2020-01-26T19:01:12Z",
            "updated_at": "2024-01-26T19:14:43Z",
            "private": false,
            "fork": false,
            "language": "Rust",
            "description": "A widget"
        })
    }

    #[test]
    fn builds_from_full_payload() {
        let repo = Repository::from_value(repo_payload(), test_client()).expect("build");

        assert_eq!(repo.id(), 1296269);
        assert_eq!(repo.full_name(), "octocat/widget");
        assert_eq!(repo.language(), Some("Rust"));
        assert_eq!(repo.clone_url(), "https://github.com/octocat/widget.git");
        assert!(repo.age().elapsed() > 0);
        assert!(repo.last_update().elapsed() > 0);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut payload = repo_payload();
        payload.as_object_mut().unwrap().remove("language");
        payload.as_object_mut().unwrap().remove("description");

        let repo = Repository::from_value(payload, test_client()).expect("build");
        assert!(repo.language().is_none());
        assert!(repo.description().is_none());
    }

    #[test]
    fn missing_required_field_fails_construction() {
        let mut payload = repo_payload();
        payload.as_object_mut().unwrap().remove("clone_url");

        let err = Repository::from_value(payload, test_client()).unwrap_err();
        assert!(matches!(err, EntityError::Payload(_)));
    }

    #[test]
    fn malformed_timestamp_fails_construction() {
        let mut payload = repo_payload();
        payload["updated_at"] = json!("January 26th");

        let err = Repository::from_value(payload, test_client()).unwrap_err();
        assert!(matches!(err, EntityError::Timestamp(_)));
    }

    #[test]
    fn releasable_requires_public_non_fork() {
        let client = test_client();

        let mut payload = repo_payload();
        let repo = Repository::from_value(payload.clone(), Arc::clone(&client)).unwrap();
        assert!(repo.releasable());

        payload["fork"] = json!(true);
        let fork = Repository::from_value(payload.clone(), Arc::clone(&client)).unwrap();
        assert!(!fork.releasable());

        payload["fork"] = json!(false);
        payload["private"] = json!(true);
        let private = Repository::from_value(payload, client).unwrap();
        assert!(!private.releasable());
    }

    #[test]
    fn many_from_value_rejects_any_bad_element() {
        let client = test_client();
        let good = repo_payload();
        let mut bad = repo_payload();
        bad.as_object_mut().unwrap().remove("name");

        let ok = Repository::many_from_value(json!([good.clone()]), &client).expect("list");
        assert_eq!(ok.len(), 1);

        assert!(Repository::many_from_value(json!([good, bad]), &client).is_err());
    }

    #[test]
    fn branch_decodes_from_provider_shape() {
        let json = r#"{
            "name": "main",
            "commit": {"sha": "c5b97d5ae6c19d5c5df71a34c7fbeeda2479ccbc", "url": "https://x"},
            "protected": true
        }"#;

        let branch: Branch = serde_json::from_str(json).expect("decode");
        assert_eq!(branch.name, "main");
        assert_eq!(branch.commit.sha, "c5b97d5ae6c19d5c5df71a34c7fbeeda2479ccbc");
    }

    #[test]
    fn tag_commit_is_optional() {
        let with: Tag =
            serde_json::from_str(r#"{"name": "v1.0", "commit": {"sha": "abc"}}"#).expect("decode");
        assert_eq!(with.commit.as_ref().map(|c| c.sha.as_str()), Some("abc"));

        let without: Tag = serde_json::from_str(r#"{"name": "v1.0"}"#).expect("decode");
        assert!(without.commit.is_none());
    }

    #[test]
    fn debug_omits_client_state() {
        let repo = Repository::from_value(repo_payload(), test_client()).expect("build");
        let rendered = format!("{:?}", repo);
        assert!(rendered.contains("octocat/widget"));
        assert!(!rendered.contains("api_base"));
    }
}
