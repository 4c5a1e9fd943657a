//! model::user
//!
//! The authenticated user's profile as returned by the user-info endpoint.

use serde::{Deserialize, Serialize};

/// A user profile decoded from the provider.
///
/// `login` is required; decoding fails when it is absent rather than
/// producing a partial profile. The display name and avatar are optional
/// on the provider side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Login/username.
    pub login: String,

    /// Display name, when the user has set one.
    #[serde(default)]
    pub name: Option<String>,

    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// The name to show in UI: display name when set, login otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_profile() {
        let json = r#"{
            "login": "octocat",
            "name": "The Octocat",
            "avatar_url": "https://avatars.example/u/1"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).expect("decode");
        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.name.as_deref(), Some("The Octocat"));
        assert_eq!(profile.avatar_url.as_deref(), Some("https://avatars.example/u/1"));
        assert_eq!(profile.display_name(), "The Octocat");
    }

    #[test]
    fn name_and_avatar_are_optional() {
        let json = r#"{"login": "octocat"}"#;

        let profile: UserProfile = serde_json::from_str(json).expect("decode");
        assert!(profile.name.is_none());
        assert!(profile.avatar_url.is_none());
        assert_eq!(profile.display_name(), "octocat");
    }

    #[test]
    fn missing_login_fails_decoding() {
        let json = r#"{"name": "Anonymous", "avatar_url": "https://a"}"#;

        assert!(serde_json::from_str::<UserProfile>(json).is_err());
    }

    #[test]
    fn extra_provider_fields_are_ignored() {
        let json = r#"{"login": "octocat", "id": 1, "site_admin": false}"#;

        let profile: UserProfile = serde_json::from_str(json).expect("decode");
        assert_eq!(profile.login, "octocat");
    }
}
