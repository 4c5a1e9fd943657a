//! config
//!
//! Configuration loading for the OAuth application identity and endpoints.
//!
//! # File format
//!
//! ```toml
//! [github]
//! client_id = "abc"
//! client_secret = "xyz"
//! redirect_uri = "https://app.example/login/github"
//! # Optional endpoint overrides (GitHub Enterprise, tests):
//! # oauth_base = "https://github.example.com"
//! # api_base = "https://github.example.com/api/v3"
//! ```
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$HUBCAP_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/hubcap/config.toml`
//! 3. `<user config dir>/hubcap/config.toml`
//!
//! # Environment overrides
//!
//! `HUBCAP_CLIENT_ID`, `HUBCAP_CLIENT_SECRET`, and `HUBCAP_REDIRECT_URI`
//! override (or stand in for) their file counterparts, so a deployment can
//! run without a secret on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found and the environment does not supply
    /// the required values.
    #[error("no configuration found; create a config.toml or set the HUBCAP_* environment variables")]
    NotFound,

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// OS diagnostic.
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required value is absent from both file and environment.
    #[error("missing required configuration value '{0}'")]
    Missing(&'static str),
}

/// Raw file contents before environment resolution.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    github: RawGithub,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawGithub {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    oauth_base: Option<String>,
    api_base: Option<String>,
}

/// Environment values considered during resolution.
///
/// Captured once per load so resolution is a pure function of its inputs.
#[derive(Debug, Default)]
struct EnvOverrides {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
}

impl EnvOverrides {
    fn capture() -> Self {
        Self {
            client_id: std::env::var("HUBCAP_CLIENT_ID").ok(),
            client_secret: std::env::var("HUBCAP_CLIENT_SECRET").ok(),
            redirect_uri: std::env::var("HUBCAP_REDIRECT_URI").ok(),
        }
    }
}

/// Resolved GitHub application settings.
#[derive(Clone)]
pub struct GithubSection {
    /// OAuth application client id.
    pub client_id: String,

    /// OAuth application client secret.
    pub client_secret: String,

    /// Redirect URI registered with the provider.
    pub redirect_uri: String,

    /// Web endpoint base override.
    pub oauth_base: Option<String>,

    /// API endpoint base override.
    pub api_base: Option<String>,
}

// Custom Debug: the client secret must not leak through logs.
impl std::fmt::Debug for GithubSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubSection")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("oauth_base", &self.oauth_base)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub application settings.
    pub github: GithubSection,
}

impl Config {
    /// Load configuration from the default locations plus environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] when no file exists and the environment
    ///   does not supply all required values.
    /// - [`ConfigError::Missing`] when a required value is absent after
    ///   merging file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env = EnvOverrides::capture();

        let raw = match Self::find_file() {
            Some(path) => Self::read_raw(&path)?,
            None => {
                // Environment-only deployments are valid; an empty file
                // stands in and resolution checks completeness.
                if env.client_id.is_none() {
                    return Err(ConfigError::NotFound);
                }
                RawConfig::default()
            }
        };

        Self::resolve(raw, env)
    }

    /// Load configuration from an explicit file plus environment overrides.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = Self::read_raw(path)?;
        Self::resolve(raw, EnvOverrides::capture())
    }

    fn find_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("HUBCAP_CONFIG") {
            return Some(PathBuf::from(path));
        }

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            let path = Path::new(&xdg).join("hubcap").join("config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        let path = dirs::config_dir()?.join("hubcap").join("config.toml");
        path.exists().then_some(path)
    }

    fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn resolve(raw: RawConfig, env: EnvOverrides) -> Result<Self, ConfigError> {
        let github = GithubSection {
            client_id: env
                .client_id
                .or(raw.github.client_id)
                .ok_or(ConfigError::Missing("github.client_id"))?,
            client_secret: env
                .client_secret
                .or(raw.github.client_secret)
                .ok_or(ConfigError::Missing("github.client_secret"))?,
            redirect_uri: env
                .redirect_uri
                .or(raw.github.redirect_uri)
                .ok_or(ConfigError::Missing("github.redirect_uri"))?,
            oauth_base: raw.github.oauth_base,
            api_base: raw.github.api_base,
        };

        Ok(Self { github })
    }
}
