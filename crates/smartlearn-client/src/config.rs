//! Configuration for the SmartLearn client.
//!
//! The backend base URL is resolved once at startup and then injected into
//! the API client as an immutable value. Nothing else in the client reads the
//! environment.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{ClientError, Result};

/// Environment variable holding the backend base URL.
pub const BASE_URL_VAR: &str = "API_BASE_URL";

/// Environment variable overriding the session file location.
pub const SESSION_FILE_VAR: &str = "SMARTLEARN_SESSION_FILE";

/// Default session file path, relative to the working directory.
fn default_session_file() -> PathBuf {
    PathBuf::from(".smartlearn/session.json")
}

/// Immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the backend, e.g. `http://localhost:5000`.
    pub api_base_url: Url,

    /// File backing the durable session store.
    pub session_file: PathBuf,
}

impl Config {
    /// Creates a configuration for the given base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if the URL cannot be parsed or
    /// does not use `http`/`https`.
    pub fn new(api_base_url: &str) -> Result<Self> {
        let api_base_url = parse_base_url(api_base_url)?;
        let config = Self {
            api_base_url,
            session_file: default_session_file(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the session file location.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is honored for development,
    /// except in test builds so tests stay hermetic.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MissingConfig` if `API_BASE_URL` is unset or
    /// empty, and `ClientError::InvalidConfig` if it is not a usable URL.
    pub fn from_env() -> Result<Self> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                ClientError::missing_config(
                    BASE_URL_VAR,
                    "Set API_BASE_URL in your environment or .env file (e.g. API_BASE_URL=http://localhost:5000)",
                )
            })?;

        let mut config = Self::new(base_url.trim())?;
        if let Some(path) = lookup(SESSION_FILE_VAR).filter(|value| !value.trim().is_empty()) {
            config.session_file = PathBuf::from(path);
        }
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if the base URL is not an
    /// `http`/`https` URL with a host, or the session file path is empty.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(ClientError::invalid_config(
                BASE_URL_VAR,
                format!("unsupported scheme '{}'", self.api_base_url.scheme()),
                "Use an http:// or https:// URL",
            ));
        }

        if self.api_base_url.host_str().is_none() {
            return Err(ClientError::invalid_config(
                BASE_URL_VAR,
                "URL has no host",
                "Use a full URL such as http://localhost:5000",
            ));
        }

        if self.session_file.as_os_str().is_empty() {
            return Err(ClientError::invalid_config(
                SESSION_FILE_VAR,
                "session file path must not be empty",
                "Unset SMARTLEARN_SESSION_FILE to use the default location",
            ));
        }

        Ok(())
    }

    /// Builds the absolute URL of a backend path such as `/api/courses`.
    ///
    /// Any path prefix in the base URL is preserved.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Builds the URL of a backend resource from path segments.
    ///
    /// Segments are percent-encoded, so ids can be passed as-is.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if the base URL cannot carry a path.
    pub fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::invalid_config(
                    BASE_URL_VAR,
                    "URL cannot be used as a base",
                    "Use a full URL such as http://localhost:5000",
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// The session file path.
    #[must_use]
    pub fn session_file(&self) -> &Path {
        &self.session_file
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| {
        ClientError::invalid_config(
            BASE_URL_VAR,
            format!("'{raw}' is not a valid URL: {e}"),
            "Use a full URL such as http://localhost:5000",
        )
    })
}
