//! Content API endpoint configuration
//!
//! The hosting shell builds a [`DirectoryConfig`] once at startup, picks the
//! [`ExecutionContext`] it runs in, and hands the resulting base URL to the
//! transport. Nothing below the transport looks at the environment again.

use serde::{Deserialize, Serialize};

use crate::normalize::youtube_video_id;

/// Last-resort content API address when neither URL is configured
pub const FALLBACK_BASE_URL: &str = "http://185.229.119.44:8155";

/// Internal (server-side, e.g. container network) content API URL
pub const INTERNAL_URL_ENV: &str = "DIRECTUS_URL";

/// Public content API URL, also used to build asset links for browsers
pub const PUBLIC_URL_ENV: &str = "DIRECTUS_PUBLIC_URL";

const FEATURED_VIDEO_ID_ENV: &str = "FEATURED_VIDEO_ID";
const FEATURED_VIDEO_URL_ENV: &str = "FEATURED_VIDEO_URL";

/// Where the caller is executing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionContext {
    /// Server-side rendering; may reach the backend over a private network
    #[default]
    Server,
    /// Browser-side; only the public URL is reachable
    Client,
}

/// Optional embedded video shown on the landing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedVideo {
    pub video_id: Option<String>,
    pub video_url: Option<String>,
}

impl FeaturedVideo {
    /// Explicit id wins; otherwise the id is extracted from the URL
    pub fn video_id(&self) -> Option<String> {
        self.video_id
            .clone()
            .or_else(|| self.video_url.as_deref().and_then(youtube_video_id))
    }
}

/// Configuration surface of the data layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub internal_url: Option<String>,
    pub public_url: Option<String>,
    #[serde(default)]
    pub featured_video: FeaturedVideo,
}

impl DirectoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_internal_url(mut self, url: impl Into<String>) -> Self {
        self.internal_url = non_blank(url.into());
        self
    }

    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = non_blank(url.into());
        self
    }

    /// Load from the process environment, reading a `.env` file first if present
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read .env file"),
        }

        let config = Self::from_lookup(|key| std::env::var(key).ok());
        tracing::debug!(
            internal = config.internal_url.is_some(),
            public = config.public_url.is_some(),
            "Directory configuration loaded"
        );
        config
    }

    /// Build from an arbitrary key lookup; blank values count as absent
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).and_then(non_blank);

        Self {
            internal_url: get(INTERNAL_URL_ENV),
            public_url: get(PUBLIC_URL_ENV),
            featured_video: FeaturedVideo {
                video_id: get(FEATURED_VIDEO_ID_ENV),
                video_url: get(FEATURED_VIDEO_URL_ENV),
            },
        }
    }

    /// Resolve the content API base URL for the given context.
    ///
    /// Server: internal, then public, then [`FALLBACK_BASE_URL`].
    /// Client: public, then [`FALLBACK_BASE_URL`].
    pub fn base_url(&self, context: ExecutionContext) -> String {
        let preferred = match context {
            ExecutionContext::Server => self.internal_url.as_ref().or(self.public_url.as_ref()),
            ExecutionContext::Client => self.public_url.as_ref(),
        };

        preferred
            .map(String::as_str)
            .unwrap_or(FALLBACK_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Base URL for asset links handed to browsers
    pub fn asset_base_url(&self) -> String {
        self.base_url(ExecutionContext::Client)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
