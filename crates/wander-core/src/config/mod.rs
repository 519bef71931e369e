//! Client configuration for the marketplace API.
//!
//! The only environment input is `WANDER_API_BASE_URL`; everything else has a
//! default that callers may override explicitly.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{normalize_base_url, normalize_text_option};

pub const ENV_API_BASE_URL: &str = "WANDER_API_BASE_URL";

/// Ceiling applied to every API request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Items per listing page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base of the listing/booking routes, e.g. `https://host/api`
    pub api_base_url: String,
    /// Base that stored upload paths resolve against, e.g. `https://host`
    pub upload_base_url: String,
    pub request_timeout: Duration,
    pub page_size: usize,
}

impl ClientConfig {
    /// Build a config from an API base URL, deriving the upload base from it.
    pub fn new(api_base_url: &str) -> Result<Self> {
        let api_base_url = normalize_base_url(api_base_url, "api_base_url").map_err(Error::Config)?;
        let upload_base_url = derive_upload_base(&api_base_url);
        Ok(Self {
            api_base_url,
            upload_base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Load from `WANDER_API_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        parse_config(|key| env::var(key).ok())
    }

    pub fn with_upload_base_url(mut self, upload_base_url: &str) -> Result<Self> {
        self.upload_base_url =
            normalize_base_url(upload_base_url, "upload_base_url").map_err(Error::Config)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }
        self.page_size = page_size;
        Ok(self)
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let api_base_url = normalize_text_option(lookup(ENV_API_BASE_URL))
        .ok_or_else(|| Error::Config(format!("{ENV_API_BASE_URL} is not set")))?;
    ClientConfig::new(&api_base_url)
}

/// Uploads are served from the host root, so a trailing `/api` segment is dropped.
fn derive_upload_base(api_base_url: &str) -> String {
    api_base_url
        .strip_suffix("/api")
        .unwrap_or(api_base_url)
        .to_string()
}
