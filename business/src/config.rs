use std::env::vars;
use std::time::Duration;

use log::info;
use serde::Deserialize;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LIST_RETRIES: u32 = 1;

/// Environment as read, before defaults and validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    admin_api_base_url: Option<String>,
    admin_request_timeout_secs: Option<u64>,
    admin_list_retries: Option<u32>,
    admin_page_size: Option<usize>,
    admin_token: Option<String>,
}

/// Process-level settings for talking to the admin API.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    api_base_url: String,
    request_timeout: Duration,
    list_retries: u32,
    page_size: Option<usize>,
    token: Option<String>,
}

impl AdminConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            list_retries: DEFAULT_LIST_RETRIES,
            page_size: None,
            token: None,
        }
    }

    /// Reads `ADMIN_*` environment variables and applies defaults.
    pub fn init() -> anyhow::Result<Self> {
        info!("Loading admin panel configuration from environment variables");
        let raw: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            admin_api_base_url,
            admin_request_timeout_secs,
            admin_list_retries,
            admin_page_size,
            admin_token,
        } = raw;

        let api_base_url = match admin_api_base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_owned(),
            _ => anyhow::bail!("ADMIN_API_BASE_URL must be set"),
        };
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            anyhow::bail!("ADMIN_API_BASE_URL must be an http(s) URL, got {api_base_url}");
        }

        let timeout_secs = match admin_request_timeout_secs {
            Some(0) => anyhow::bail!("ADMIN_REQUEST_TIMEOUT_SECS must be greater than zero"),
            Some(secs) => secs,
            None => {
                info!("ADMIN_REQUEST_TIMEOUT_SECS not set, defaulting to {DEFAULT_TIMEOUT_SECS}");
                DEFAULT_TIMEOUT_SECS
            }
        };

        if admin_page_size == Some(0) {
            anyhow::bail!("ADMIN_PAGE_SIZE must be greater than zero");
        }

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            list_retries: admin_list_retries.unwrap_or(DEFAULT_LIST_RETRIES),
            page_size: admin_page_size,
            token: admin_token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn list_retries(&self) -> u32 {
        self.list_retries
    }

    /// Page size applied to routes that do not set their own.
    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Token that signs the session in at startup.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
