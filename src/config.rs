//! Client configuration resolved from flags and the environment.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;

use crate::api::{MAX_RETRIES, RETRY_DELAY_MS, RetryPolicy};
use crate::runtime::Runtime;

/// Base address used when neither `--api-url` nor `SRE_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variable holding the API base address.
pub const API_URL_ENV: &str = "SRE_API_URL";

/// Environment variable holding an optional bearer token.
pub const API_TOKEN_ENV: &str = "SRE_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl ApiConfig {
    /// Resolves the base URL (flag, then `SRE_API_URL`, then the default) and
    /// the optional token.
    #[tracing::instrument(skip(runtime))]
    pub fn from_runtime<R: Runtime>(runtime: &R, api_url: Option<String>) -> Self {
        let base_url = api_url
            .or_else(|| runtime.env_var(API_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let token = runtime
            .env_var(API_TOKEN_ENV)
            .ok()
            .filter(|token| !token.is_empty());

        debug!("Using API base URL {}", base_url);

        Self {
            base_url,
            token,
            ..Self::default()
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }

    /// Builds the transport: JSON content type on every request, cookie
    /// forwarding, and the bearer token when one is configured.
    pub fn build_http_client(&self) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("SRE_API_TOKEN contains characters not allowed in a header")?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using {} for authentication: {}", API_TOKEN_ENV, mask_token(token));
        }

        Client::builder()
            .user_agent(concat!("srecmd/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")
    }
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
