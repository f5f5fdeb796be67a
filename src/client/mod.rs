//! HTTP transport to the identity service.

use std::time::Duration;

use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::errors::{ExchangeError, Result};

/// User-Agent for all requests to the identity service.
pub const USER_AGENT_STRING: &str = concat!("infisical-auth-action/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client carrying the configured domain, timeout, and any
/// extra headers. All login requests go through this.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl Transport {
    pub fn new(
        domain: &str,
        extra_headers: &IndexMap<String, String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base = Url::parse(domain)
            .map_err(|e| ExchangeError::Config(format!("invalid domain {domain:?}: {e}")))?;

        let mut defaults = HeaderMap::new();
        for (name, value) in extra_headers {
            if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) {
                if let Ok(header_value) = HeaderValue::from_str(value) {
                    defaults.insert(header_name, header_value);
                    continue;
                }
            }
            warn!(header = %name, "Skipping invalid extra header");
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT_STRING)
            .default_headers(defaults)
            .timeout(timeout)
            .build()?;

        Ok(Transport { http, base, timeout })
    }

    /// Join a login path onto the configured domain, tolerating trailing
    /// slashes in the domain input.
    pub fn login_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a JSON body to a path under the configured domain. Transport
    /// failures (DNS, TLS, timeout) surface here; HTTP error statuses do
    /// not, so callers can read the rejection body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self.http.post(self.login_url(path)).json(body).send().await?;
        Ok(response)
    }
}
