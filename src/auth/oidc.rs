//! OIDC auth: exchange the workflow's runner-issued identity token.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::read_token_response;
use crate::client::{Transport, USER_AGENT_STRING};
use crate::errors::{ExchangeError, Result};
use crate::secret::SecretString;

pub const LOGIN_PATH: &str = "api/v1/auth/oidc-auth/login";

/// Endpoint and bearer credential the runner provides for minting
/// workflow identity tokens. Present only when the workflow grants
/// `id-token: write`.
#[derive(Debug, Clone)]
pub struct OidcIssuer {
    pub request_url: String,
    pub request_token: SecretString,
}

impl OidcIssuer {
    /// Read the issuance endpoint from the runner environment.
    pub fn from_env() -> Result<Self> {
        let request_url = std::env::var("ACTIONS_ID_TOKEN_REQUEST_URL")
            .ok()
            .filter(|v| !v.is_empty());
        let request_token = std::env::var("ACTIONS_ID_TOKEN_REQUEST_TOKEN")
            .ok()
            .filter(|v| !v.is_empty());

        match (request_url, request_token) {
            (Some(request_url), Some(request_token)) => Ok(OidcIssuer {
                request_url,
                request_token: SecretString::new(request_token),
            }),
            _ => Err(ExchangeError::AmbientTokenUnavailable(
                "ACTIONS_ID_TOKEN_REQUEST_URL / ACTIONS_ID_TOKEN_REQUEST_TOKEN are not set; \
                 grant the workflow `id-token: write` permission"
                    .to_string(),
            )),
        }
    }

    /// Request an identity token from the runner, optionally asking for a
    /// specific audience claim. Every failure maps to the ambient-token
    /// error since none of them are fixable on the identity service side.
    pub async fn fetch_id_token(&self, audience: &str, timeout: Duration) -> Result<SecretString> {
        let mut url = Url::parse(&self.request_url).map_err(|e| {
            ExchangeError::AmbientTokenUnavailable(format!(
                "invalid token request URL {:?}: {e}",
                self.request_url
            ))
        })?;
        if !audience.is_empty() {
            url.query_pairs_mut().append_pair("audience", audience);
        }

        debug!(audience, "Requesting workflow identity token");

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT_STRING)
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeError::AmbientTokenUnavailable(e.to_string()))?;

        let response = client
            .get(url)
            .bearer_auth(self.request_token.as_str())
            .send()
            .await
            .map_err(|e| ExchangeError::AmbientTokenUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::AmbientTokenUnavailable(format!(
                "token endpoint returned {status}"
            )));
        }

        let body: IdTokenResponse = response.json().await.map_err(|e| {
            ExchangeError::AmbientTokenUnavailable(format!(
                "token endpoint body did not parse: {e}"
            ))
        })?;

        match body.value {
            Some(value) if !value.is_empty() => Ok(SecretString::new(value)),
            _ => Err(ExchangeError::AmbientTokenUnavailable(
                "token endpoint response had no value".to_string(),
            )),
        }
    }
}

#[derive(Deserialize)]
struct IdTokenResponse {
    #[serde(default)]
    value: Option<String>,
}

/// Mint a workflow identity token and exchange it for an access token.
pub async fn login(
    transport: &Transport,
    issuer: &OidcIssuer,
    identity_id: &str,
    audience: &str,
) -> Result<SecretString> {
    let jwt = issuer.fetch_id_token(audience, transport.timeout()).await?;

    debug!(identity_id, "Logging in with OIDC auth");

    let response = transport
        .post_json(
            LOGIN_PATH,
            &json!({
                "identityId": identity_id,
                "jwt": jwt.as_str(),
            }),
        )
        .await?;

    read_token_response(response, &[jwt.as_str()]).await
}
