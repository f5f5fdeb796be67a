//! AWS IAM auth: prove identity with a signed GetCallerIdentity request.
//!
//! The identity service verifies the caller by replaying a SigV4-signed
//! STS `GetCallerIdentity` request. The request is signed locally and
//! shipped whole (URL, body, headers) base64-encoded inside the login
//! payload; nothing here talks to AWS directly.

use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use indexmap::IndexMap;
use serde_json::json;
use tracing::debug;

use crate::auth::read_token_response;
use crate::client::Transport;
use crate::errors::{ExchangeError, Result};
use crate::secret::SecretString;

pub const LOGIN_PATH: &str = "api/v1/auth/aws-auth/login";

/// Canonical GetCallerIdentity form body STS expects.
pub const CALLER_IDENTITY_BODY: &str = "Action=GetCallerIdentity&Version=2011-06-15";

const STS_SERVICE: &str = "sts";
const DEFAULT_REGION: &str = "us-east-1";

/// Signing credentials read from the job environment.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
    pub region: String,
}

impl AwsCredentials {
    /// Read credentials the way AWS tooling does, accepting the older
    /// variable spellings some environments still export.
    pub fn from_env() -> Result<Self> {
        let access_key_id = env_first(&["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"]);
        let secret_access_key = env_first(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"]);
        let session_token = env_first(&["AWS_SESSION_TOKEN"]);
        let region = env_first(&["AWS_REGION", "AWS_DEFAULT_REGION"])
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        match (access_key_id, secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(AwsCredentials {
                access_key_id,
                secret_access_key: SecretString::new(secret_access_key),
                session_token: session_token.map(SecretString::new),
                region,
            }),
            _ => Err(ExchangeError::AmbientCredentialsUnavailable(
                "AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY are not set; \
                 configure the job's AWS credentials before this step"
                    .to_string(),
            )),
        }
    }

    pub fn sts_host(&self) -> String {
        format!("sts.{}.amazonaws.com", self.region)
    }

    pub fn sts_endpoint(&self) -> String {
        format!("https://{}/", self.sts_host())
    }
}

fn env_first(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
}

/// A signed STS request ready to be serialized into the login payload.
#[derive(Debug, Clone)]
pub struct SignedIdentityRequest {
    pub url: String,
    pub body: String,
    pub headers: IndexMap<String, String>,
}

pub fn build_caller_identity_request(
    credentials: &AwsCredentials,
) -> Result<SignedIdentityRequest> {
    sign_caller_identity_request(credentials, SystemTime::now())
}

fn sign_caller_identity_request(
    credentials: &AwsCredentials,
    time: SystemTime,
) -> Result<SignedIdentityRequest> {
    let signing_credentials = Credentials::new(
        &credentials.access_key_id,
        credentials.secret_access_key.as_str(),
        credentials
            .session_token
            .as_ref()
            .map(|t| t.as_str().to_string()),
        None,
        "infisical-auth-action",
    );
    let identity = signing_credentials.into();

    let settings = SigningSettings::default();
    let signing_params = v4::SigningParams::builder()
        .identity(&identity)
        .region(&credentials.region)
        .name(STS_SERVICE)
        .time(time)
        .settings(settings)
        .build()
        .map_err(|e| ExchangeError::Signing(format!("signing params: {e}")))?;

    // The canonical request signs path "/" with the host carried as a header.
    let host = credentials.sts_host();
    let mut base_headers = http::HeaderMap::new();
    base_headers.insert(
        http::header::HOST,
        http::HeaderValue::from_str(&host)
            .map_err(|e| ExchangeError::Signing(format!("host header: {e}")))?,
    );
    base_headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/x-www-form-urlencoded; charset=utf-8"),
    );

    let signable_request = SignableRequest::new(
        "POST",
        "/",
        base_headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.to_str().unwrap_or(""))),
        SignableBody::Bytes(CALLER_IDENTITY_BODY.as_bytes()),
    )
    .map_err(|e| ExchangeError::Signing(format!("signable request: {e}")))?;

    let signing_output = sign(signable_request, &signing_params.into())
        .map_err(|e| ExchangeError::Signing(e.to_string()))?;
    let (signing_instructions, _) = signing_output.into_parts();

    let mut headers: IndexMap<String, String> = base_headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();
    for (name, value) in signing_instructions.headers() {
        headers.insert(name.to_string(), value.to_string());
    }
    headers.insert(
        "content-length".to_string(),
        CALLER_IDENTITY_BODY.len().to_string(),
    );

    Ok(SignedIdentityRequest {
        url: credentials.sts_endpoint(),
        body: CALLER_IDENTITY_BODY.to_string(),
        headers,
    })
}

/// Sign a GetCallerIdentity request and exchange it for an access token.
pub async fn login(
    transport: &Transport,
    credentials: &AwsCredentials,
    identity_id: &str,
) -> Result<SecretString> {
    let signed = build_caller_identity_request(credentials)?;

    debug!(identity_id, region = %credentials.region, "Logging in with AWS IAM auth");

    let headers_json = serde_json::to_string(&signed.headers)
        .map_err(|e| ExchangeError::Signing(format!("header serialization: {e}")))?;

    let response = transport
        .post_json(
            LOGIN_PATH,
            &json!({
                "identityId": identity_id,
                "iamHttpRequestMethod": "POST",
                "iamRequestUrl": BASE64.encode(&signed.url),
                "iamRequestBody": BASE64.encode(&signed.body),
                "iamRequestHeaders": BASE64.encode(&headers_json),
            }),
        )
        .await?;

    let mut secrets: Vec<&str> = vec![credentials.secret_access_key.as_str()];
    if let Some(token) = &credentials.session_token {
        secrets.push(token.as_str());
    }
    read_token_response(response, &secrets).await
}
