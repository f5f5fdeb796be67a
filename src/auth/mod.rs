//! Authentication flows for the identity service.
//!
//! Each supported method lives in its own submodule; this module holds
//! the method selector and the response handling shared by all of them.

pub mod aws_iam;
pub mod oidc;
pub mod universal;

use serde::Deserialize;
use tracing::debug;

use crate::cli::Args;
use crate::errors::{ExchangeError, Result};
use crate::secret::SecretString;

/// The authentication methods the identity service supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Universal,
    Oidc,
    AwsIam,
}

impl AuthMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "universal" => Some(AuthMethod::Universal),
            "oidc" => Some(AuthMethod::Oidc),
            "aws-iam" => Some(AuthMethod::AwsIam),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Universal => "universal",
            AuthMethod::Oidc => "oidc",
            AuthMethod::AwsIam => "aws-iam",
        }
    }
}

/// A validated method choice together with the inputs that method needs.
/// Constructing one proves the per-method required inputs were present.
#[derive(Debug, Clone)]
pub enum AuthFlow {
    Universal {
        client_id: String,
        client_secret: SecretString,
    },
    Oidc {
        identity_id: String,
        audience: String,
    },
    AwsIam {
        identity_id: String,
    },
}

impl AuthFlow {
    pub fn method(&self) -> AuthMethod {
        match self {
            AuthFlow::Universal { .. } => AuthMethod::Universal,
            AuthFlow::Oidc { .. } => AuthMethod::Oidc,
            AuthFlow::AwsIam { .. } => AuthMethod::AwsIam,
        }
    }
}

/// Validate the method input and collect the credentials it requires.
///
/// Validation happens up front so a typo'd method or a missing secret
/// fails before any network traffic, with the same messages the original
/// action used.
pub fn select_flow(args: &Args) -> Result<AuthFlow> {
    let method = AuthMethod::parse(&args.method)
        .ok_or_else(|| ExchangeError::InvalidMethod(args.method.clone()))?;

    match method {
        AuthMethod::Universal => {
            if args.client_id.is_empty() || args.client_secret.is_empty() {
                return Err(ExchangeError::MissingCredentials(
                    "Missing universal auth credentials",
                ));
            }
            Ok(AuthFlow::Universal {
                client_id: args.client_id.clone(),
                client_secret: args.client_secret.clone(),
            })
        }
        AuthMethod::Oidc => {
            if args.identity_id.is_empty() {
                return Err(ExchangeError::MissingCredentials(
                    "Missing identity ID for OIDC auth",
                ));
            }
            Ok(AuthFlow::Oidc {
                identity_id: args.identity_id.clone(),
                audience: args.oidc_audience.clone(),
            })
        }
        AuthMethod::AwsIam => {
            if args.identity_id.is_empty() {
                return Err(ExchangeError::MissingCredentials(
                    "Missing identity ID for AWS IAM auth",
                ));
            }
            Ok(AuthFlow::AwsIam {
                identity_id: args.identity_id.clone(),
            })
        }
    }
}

/// Successful login body. Only `accessToken` is required; the metadata
/// fields feed debug logging and nothing else.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    token_type: Option<String>,
}

/// Error body shape the identity service uses for rejections.
#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a login response into a token or a rejection error.
///
/// Reads the status first and the body as text second, so a rejection
/// with a non-JSON body still produces a useful message. Any credential
/// in `secrets` that the service echoed back is masked before the
/// message can reach a log line.
pub(crate) async fn read_token_response(
    response: reqwest::Response,
    secrets: &[&str],
) -> Result<SecretString> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ApiError>(&body) {
            Ok(api) => api.message.or(api.error).unwrap_or_else(|| body.clone()),
            Err(_) => body.clone(),
        };
        return Err(ExchangeError::AuthRejected {
            status: status.as_u16(),
            message: redact_secrets(message.trim(), secrets),
        });
    }

    let login: LoginResponse = serde_json::from_str(&body).map_err(|e| {
        ExchangeError::MalformedResponse(format!("login succeeded but body did not parse: {e}"))
    })?;

    if login.access_token.is_empty() {
        return Err(ExchangeError::MalformedResponse(
            "login response had an empty accessToken".to_string(),
        ));
    }

    debug!(
        expires_in = login.expires_in,
        token_type = login.token_type.as_deref().unwrap_or("Bearer"),
        "Access token issued"
    );

    Ok(SecretString::new(login.access_token))
}

/// Replace every known credential in `text` with `***`. Empty secrets
/// are skipped so they cannot blank out the whole message.
pub(crate) fn redact_secrets(text: &str, secrets: &[&str]) -> String {
    let mut out = text.to_string();
    for secret in secrets {
        if !secret.is_empty() {
            out = out.replace(secret, "***");
        }
    }
    out
}
