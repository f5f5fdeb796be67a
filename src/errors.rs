//! Error types for the credential exchange.

use thiserror::Error;

/// Main error type for the exchange. Each variant's message is what the
/// runner shows to the workflow author, so messages name the fix rather
/// than the code path.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Invalid authentication method: {0}")]
    InvalidMethod(String),

    #[error("{0}")]
    MissingCredentials(&'static str),

    #[error("Config error: {0}")]
    Config(String),

    #[error("OIDC identity token unavailable: {0}")]
    AmbientTokenUnavailable(String),

    #[error("AWS credentials unavailable: {0}")]
    AmbientCredentialsUnavailable(String),

    #[error("Failed to sign AWS identity request: {0}")]
    Signing(String),

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Identity service rejected the login ({status}): {message}")]
    AuthRejected { status: u16, message: String },

    #[error("Unexpected response from identity service: {0}")]
    MalformedResponse(String),

    #[error("Failed to export token: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
