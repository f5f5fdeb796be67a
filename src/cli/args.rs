//! CLI argument definitions using clap
//!
//! Every flag doubles as a GitHub Actions input: the runner passes
//! inputs through `INPUT_*` environment variables, so each argument
//! declares the matching `env` fallback. The flags themselves exist for
//! local debugging outside a workflow.

use clap::Parser;

use crate::secret::SecretString;

/// Identity service used when no domain input is given.
pub const DEFAULT_DOMAIN: &str = "https://app.infisical.com";

/// Exchange a machine identity credential for an Infisical access token
#[derive(Parser, Debug, Clone)]
#[command(name = "infisical-auth-action", version, about, long_about = None)]
pub struct Args {
    /// Authentication method: universal, oidc, or aws-iam
    #[arg(long = "method", value_name = "METHOD", env = "INPUT_METHOD", default_value = "")]
    pub method: String,

    /// Machine identity client ID (universal auth)
    #[arg(
        long = "client-id",
        value_name = "ID",
        env = "INPUT_CLIENT-ID",
        hide_env_values = true,
        default_value = ""
    )]
    pub client_id: String,

    /// Machine identity client secret (universal auth)
    #[arg(
        long = "client-secret",
        value_name = "SECRET",
        env = "INPUT_CLIENT-SECRET",
        hide_env_values = true,
        default_value = ""
    )]
    pub client_secret: SecretString,

    /// Machine identity ID (oidc and aws-iam auth)
    #[arg(
        long = "identity-id",
        value_name = "ID",
        env = "INPUT_IDENTITY-ID",
        hide_env_values = true,
        default_value = ""
    )]
    pub identity_id: String,

    /// Audience claim requested for the runner-issued OIDC token
    #[arg(
        long = "oidc-audience",
        value_name = "AUDIENCE",
        env = "INPUT_OIDC-AUDIENCE",
        default_value = ""
    )]
    pub oidc_audience: String,

    /// Base URL of the identity service
    #[arg(long = "domain", value_name = "URL", env = "INPUT_DOMAIN", default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Extra headers for identity service requests, one "Name: value" per line
    #[arg(
        long = "extra-headers",
        value_name = "HEADERS",
        env = "INPUT_EXTRA-HEADERS",
        default_value = ""
    )]
    pub extra_headers: String,

    /// Request timeout in seconds
    #[arg(long = "timeout", value_name = "SECONDS", env = "INPUT_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

impl Args {
    /// Surrounding whitespace on input values is not significant; the
    /// runner's own input lookup trims it, so match that here.
    pub fn trim_inputs(&mut self) {
        for field in [
            &mut self.method,
            &mut self.client_id,
            &mut self.identity_id,
            &mut self.oidc_audience,
            &mut self.domain,
        ] {
            if field.trim().len() != field.len() {
                *field = field.trim().to_string();
            }
        }
        if self.client_secret.as_str() != self.client_secret.as_str().trim() {
            let trimmed = self.client_secret.as_str().trim().to_string();
            self.client_secret = SecretString::new(trimmed);
        }
    }
}
