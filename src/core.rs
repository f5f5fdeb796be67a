//! Orchestration: read inputs, run the selected flow, export the token.

use std::time::Duration;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::auth::{self, AuthFlow};
use crate::cli::{Args, DEFAULT_DOMAIN};
use crate::client::Transport;
use crate::errors::Result;
use crate::headers::parse_header_block;
use crate::runner;
use crate::secret::SecretString;
use crate::status::ExitStatus;

/// Environment variable later workflow steps read the token from.
pub const TOKEN_VARIABLE: &str = "INFISICAL_TOKEN";

/// Main entry point for the binary.
///
/// Sets up logging, runs the exchange on a tokio runtime, and converts
/// the outcome into runner output plus an exit status. Ctrl+C aborts
/// the in-flight exchange instead of waiting it out.
pub fn run(mut args: Args) -> ExitStatus {
    init_tracing();
    args.trim_inputs();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            runner::issue_error(&format!("Failed to start async runtime: {e}"));
            return ExitStatus::Error;
        }
    };

    let outcome = runtime.block_on(async {
        tokio::select! {
            result = exchange(&args) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        }
    });

    match outcome {
        Some(Ok(token)) => emit(&token),
        Some(Err(e)) => {
            runner::issue_error(&e.to_string());
            ExitStatus::Error
        }
        None => {
            eprintln!("Interrupted");
            ExitStatus::Interrupted
        }
    }
}

/// Run the selected authentication flow and return the access token.
///
/// Input validation happens before the transport is built, so a typo'd
/// method is reported even when the domain is also bad.
pub async fn exchange(args: &Args) -> Result<SecretString> {
    let flow = auth::select_flow(args)?;

    let domain = if args.domain.is_empty() {
        DEFAULT_DOMAIN
    } else {
        args.domain.as_str()
    };
    let extra_headers = parse_header_block(&args.extra_headers);
    let transport = Transport::new(domain, &extra_headers, Duration::from_secs(args.timeout))?;

    debug!(method = flow.method().as_str(), domain, "Starting credential exchange");

    match &flow {
        AuthFlow::Universal { client_id, client_secret } => {
            auth::universal::login(&transport, client_id, client_secret).await
        }
        AuthFlow::Oidc { identity_id, audience } => {
            let issuer = auth::oidc::OidcIssuer::from_env()?;
            auth::oidc::login(&transport, &issuer, identity_id, audience).await
        }
        AuthFlow::AwsIam { identity_id } => {
            let credentials = auth::aws_iam::AwsCredentials::from_env()?;
            auth::aws_iam::login(&transport, &credentials, identity_id).await
        }
    }
}

/// Mask the token, export it, and confirm. Masking comes first so the
/// token can never appear unmasked in a later log line.
fn emit(token: &SecretString) -> ExitStatus {
    runner::add_mask(token.as_str());

    if let Err(e) = runner::export_variable(TOKEN_VARIABLE, token.as_str()) {
        runner::issue_error(&e.to_string());
        return ExitStatus::Error;
    }

    runner::info("Successfully set INFISICAL_TOKEN");
    ExitStatus::Success
}

/// Tracing goes to stderr so stdout stays clean for workflow commands.
/// RUST_LOG wins when set; otherwise RUNNER_DEBUG picks the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if runner::debug_enabled() {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
