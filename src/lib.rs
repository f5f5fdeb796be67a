//! Infisical auth action library interface
//!
//! Exchanges a machine identity credential for a short-lived Infisical
//! access token and exports it as `INFISICAL_TOKEN` for later workflow
//! steps.
//!
//! # Module Organization
//!
//! - [`cli`] - Action inputs as clap arguments with INPUT_* fallbacks
//! - [`auth`] - The three authentication flows and method selection
//! - [`client`] - HTTP transport to the identity service
//! - [`runner`] - Workflow commands and the GITHUB_ENV export file
//! - [`errors`] - Error types (ExchangeError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod auth;
pub mod cli;
pub mod client;
pub mod core;
pub mod errors;
pub mod headers;
pub mod runner;
pub mod secret;
pub mod status;
