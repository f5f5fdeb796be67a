//! GitHub Actions runner integration: workflow commands on stdout and
//! the GITHUB_ENV export file.

pub mod commands;
pub mod env_file;

pub use commands::{add_mask, info, issue_error};
pub use env_file::export_variable;

/// Whether the workflow run has step debug logging enabled.
pub fn debug_enabled() -> bool {
    std::env::var("RUNNER_DEBUG").map(|v| v == "1").unwrap_or(false)
}
