//! Workflow commands the runner parses from stdout.
//!
//! Commands use the `::name::value` syntax. Values are escaped so a
//! multi-line message cannot smuggle in a second command.

/// Escape a command value. `%` goes first so the escapes that follow
/// are not themselves re-escaped.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Ask the runner to mask every future occurrence of `value` in logs.
/// Must be issued before the value is written anywhere else.
pub fn add_mask(value: &str) {
    println!("::add-mask::{}", escape_data(value));
}

/// Emit a failure annotation. The runner surfaces this on the workflow
/// summary; the exit code is set separately.
pub fn issue_error(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Plain informational line for the step log.
pub fn info(message: &str) {
    println!("{message}");
}
