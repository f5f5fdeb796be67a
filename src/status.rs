//! Exit status codes for the action binary.
//!
//! Standard Unix conventions:
//! - 0: token obtained and exported
//! - 1: any failure (bad inputs, network errors, login rejection)
//! - 130: interrupted (Ctrl+C / runner cancellation, standard SIGINT code)

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Token obtained and exported
    Success = 0,
    /// Any error (invalid inputs, transport failures, login rejections)
    Error = 1,
    /// Interrupted (Ctrl+C) - standard SIGINT code
    Interrupted = 130,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}
