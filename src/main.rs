use clap::Parser;

use infisical_auth_action::cli::Args;
use infisical_auth_action::core;
use infisical_auth_action::runner;
use infisical_auth_action::status::ExitStatus;

/// Entry point. Parses arguments (with their INPUT_* fallbacks) and
/// hands off to core::run(), whose ExitStatus implements Termination.
fn main() -> ExitStatus {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e)
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion =>
        {
            e.print().ok();
            return ExitStatus::Success;
        }
        Err(e) => {
            // A bad input value must reach the workflow summary the same
            // way every later failure does.
            let message = e.to_string();
            let message = message.trim_end();
            runner::issue_error(message.strip_prefix("error: ").unwrap_or(message));
            return ExitStatus::Error;
        }
    };

    core::run(args)
}
