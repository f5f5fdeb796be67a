//! Common test utilities for the action's integration tests
//!
//! Provides a harness that runs the real binary the way the GitHub
//! runner would: inputs arrive as INPUT_* environment variables and the
//! exported token lands in a temporary GITHUB_ENV file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};

use tempfile::TempDir;

/// Token value used by most happy-path tests.
pub const TEST_TOKEN: &str = "st.7f9a1c.e8d2b4.0aa64c41909a";

/// A single invocation of the action binary with a controlled
/// environment. The environment starts empty apart from GITHUB_ENV, so
/// ambient credentials on the machine running the tests cannot leak in.
pub struct ActionHarness {
    _dir: TempDir,
    env_file: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for ActionHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionHarness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let env_file = dir.path().join("github_env");
        let mut env_vars = HashMap::new();
        env_vars.insert("GITHUB_ENV".to_string(), env_file.display().to_string());
        Self {
            _dir: dir,
            env_file,
            env_vars,
        }
    }

    /// Provide an action input the way the runner does: uppercased name
    /// under the INPUT_ prefix, dashes preserved.
    pub fn input(mut self, name: &str, value: &str) -> Self {
        self.env_vars
            .insert(format!("INPUT_{}", name.to_uppercase()), value.to_string());
        self
    }

    /// Set a plain environment variable (AWS_*, ACTIONS_*, ...).
    pub fn env_var(mut self, name: &str, value: &str) -> Self {
        self.env_vars.insert(name.to_string(), value.to_string());
        self
    }

    /// Drop GITHUB_ENV to simulate running outside a job.
    pub fn without_env_file(mut self) -> Self {
        self.env_vars.remove("GITHUB_ENV");
        self
    }

    /// Content of the GITHUB_ENV file, empty if nothing was exported.
    pub fn exported(&self) -> String {
        std::fs::read_to_string(&self.env_file).unwrap_or_default()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_infisical-auth-action"));
        cmd.env_clear();
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    pub fn run(&self) -> ActionOutput {
        let output = self
            .command()
            .output()
            .expect("Failed to execute action binary");
        ActionOutput::from(output)
    }

    /// Start the binary without waiting for it, for tests that signal
    /// the running process. Collect it with `wait_with_output`.
    pub fn spawn(&self) -> Child {
        self.command().spawn().expect("Failed to spawn action binary")
    }
}

/// Captured output of one action run.
#[derive(Debug)]
pub struct ActionOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl From<Output> for ActionOutput {
    fn from(output: Output) -> Self {
        ActionOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(1),
        }
    }
}

impl ActionOutput {
    /// Exact line match against stdout, where workflow commands live.
    pub fn has_stdout_line(&self, line: &str) -> bool {
        self.stdout.lines().any(|l| l == line)
    }

    /// Position of a line in stdout, for ordering assertions.
    pub fn stdout_line_index(&self, line: &str) -> Option<usize> {
        self.stdout.lines().position(|l| l == line)
    }
}
