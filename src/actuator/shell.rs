//! Shell actuator - executes actions as shell commands.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;
use tokio::process::Command;

use super::{ActionResult, Actuator, ExecuteOptions};

const DEFAULT_TIMEOUT_MS: u64 = 60_000;
const MAX_OUTPUT_CHARS: usize = 30_000;

/// Runs each action as `sh -c <action>` in an optional working directory.
///
/// Exit 0 maps to success with stdout, nonzero to failure with stderr, and
/// an elapsed time budget to the timeout outcome. The exit code rides in
/// the result metadata.
pub struct ShellActuator {
    cwd: Option<PathBuf>,
    default_timeout_ms: u64,
}

impl ShellActuator {
    pub fn new() -> Self {
        Self {
            cwd: None,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_default_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }
}

impl Default for ShellActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Actuator for ShellActuator {
    fn name(&self) -> &str {
        "shell"
    }

    async fn execute(&self, action: &str, options: &ExecuteOptions) -> ActionResult {
        let timeout_ms = options.timeout_ms.unwrap_or(self.default_timeout_ms);
        let start = Instant::now();

        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(action)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        let output = match tokio::time::timeout(Duration::from_millis(timeout_ms), command.output()).await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                // Spawn failure is an unexpected internal fault
                return ActionResult::failure(
                    format!("failed to spawn command: {}", e),
                    start.elapsed().as_millis() as u64,
                );
            }
            Err(_) => {
                return ActionResult::timeout(
                    format!("command timed out after {}ms", timeout_ms),
                    start.elapsed().as_millis() as u64,
                );
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let stdout = truncate_output(&String::from_utf8_lossy(&output.stdout));
        let stderr = truncate_output(&String::from_utf8_lossy(&output.stderr));
        let exit_code = output.status.code().unwrap_or(-1);

        if output.status.success() {
            ActionResult::success(stdout, duration_ms).with_metadata(json!({ "exit_code": exit_code }))
        } else {
            let error = if stderr.is_empty() {
                format!("exit code {}", exit_code)
            } else {
                stderr
            };
            let mut result = ActionResult::failure(error, duration_ms)
                .with_metadata(json!({ "exit_code": exit_code }));
            if !stdout.is_empty() {
                result.output = Some(stdout);
            }
            result
        }
    }

    fn is_available(&self) -> bool {
        match &self.cwd {
            Some(cwd) => cwd.is_dir(),
            None => true,
        }
    }
}

fn truncate_output(raw: &str) -> String {
    if raw.chars().count() <= MAX_OUTPUT_CHARS {
        return raw.trim_end_matches('\n').to_string();
    }
    let head: String = raw.chars().take(MAX_OUTPUT_CHARS).collect();
    format!("{}...\n[truncated, {} chars total]", head, raw.chars().count())
}
