//! External process runner shared by the mkvtoolnix adapters

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{ToolError, ToolResult};

/// Captured result of one tool run
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// mkvtoolnix convention: 0 is success, 1 is success with warnings, 2 and up is failure
    pub fn ensure_success(self, tool: &str) -> ToolResult<Self> {
        if (0..=1).contains(&self.status_code) {
            return Ok(self);
        }
        // mkvtoolnix reports most errors on stdout
        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim().to_string()
        } else {
            self.stderr.trim().to_string()
        };
        Err(ToolError::NonZeroExit {
            tool: tool.to_string(),
            code: self.status_code,
            stderr: detail,
        })
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&self.stderr);
        }
        combined
    }
}

/// Run `program` with `args` and capture its output.
///
/// The child is killed if the returned future is dropped, so callers may
/// bound it with `tokio::time::timeout`.
pub async fn run_tool(tool: &str, program: &Path, args: &[OsString]) -> ToolResult<ProcessOutput> {
    debug!(tool, program = %program.display(), args = ?args, "Running external tool");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ToolError::SpawnFailed {
            tool: tool.to_string(),
            message: format!("{}: {}", program.display(), e),
        })?;

    Ok(ProcessOutput {
        status_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            status_code: code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_warnings_exit_code_is_success() {
        assert!(output(0, "", "").ensure_success("mkvmerge").is_ok());
        assert!(output(1, "Warning: x", "").ensure_success("mkvmerge").is_ok());
    }

    #[test]
    fn test_error_exit_code_reports_stdout_when_stderr_empty() {
        match output(2, "Error: no such file\n", "").ensure_success("mkvmerge") {
            Err(ToolError::NonZeroExit { tool, code, stderr }) => {
                assert_eq!(tool, "mkvmerge");
                assert_eq!(code, 2);
                assert_eq!(stderr, "Error: no such file");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_combined_output() {
        assert_eq!(output(0, "a", "b").combined(), "a\nb");
        assert_eq!(output(0, "a\n", "").combined(), "a\n");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let result = run_tool("mkvmerge", Path::new("/nonexistent/mkvmerge-binary"), &[]).await;
        assert!(matches!(result, Err(ToolError::SpawnFailed { .. })));
    }
}
