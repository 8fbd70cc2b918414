//! mkvalidator adapter - container integrity checks under a time bound

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::adapters::process::run_tool;
use crate::domain::errors::*;
use crate::error::ToolError;
use crate::ports::*;

const TOOL: &str = "mkvalidator";

/// Marker printed by the validator for a sound file
pub const VALID_MARKER: &str = "the file appears to be valid";

static PROGRESS_DOTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.{2,}").expect("progress dots regex should compile"));

pub struct MkvalidatorAdapter {
    program: PathBuf,
}

impl MkvalidatorAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

pub fn validate_args(file_path: &Path) -> Vec<OsString> {
    vec!["--no-warn".into(), "--quick".into(), file_path.as_os_str().to_os_string()]
}

/// Judge validator output; the details drop the progress dots
pub fn interpret_output(file_path: &Path, output: &str) -> ValidationReport {
    ValidationReport {
        path: file_path.to_path_buf(),
        valid: output.contains(VALID_MARKER),
        details: PROGRESS_DOTS.replace_all(output, "").trim().to_string(),
    }
}

#[async_trait]
impl ValidatorPort for MkvalidatorAdapter {
    async fn validate(&self, file_path: &Path, timeout: Duration) -> Result<ValidationReport, DomainError> {
        let args = validate_args(file_path);
        let output = tokio::time::timeout(timeout, run_tool(TOOL, &self.program, &args))
            .await
            .map_err(|_| ToolError::Timeout {
                tool: TOOL.to_string(),
                path: file_path.to_path_buf(),
                seconds: timeout.as_secs(),
            })??;
        Ok(interpret_output(file_path, &output.combined()))
    }
}
