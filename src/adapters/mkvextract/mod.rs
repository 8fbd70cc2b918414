//! mkvextract adapter - single-track extraction

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::adapters::process::run_tool;
use crate::domain::errors::*;
use crate::ports::*;

const TOOL: &str = "mkvextract";

pub struct MkvextractAdapter {
    program: PathBuf,
}

impl MkvextractAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Argument vector for `mkvextract tracks <file> TID:OUT...`
pub fn extract_args(file_path: &Path, targets: &[ExtractTarget]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["tracks".into(), file_path.as_os_str().to_os_string()];
    for target in targets {
        let mut selector = OsString::from(format!("{}:", target.track_id));
        selector.push(target.output_path.as_os_str());
        args.push(selector);
    }
    args
}

#[async_trait]
impl ExtractPort for MkvextractAdapter {
    async fn extract_tracks(&self, file_path: &Path, targets: &[ExtractTarget]) -> Result<(), DomainError> {
        if targets.is_empty() {
            return Ok(());
        }
        run_tool(TOOL, &self.program, &extract_args(file_path, targets))
            .await?
            .ensure_success(TOOL)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_args() {
        let targets = vec![
            ExtractTarget {
                track_id: 2,
                output_path: PathBuf::from("/d/A.eng.ass"),
            },
            ExtractTarget {
                track_id: 3,
                output_path: PathBuf::from("/d/A.eng.3.ass"),
            },
        ];
        let args: Vec<String> = extract_args(Path::new("/d/A.mkv"), &targets)
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, vec!["tracks", "/d/A.mkv", "2:/d/A.eng.ass", "3:/d/A.eng.3.ass"]);
    }
}
