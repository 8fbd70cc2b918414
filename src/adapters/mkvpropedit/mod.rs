//! mkvpropedit adapter - in-place track property edits

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::adapters::process::run_tool;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const TOOL: &str = "mkvpropedit";

pub struct MkvpropeditAdapter {
    program: PathBuf,
}

impl MkvpropeditAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Argument vector for one track edit
pub fn propedit_args(file_path: &Path, edit: &PropertyEdit) -> Vec<OsString> {
    let mut sets = vec![
        format!("flag-default={}", flag(edit.default_flag)),
        format!("flag-forced={}", flag(edit.forced_flag)),
        format!("language={}", edit.language),
    ];
    if let Some(name) = &edit.name {
        sets.push(format!("name={}", name));
    }
    if let Some(additional) = &edit.additional {
        sets.push(format!("flag-original={}", flag(additional.original)));
        sets.push(format!("flag-hearing-impaired={}", flag(additional.hearing_impaired)));
        sets.push(format!("flag-visual-impaired={}", flag(additional.visual_impaired)));
        sets.push(format!("flag-text-descriptions={}", flag(additional.text_descriptions)));
        sets.push(format!("flag-commentary={}", flag(additional.commentary)));
    }

    let mut args: Vec<OsString> = vec![
        file_path.as_os_str().to_os_string(),
        "--edit".into(),
        format!("track:{}", edit.track_number).into(),
    ];
    for set in sets {
        args.push("--set".into());
        args.push(set.into());
    }
    args
}

#[async_trait]
impl PropEditPort for MkvpropeditAdapter {
    async fn edit_track(&self, file_path: &Path, edit: &PropertyEdit) -> Result<(), DomainError> {
        run_tool(TOOL, &self.program, &propedit_args(file_path, edit))
            .await?
            .ensure_success(TOOL)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_basic_edit() {
        let edit = PropertyEdit {
            track_number: 2,
            default_flag: true,
            forced_flag: false,
            language: "jpn".to_string(),
            name: Some("Japanese 5.1".to_string()),
            additional: None,
        };
        assert_eq!(
            strings(&propedit_args(Path::new("/d/remux/A.mkv"), &edit)),
            vec![
                "/d/remux/A.mkv", "--edit", "track:2",
                "--set", "flag-default=1",
                "--set", "flag-forced=0",
                "--set", "language=jpn",
                "--set", "name=Japanese 5.1",
            ]
        );
    }

    #[test]
    fn test_additional_flags_edit() {
        let edit = PropertyEdit {
            track_number: 3,
            default_flag: false,
            forced_flag: true,
            language: "eng".to_string(),
            name: None,
            additional: Some(AdditionalFlags {
                original: false,
                hearing_impaired: true,
                visual_impaired: false,
                text_descriptions: false,
                commentary: false,
            }),
        };
        let args = strings(&propedit_args(Path::new("a.mkv"), &edit));
        assert_eq!(args.len(), 3 + 2 * 8);
        assert!(args.contains(&"flag-hearing-impaired=1".to_string()));
        assert!(args.contains(&"flag-commentary=0".to_string()));
        assert!(!args.iter().any(|arg| arg.starts_with("name=")));
    }
}
