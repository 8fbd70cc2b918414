//! mkvmerge adapter - container identification and multiplexing

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::adapters::process::run_tool;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::probe::TrackInspector;

const TOOL: &str = "mkvmerge";

/// mkvmerge-based probe and mux adapter
pub struct MkvmergeAdapter {
    program: PathBuf,
}

impl MkvmergeAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",")
}

fn push_inclusion(args: &mut Vec<OsString>, inclusion: &TypeInclusion, include_flag: &str, exclude_flag: &str) {
    match inclusion {
        TypeInclusion::Include(ids) => {
            args.push(include_flag.into());
            args.push(join_ids(ids).into());
        }
        TypeInclusion::Exclude => args.push(exclude_flag.into()),
    }
}

/// Argument vector for `mkvmerge -J <file>`
pub fn identify_args(path: &Path) -> Vec<OsString> {
    vec!["-J".into(), path.as_os_str().to_os_string()]
}

/// Argument vector reproducing the plan exactly.
///
/// Global options come first: track order, attachments, output. Each source
/// file then gets its per-type inclusion and sync options followed by its path.
pub fn mux_args(plan: &MuxPlan) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();

    let order = plan
        .track_order
        .iter()
        .map(GlobalTrackId::to_string)
        .collect::<Vec<_>>()
        .join(",");
    args.push("--track-order".into());
    args.push(order.into());

    for attachment in &plan.attachments {
        args.push("--attach-file".into());
        args.push(attachment.as_os_str().to_os_string());
    }

    args.push("-o".into());
    args.push(plan.output_path.as_os_str().to_os_string());

    for (file_id, source) in plan.sources.iter().enumerate() {
        push_inclusion(&mut args, &source.video, "--video-tracks", "--no-video");
        push_inclusion(&mut args, &source.audio, "--audio-tracks", "--no-audio");
        push_inclusion(&mut args, &source.subtitles, "--subtitle-tracks", "--no-subtitles");
        for offset in plan.sync_for_file(file_id) {
            args.push("--sync".into());
            args.push(format!("{}:{}", offset.id.track_id, offset.offset_ms).into());
        }
        args.push(source.path.as_os_str().to_os_string());
    }

    args
}

#[async_trait]
impl ProbePort for MkvmergeAdapter {
    async fn probe_tracks(&self, file_path: &Path, file_id: usize) -> Result<Vec<Track>, DomainError> {
        let output = run_tool(TOOL, &self.program, &identify_args(file_path))
            .await
            .map_err(|e| DomainError::ExtractionFailure {
                path: file_path.to_path_buf(),
                reason: e.to_string(),
            })?;
        // Unreadable files still print a document describing the error
        TrackInspector::inspect_json(&output.stdout, file_path, file_id)
    }
}

#[async_trait]
impl MuxPort for MkvmergeAdapter {
    async fn mux(&self, plan: &MuxPlan) -> Result<(), DomainError> {
        let output = run_tool(TOOL, &self.program, &mux_args(plan))
            .await?
            .ensure_success(TOOL)?;
        if output.status_code == 1 {
            info!("mkvmerge finished with warnings for {}", plan.output_path.display());
        }
        Ok(())
    }
}
