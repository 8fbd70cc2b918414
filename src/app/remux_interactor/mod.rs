// Remux interactor - Orchestrates the match, reconcile and remux use case

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::app::discovery::{discover, filter_by_structure, inspect_set};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::IdentityComparator;
use crate::matcher::{ensure_uniform_length, FileMatcher};
use crate::planner::{MuxPlanCompiler, PropertyUpdater};
use crate::ports::*;
use crate::reconciler::{ReconcileOptions, TemplateReconciler};
use crate::utils::path::PathUtils;

const TEMP_PREFIX: &str = ".trackmux-";

/// Request for one remux batch
#[derive(Debug, Clone)]
pub struct RemuxRequest {
    pub directory: PathBuf,
    /// Directory holding one counterpart per episode, appended to every set
    pub second_directory: Option<PathBuf>,
    pub options: ReconcileOptions,
    pub subtitle_delay_ms: i64,
    /// Ask the metadata service to rescan once the batch is written
    pub refresh_library: bool,
}

impl RemuxRequest {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            second_directory: None,
            options: ReconcileOptions::default(),
            subtitle_delay_ms: 0,
            refresh_library: false,
        }
    }
}

/// Result of one written match set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetOutcome {
    pub primary: PathBuf,
    pub output: PathBuf,
    pub action: OutputAction,
    pub failed_edits: usize,
}

/// A match set left untouched, and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSet {
    pub primary: PathBuf,
    pub reason: String,
}

/// Summary of a remux batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemuxReport {
    pub written: Vec<SetOutcome>,
    pub skipped: Vec<SkippedSet>,
}

/// Interactor for the remux use case
pub struct RemuxInteractor {
    probe_port: Arc<dyn ProbePort>,
    mux_port: Arc<dyn MuxPort>,
    propedit_port: Arc<dyn PropEditPort>,
    fs_port: Arc<dyn FsPort>,
    metadata_port: Arc<dyn MetadataPort>,
}

impl RemuxInteractor {
    /// Create new remux interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        mux_port: Arc<dyn MuxPort>,
        propedit_port: Arc<dyn PropEditPort>,
        fs_port: Arc<dyn FsPort>,
        metadata_port: Arc<dyn MetadataPort>,
    ) -> Self {
        Self {
            probe_port,
            mux_port,
            propedit_port,
            fs_port,
            metadata_port,
        }
    }

    /// Run the whole batch.
    ///
    /// Structural failures (mismatched set lengths, an unreadable reference
    /// set, a declined template) return before any file is written. After
    /// that, each match set either completes or is skipped with a warning.
    pub async fn execute(
        &self,
        request: RemuxRequest,
        console: &mut dyn Console,
    ) -> Result<RemuxReport, DomainError> {
        info!("Starting remux of {}", request.directory.display());

        let sets = self.match_sets(&request).await?;
        let attachments = {
            let top_level = self.fs_port.list_files(&request.directory).await?;
            FileMatcher::new(&request.directory).attachments(&top_level)
        };
        if !attachments.is_empty() {
            info!("Attaching {} font file(s) to every output", attachments.len());
        }

        let Some(reference_set) = sets.first() else {
            return Err(DomainError::NoFilesFound(request.directory.display().to_string()));
        };
        let reference = inspect_set(&self.probe_port, reference_set).await?;
        let template = TemplateReconciler::new(console, request.options).reconcile(&reference)?;

        let mut report = RemuxReport::default();
        for set in &sets {
            let primary = set.files.first().cloned().unwrap_or_default();
            match self
                .write_set(set, &template, &attachments, &request)
                .await
            {
                Ok(outcome) => {
                    info!(
                        "{} -> {} ({:?})",
                        outcome.primary.display(),
                        outcome.output.display(),
                        outcome.action
                    );
                    report.written.push(outcome);
                }
                Err(e) if e.is_fatal() => {
                    error!("Stopping batch at {}: {}", primary.display(), e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", primary.display(), e);
                    report.skipped.push(SkippedSet {
                        primary,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if request.refresh_library {
            match self.metadata_port.refresh_libraries().await {
                Ok(()) => info!("Library refresh requested"),
                Err(e) => warn!("Library refresh failed: {}", e),
            }
        }

        info!(
            "Remux finished: {} written, {} skipped",
            report.written.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Discover, filter and group the batch; every set has the same length
    pub async fn match_sets(&self, request: &RemuxRequest) -> Result<Vec<MatchSet>, DomainError> {
        let batch = discover(&self.fs_port, &request.directory).await?;
        let primaries = filter_by_structure(&self.probe_port, &batch.primaries).await?;

        let candidates = self
            .fs_port
            .list_files_with_subdirectories(&request.directory)
            .await?;
        let mut sets = batch.matcher.group(&primaries, &candidates);

        if let Some(second) = &request.second_directory {
            let counterparts = self.counterparts(second).await?;
            let mut episodes = Vec::with_capacity(sets.len());
            for set in &sets {
                episodes.push(match set.files.first() {
                    Some(primary) => self.episode_of(primary).await,
                    None => None,
                });
            }
            batch
                .matcher
                .append_counterparts(&mut sets, &episodes, &counterparts);
        }

        ensure_uniform_length(&sets)?;
        for set in &sets {
            debug!("Match set: {:?}", set.files);
        }
        Ok(sets)
    }

    async fn episode_of(&self, path: &Path) -> Option<u32> {
        match self.metadata_port.lookup(path).await {
            Ok(info) => info.and_then(|info| info.episode),
            Err(e) => {
                warn!("Metadata lookup failed for {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Episode number to file for every container in the second directory
    async fn counterparts(&self, directory: &Path) -> Result<BTreeMap<u32, PathBuf>, DomainError> {
        if !self.fs_port.directory_exists(directory).await? {
            return Err(DomainError::BadArgs(format!(
                "Second directory does not exist: {}",
                directory.display()
            )));
        }

        let mut counterparts = BTreeMap::new();
        for path in self.fs_port.list_files(directory).await? {
            // Only containers; a sidecar shares its container's episode number
            if FileKind::from_path(&path) != Some(FileKind::Container) {
                continue;
            }
            let Some(episode) = self.episode_of(&path).await else {
                warn!("No episode number for {}", path.display());
                continue;
            };
            if let Some(previous) = counterparts.insert(episode, path.clone()) {
                warn!(
                    "Episode {} appears twice in the second directory; using {} over {}",
                    episode,
                    path.display(),
                    previous.display()
                );
            }
        }
        Ok(counterparts)
    }

    /// Produce one set's output through a temporary file in `remux/`.
    ///
    /// The temporary file is removed on any failure, so the final path only
    /// ever receives a completed output.
    async fn write_set(
        &self,
        set: &MatchSet,
        template: &TrackTemplate,
        attachments: &[PathBuf],
        request: &RemuxRequest,
    ) -> Result<SetOutcome, DomainError> {
        let primary = set
            .primary()
            .ok_or_else(|| DomainError::TemplateMismatch {
                path: set.files.first().cloned().unwrap_or_default(),
                reason: "match set has no video or container file".to_string(),
            })?
            .to_path_buf();

        let current = inspect_set(&self.probe_port, set).await?;
        let resolved = template.resolve(set, &current)?;
        let primary_tracks: Vec<Track> = current.into_iter().filter(|t| t.file_id == 0).collect();
        let action = IdentityComparator::decide(&resolved, &primary_tracks, request.subtitle_delay_ms);

        let remux_dir = PathUtils::remux_dir(&primary);
        self.fs_port.create_directory(&remux_dir).await?;
        let output = PathUtils::remux_output_path(&primary)?;
        let suffix = primary
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let temp = self
            .fs_port
            .create_temp_file(&remux_dir, TEMP_PREFIX, &suffix)
            .await?;

        let produced = self
            .produce(set, &primary, &resolved, action, attachments, request, &temp)
            .await;
        let failed_edits = match produced {
            Ok(failed_edits) => failed_edits,
            Err(e) => {
                if let Err(cleanup) = self.fs_port.delete_file(&temp).await {
                    warn!("Could not remove {}: {}", temp.display(), cleanup);
                }
                return Err(e);
            }
        };

        if let Err(e) = self.fs_port.move_file(&temp, &output).await {
            if let Err(cleanup) = self.fs_port.delete_file(&temp).await {
                warn!("Could not remove {}: {}", temp.display(), cleanup);
            }
            return Err(e);
        }

        Ok(SetOutcome {
            primary,
            output,
            action,
            failed_edits,
        })
    }

    /// Copy or mux into `temp`, then edit properties; returns failed edit count
    #[allow(clippy::too_many_arguments)]
    async fn produce(
        &self,
        set: &MatchSet,
        primary: &Path,
        resolved: &[Track],
        action: OutputAction,
        attachments: &[PathBuf],
        request: &RemuxRequest,
        temp: &Path,
    ) -> Result<usize, DomainError> {
        match action {
            OutputAction::Copy => {
                debug!("{} already conforms, copying", primary.display());
                self.fs_port.copy_file(primary, temp).await?;
            }
            OutputAction::Remux => {
                let mut plan =
                    MuxPlanCompiler::compile(resolved, set, attachments, request.subtitle_delay_ms)?;
                plan.output_path = temp.to_path_buf();
                self.mux_port.mux(&plan).await?;
            }
        }

        let mut failed = 0;
        for edit in PropertyUpdater::edits(resolved, request.options.additional_flags) {
            if let Err(e) = self.propedit_port.edit_track(temp, &edit).await {
                warn!(
                    "Could not edit track {} of {}: {}",
                    edit.track_number,
                    primary.display(),
                    e
                );
                failed += 1;
            }
        }
        Ok(failed)
    }
}
