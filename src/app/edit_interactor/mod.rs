// Edit interactor - Rewrites track properties in place without remuxing

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::app::discovery::{discover, filter_by_structure};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::planner::PropertyUpdater;
use crate::ports::*;
use crate::reconciler::{ReconcileOptions, TemplateReconciler};

/// Request for an in-place property edit batch
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub directory: PathBuf,
    pub force_language_prompt: bool,
    pub additional_flags: bool,
}

/// Per-file outcome of an edit batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditReport {
    pub edited: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed_edits: usize,
}

/// Interactor for the edit use case
pub struct EditInteractor {
    probe_port: Arc<dyn ProbePort>,
    propedit_port: Arc<dyn PropEditPort>,
    fs_port: Arc<dyn FsPort>,
}

impl EditInteractor {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        propedit_port: Arc<dyn PropEditPort>,
        fs_port: Arc<dyn FsPort>,
    ) -> Self {
        Self {
            probe_port,
            propedit_port,
            fs_port,
        }
    }

    /// Build a template from the first primary without reordering, then apply
    /// it to every conforming primary file.
    pub async fn execute(
        &self,
        request: EditRequest,
        console: &mut dyn Console,
    ) -> Result<EditReport, DomainError> {
        info!("Starting in-place edit of {}", request.directory.display());

        let batch = discover(&self.fs_port, &request.directory).await?;
        let primaries = filter_by_structure(&self.probe_port, &batch.primaries).await?;
        let Some(first) = primaries.first() else {
            return Err(DomainError::NoFilesFound(request.directory.display().to_string()));
        };

        let reference = self.probe_port.probe_tracks(first, 0).await?;
        let options = ReconcileOptions {
            force_language_prompt: request.force_language_prompt,
            additional_flags: request.additional_flags,
            allow_reordering: false,
        };
        let template = TemplateReconciler::new(console, options).reconcile(&reference)?;

        let mut report = EditReport::default();
        for path in &primaries {
            let set = MatchSet::new(vec![path.clone()]);
            let resolved = match self.probe_port.probe_tracks(path, 0).await {
                Ok(current) => template.resolve(&set, &current),
                Err(e) => Err(e),
            };
            let resolved = match resolved {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.skipped.push(path.clone());
                    continue;
                }
            };

            for edit in PropertyUpdater::edits(&resolved, request.additional_flags) {
                if let Err(e) = self.propedit_port.edit_track(path, &edit).await {
                    warn!("Could not edit track {} of {}: {}", edit.track_number, path.display(), e);
                    report.failed_edits += 1;
                }
            }
            info!("Edited {}", path.display());
            report.edited.push(path.clone());
        }

        Ok(report)
    }
}
