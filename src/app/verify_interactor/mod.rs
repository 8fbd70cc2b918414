// Verify interactor - Runs the container validator over a directory

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::app::discovery::discover;
use crate::domain::errors::*;
use crate::ports::*;

/// Request for a validation batch
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub directory: PathBuf,
    pub timeout: Duration,
}

/// Validation verdicts for every primary file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerifyReport {
    pub reports: Vec<ValidationReport>,
}

impl VerifyReport {
    pub fn invalid(&self) -> impl Iterator<Item = &ValidationReport> {
        self.reports.iter().filter(|report| !report.valid)
    }

    pub fn all_valid(&self) -> bool {
        self.reports.iter().all(|report| report.valid)
    }
}

/// Interactor for output verification use case
pub struct VerifyInteractor {
    validator_port: Arc<dyn ValidatorPort>,
    fs_port: Arc<dyn FsPort>,
}

impl VerifyInteractor {
    /// Create new verify interactor with injected ports
    pub fn new(validator_port: Arc<dyn ValidatorPort>, fs_port: Arc<dyn FsPort>) -> Self {
        Self {
            validator_port,
            fs_port,
        }
    }

    /// Validate each primary file; a timeout or tool failure marks it invalid
    pub async fn execute(&self, request: VerifyRequest) -> Result<VerifyReport, DomainError> {
        let batch = discover(&self.fs_port, &request.directory).await?;
        let mut report = VerifyReport::default();

        for path in &batch.primaries {
            let verdict = match self.validator_port.validate(path, request.timeout).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!("{}", e);
                    ValidationReport {
                        path: path.clone(),
                        valid: false,
                        details: e.to_string(),
                    }
                }
            };
            if verdict.valid {
                info!("{} appears to be valid", path.display());
            } else {
                warn!("{} is invalid", path.display());
            }
            report.reports.push(verdict);
        }

        Ok(report)
    }
}
