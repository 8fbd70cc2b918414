//! Filename metadata adapter - episode numbers from file names only

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::matcher::{extract_episode_number, match_name, season_number};
use crate::ports::*;

/// Resolves season and episode with the matcher's filename heuristics
#[derive(Debug, Default)]
pub struct FilenameMetadataAdapter;

impl FilenameMetadataAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetadataPort for FilenameMetadataAdapter {
    async fn lookup(&self, file_path: &Path) -> Result<Option<EpisodeInfo>, DomainError> {
        let name = match_name(file_path);
        Ok(extract_episode_number(&name).map(|episode| EpisodeInfo {
            series: None,
            season: season_number(&name),
            episode: Some(episode),
            title: None,
        }))
    }

    async fn refresh_libraries(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
