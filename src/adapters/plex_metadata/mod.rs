//! Plex metadata adapter - episode lookup and library refresh over the HTTP API

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::error::ToolError;
use crate::ports::*;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_HEADER: &str = "X-Plex-Token";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Default, Deserialize)]
struct SectionList {
    #[serde(rename = "Directory", default)]
    directories: Vec<PlexSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlexSection {
    key: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataList {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<PlexMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlexMetadata {
    #[serde(rename = "ratingKey")]
    rating_key: String,
    #[serde(rename = "type", default)]
    kind: String,
    title: Option<String>,
    index: Option<u32>,
    #[serde(rename = "parentIndex")]
    parent_index: Option<u32>,
    #[serde(rename = "grandparentTitle")]
    grandparent_title: Option<String>,
    #[serde(rename = "Media", default)]
    media: Vec<PlexMedia>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlexMedia {
    #[serde(rename = "Part", default)]
    parts: Vec<PlexPart>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlexPart {
    file: String,
}

/// Last path component, whichever separator the server uses
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

impl PlexMetadata {
    fn has_file(&self, file_name: &str) -> bool {
        self.media
            .iter()
            .flat_map(|media| &media.parts)
            .any(|part| basename(&part.file) == file_name)
    }
}

fn find_episode(show: &PlexMetadata, leaves: &[PlexMetadata], file_name: &str) -> Option<EpisodeInfo> {
    leaves
        .iter()
        .find(|episode| episode.has_file(file_name))
        .map(|episode| EpisodeInfo {
            series: episode.grandparent_title.clone().or_else(|| show.title.clone()),
            season: episode.parent_index,
            episode: episode.index,
            title: episode.title.clone(),
        })
}

/// Process-local cache for the last matched show
#[derive(Debug, Default)]
pub struct InMemoryLibraryCache {
    location: Mutex<Option<LibraryLocation>>,
}

impl InMemoryLibraryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LibraryCache for InMemoryLibraryCache {
    fn get(&self) -> Option<LibraryLocation> {
        self.location.lock().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, location: LibraryLocation) {
        if let Ok(mut guard) = self.location.lock() {
            *guard = Some(location);
        }
    }

    fn invalidate(&self) {
        if let Ok(mut guard) = self.location.lock() {
            *guard = None;
        }
    }
}

/// Plex media server client
pub struct PlexMetadataAdapter {
    client: Client,
    base_url: String,
    token: String,
    cache: Arc<dyn LibraryCache>,
}

impl PlexMetadataAdapter {
    pub fn new(base_url: &str, token: &str, cache: Arc<dyn LibraryCache>) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(CONNECTION_TIMEOUT)
            .build()
            .map_err(|e| DomainError::MetadataFail(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            cache,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ToolError::from)?;

        if !response.status().is_success() {
            return Err(DomainError::MetadataFail(format!(
                "{} returned {}",
                path,
                response.status()
            )));
        }

        let envelope: Envelope<T> = response.json().await.map_err(ToolError::from)?;
        Ok(envelope.media_container)
    }

    async fn leaves(&self, rating_key: &str) -> Result<Vec<PlexMetadata>, DomainError> {
        let list: MetadataList = self
            .get_json(&format!("/library/metadata/{}/allLeaves", rating_key))
            .await?;
        Ok(list.metadata)
    }

    /// Try the cached show before scanning everything
    async fn lookup_cached(&self, file_name: &str) -> Result<Option<EpisodeInfo>, DomainError> {
        let Some(location) = self.cache.get() else {
            return Ok(None);
        };
        let show = PlexMetadata {
            rating_key: location.media_key.clone(),
            kind: "show".to_string(),
            title: None,
            index: None,
            parent_index: None,
            grandparent_title: None,
            media: Vec::new(),
        };
        let leaves = self.leaves(&location.media_key).await?;
        let found = find_episode(&show, &leaves, file_name);
        if found.is_none() {
            debug!("Library cache miss for {}", file_name);
            self.cache.invalidate();
        }
        Ok(found)
    }

    async fn scan(&self, file_name: &str) -> Result<Option<EpisodeInfo>, DomainError> {
        let sections: SectionList = self.get_json("/library/sections").await?;
        for section in &sections.directories {
            debug!("Scanning library section {}", section.title);
            let items: MetadataList = self
                .get_json(&format!("/library/sections/{}/all", section.key))
                .await?;
            for item in &items.metadata {
                match item.kind.as_str() {
                    "show" => {
                        let leaves = self.leaves(&item.rating_key).await?;
                        if let Some(found) = find_episode(item, &leaves, file_name) {
                            self.cache.set(LibraryLocation {
                                section_key: section.key.clone(),
                                media_key: item.rating_key.clone(),
                            });
                            return Ok(Some(found));
                        }
                    }
                    "movie" if item.has_file(file_name) => {
                        return Ok(Some(EpisodeInfo {
                            title: item.title.clone(),
                            ..EpisodeInfo::default()
                        }));
                    }
                    _ => {}
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl MetadataPort for PlexMetadataAdapter {
    async fn lookup(&self, file_path: &Path) -> Result<Option<EpisodeInfo>, DomainError> {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::BadArgs(format!("Path has no file name: {}", file_path.display())))?;

        if let Some(found) = self.lookup_cached(&file_name).await? {
            return Ok(Some(found));
        }
        self.scan(&file_name).await
    }

    async fn refresh_libraries(&self) -> Result<(), DomainError> {
        let url = format!("{}/library/sections/all/refresh", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(ToolError::from)?;

        if !response.status().is_success() {
            return Err(DomainError::MetadataFail(format!(
                "Library refresh failed ({})",
                response.status()
            )));
        }
        info!("Requested a refresh of all libraries");
        Ok(())
    }
}
