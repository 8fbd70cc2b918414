//! Container identification output of `mkvmerge -J`

use serde::Deserialize;

pub mod inspector;

pub use inspector::TrackInspector;

/// Top-level identification document
#[derive(Debug, Clone, Deserialize)]
pub struct Identification {
    #[serde(default)]
    pub container: Option<ContainerInfo>,
    #[serde(default)]
    pub tracks: Vec<IdentifiedTrack>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerInfo {
    #[serde(default)]
    pub recognized: bool,
    #[serde(default)]
    pub supported: bool,
    #[serde(rename = "type", default)]
    pub container_type: Option<String>,
}

/// One track as reported by the multiplexer
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifiedTrack {
    pub id: u64,
    #[serde(rename = "type")]
    pub track_type: String,
    #[serde(default)]
    pub codec: String,
    #[serde(default)]
    pub properties: TrackProperties,
}

/// Track properties; every field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackProperties {
    pub language: Option<String>,
    pub default_track: Option<bool>,
    pub forced_track: Option<bool>,
    pub flag_original: Option<bool>,
    pub flag_hearing_impaired: Option<bool>,
    pub flag_visual_impaired: Option<bool>,
    pub flag_text_descriptions: Option<bool>,
    pub flag_commentary: Option<bool>,
    pub track_name: Option<String>,
    pub pixel_dimensions: Option<String>,
    pub number: Option<u64>,
}

impl Identification {
    /// Parse the JSON document printed by the multiplexer
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Why the multiplexer could not read the file, if it could not
    pub fn unreadable_reason(&self) -> Option<String> {
        let container = self.container.as_ref()?;
        if container.recognized && container.supported {
            return None;
        }
        Some(
            self.errors
                .first()
                .cloned()
                .unwrap_or_else(|| "container not recognized or not supported".to_string()),
        )
    }
}
