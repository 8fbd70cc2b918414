//! Mux plan compilation

use std::path::PathBuf;

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::utils::path::PathUtils;

/// Turns a resolved template into a concrete multiplex instruction
pub struct MuxPlanCompiler;

impl MuxPlanCompiler {
    /// Compile the plan for one match set.
    ///
    /// `resolved` is the template already resolved against this set, so every
    /// id refers to the set's own files and tracks. Each member file gets an
    /// explicit inclusion list or exclusion marker per track type; other-type
    /// tracks are only placed by the track order.
    pub fn compile(
        resolved: &[Track],
        set: &MatchSet,
        attachments: &[PathBuf],
        subtitle_delay_ms: i64,
    ) -> Result<MuxPlan, DomainError> {
        let primary = set.primary().ok_or_else(|| DomainError::TemplateMismatch {
            path: set.files.first().cloned().unwrap_or_default(),
            reason: "match set has no video or container file".to_string(),
        })?;
        let output_path = PathUtils::remux_output_path(primary)?;

        let track_order = resolved.iter().map(Track::global_id).collect();

        let ids_for = |file_id: usize, track_type: TrackType| -> TypeInclusion {
            TypeInclusion::from_ids(
                resolved
                    .iter()
                    .filter(|t| t.file_id == file_id && t.track_type == track_type)
                    .map(|t| t.track_id)
                    .collect(),
            )
        };

        let sources = set
            .files
            .iter()
            .enumerate()
            .map(|(file_id, path)| SourceInclusion {
                path: path.clone(),
                video: ids_for(file_id, TrackType::Video),
                audio: ids_for(file_id, TrackType::Audio),
                subtitles: ids_for(file_id, TrackType::Subtitles),
            })
            .collect();

        let sync = if subtitle_delay_ms != 0 {
            resolved
                .iter()
                .filter(|t| t.track_type == TrackType::Subtitles)
                .map(|t| SyncOffset {
                    id: t.global_id(),
                    offset_ms: subtitle_delay_ms,
                })
                .collect()
        } else {
            Vec::new()
        };

        let plan = MuxPlan {
            output_path,
            track_order,
            sources,
            attachments: attachments.to_vec(),
            sync,
        };
        debug!("Compiled mux plan for {}: {:?}", primary.display(), plan.track_order);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(file_id: usize, track_id: u64, track_type: TrackType, path: &str) -> Track {
        Track::new(file_id, track_id, track_type, "codec", path)
    }

    fn set() -> MatchSet {
        MatchSet::new(vec![PathBuf::from("/d/A.mkv"), PathBuf::from("/d/A.eng.srt")])
    }

    fn resolved() -> Vec<Track> {
        vec![
            track(0, 2, TrackType::Video, "/d/A.mkv"),
            track(0, 0, TrackType::Audio, "/d/A.mkv"),
            track(1, 0, TrackType::Subtitles, "/d/A.eng.srt"),
        ]
    }

    #[test]
    fn test_plan_follows_template_order() {
        let plan = MuxPlanCompiler::compile(&resolved(), &set(), &[], 0).unwrap();
        assert_eq!(plan.output_path, PathBuf::from("/d/remux/A.mkv"));
        assert_eq!(
            plan.track_order,
            vec![GlobalTrackId::new(0, 2), GlobalTrackId::new(0, 0), GlobalTrackId::new(1, 0)]
        );
        assert!(plan.sync.is_empty());
    }

    #[test]
    fn test_plan_inclusion_per_file() {
        let plan = MuxPlanCompiler::compile(&resolved(), &set(), &[], 0).unwrap();
        assert_eq!(plan.sources.len(), 2);
        assert_eq!(plan.sources[0].video, TypeInclusion::Include(vec![2]));
        assert_eq!(plan.sources[0].audio, TypeInclusion::Include(vec![0]));
        assert_eq!(plan.sources[0].subtitles, TypeInclusion::Exclude);
        assert_eq!(plan.sources[1].video, TypeInclusion::Exclude);
        assert_eq!(plan.sources[1].subtitles, TypeInclusion::Include(vec![0]));
    }

    #[test]
    fn test_plan_attachments_and_subtitle_delay() {
        let fonts = vec![PathBuf::from("/d/font.ttf")];
        let plan = MuxPlanCompiler::compile(&resolved(), &set(), &fonts, -250).unwrap();
        assert_eq!(plan.attachments, fonts);
        assert_eq!(
            plan.sync,
            vec![SyncOffset { id: GlobalTrackId::new(1, 0), offset_ms: -250 }]
        );
        assert_eq!(plan.sync_for_file(1).count(), 1);
        assert_eq!(plan.sync_for_file(0).count(), 0);
    }

    #[test]
    fn test_plan_requires_primary() {
        let set = MatchSet::new(vec![PathBuf::from("/d/A.srt")]);
        let result = MuxPlanCompiler::compile(&[], &set, &[], 0);
        assert!(matches!(result, Err(DomainError::TemplateMismatch { .. })));
    }

    #[test]
    fn test_plans_share_shape_across_sets() {
        let other_set = MatchSet::new(vec![PathBuf::from("/d/B.mkv"), PathBuf::from("/d/B.eng.srt")]);
        let other_resolved = vec![
            track(0, 1, TrackType::Video, "/d/B.mkv"),
            track(0, 3, TrackType::Audio, "/d/B.mkv"),
            track(1, 0, TrackType::Subtitles, "/d/B.eng.srt"),
        ];
        let first = MuxPlanCompiler::compile(&resolved(), &set(), &[], 0).unwrap();
        let second = MuxPlanCompiler::compile(&other_resolved, &other_set, &[], 0).unwrap();
        let shape = |plan: &MuxPlan| plan.track_order.iter().map(|id| id.file_id).collect::<Vec<_>>();
        assert_eq!(shape(&first), shape(&second));
        assert_eq!(second.output_path, PathBuf::from("/d/remux/B.mkv"));
    }
}
