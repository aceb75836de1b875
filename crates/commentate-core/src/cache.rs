use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use crate::{
    language::Language,
    style::CommentaryStyle,
    types::{AnalysisInput, SceneAnnotation, VideoMetadata},
};

/// Get the cache directory for a given analysis
///
/// Keyed by the whole analysis: a re-analysis with different scenes or
/// metadata never reuses narrations generated for the old one.
pub fn get_cache_dir(analysis: &AnalysisInput) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    hash_metadata(&analysis.metadata, &mut hasher);
    analysis.scenes.len().hash(&mut hasher);
    for scene in &analysis.scenes {
        scene.timestamp_seconds.to_bits().hash(&mut hasher);
        scene.detected_objects.hash(&mut hasher);
        scene.detected_text.hash(&mut hasher);
        scene.scene_description.hash(&mut hasher);
    }
    let analysis_hash = hasher.finish();

    get_root_cache_dir().join(analysis_hash.to_string())
}

fn hash_metadata(metadata: &VideoMetadata, hasher: &mut DefaultHasher) {
    metadata.title.hash(hasher);
    metadata.description.hash(hasher);
    metadata.on_screen_text.hash(hasher);
    metadata.duration_seconds.to_bits().hash(hasher);
    metadata.language.hash(hasher);
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("commentate")
}

/// Get the path for the cached analysis the narration was generated from
pub fn get_analysis_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("final_analysis.json")
}

/// Get the path for a cached narration (style and language aware)
pub fn get_commentary_path(
    cache_dir: &Path,
    style: CommentaryStyle,
    language: Language,
) -> PathBuf {
    cache_dir.join(format!("commentary_{}_{}.json", style.key(), language.code()))
}

/// Get the path for the speech markup script of a narration
pub fn get_script_path(cache_dir: &Path, style: CommentaryStyle, language: Language) -> PathBuf {
    cache_dir.join(format!("script_{}_{}.ssml", style.key(), language.code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(description: &str, scenes: Vec<SceneAnnotation>) -> AnalysisInput {
        AnalysisInput {
            metadata: VideoMetadata {
                title: String::new(),
                description: description.to_string(),
                on_screen_text: String::new(),
                duration_seconds: 15.0,
                language: Language::English,
            },
            scenes,
        }
    }

    fn scene(ts: f64, description: &str) -> SceneAnnotation {
        SceneAnnotation {
            timestamp_seconds: ts,
            detected_objects: Default::default(),
            detected_text: String::new(),
            scene_description: description.to_string(),
        }
    }

    #[test]
    fn test_cache_dir_is_keyed_by_the_whole_analysis() {
        let cat = analysis("cat video", vec![scene(1.0, "A cat naps")]);
        assert_eq!(get_cache_dir(&cat), get_cache_dir(&cat.clone()));
        assert!(get_cache_dir(&cat).starts_with(get_root_cache_dir()));

        // same empty title and duration, different video
        let goal = analysis("football goal", vec![scene(1.0, "GOAL")]);
        assert_ne!(get_cache_dir(&cat), get_cache_dir(&goal));

        // re-analysis of the same video with new scenes
        let reanalyzed = analysis(
            "cat video",
            vec![scene(1.0, "A cat naps"), scene(4.0, "It wakes")],
        );
        assert_ne!(get_cache_dir(&cat), get_cache_dir(&reanalyzed));
    }

    #[test]
    fn test_artifact_names() {
        let dir = Path::new("/cache/video");
        assert_eq!(
            get_commentary_path(dir, CommentaryStyle::Urdu, Language::Urdu),
            dir.join("commentary_urdu_ur.json")
        );
        assert_eq!(
            get_script_path(dir, CommentaryStyle::Energetic, Language::English),
            dir.join("script_energetic_en.ssml")
        );
        assert_eq!(get_analysis_path(dir), dir.join("final_analysis.json"));
    }
}
