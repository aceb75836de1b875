use std::path::Path;

use rand::Rng;
use tokio::fs;
use tracing::{debug, info};

use crate::{
    config::NarrationConfig,
    controller::{GenerationController, NarrationRequest},
    error::{NarrationError, Result},
    language::Language,
    markup,
    provider::LanguageModel,
    style::CommentaryStyle,
    types::{AnalysisInput, NarrationResult, VideoMetadata},
};

/// Load an analysis file and order its scenes by timestamp
pub async fn load_analysis(path: &Path) -> Result<AnalysisInput> {
    let json_content = fs::read_to_string(path).await?;
    let mut analysis: AnalysisInput =
        serde_json::from_str(&json_content).map_err(|e| NarrationError::AnalysisLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if analysis
        .scenes
        .iter()
        .any(|scene| !scene.timestamp_seconds.is_finite())
    {
        return Err(NarrationError::AnalysisLoadFailed {
            path: path.to_path_buf(),
            reason: "scene timestamps must be finite numbers".to_string(),
        });
    }
    analysis
        .scenes
        .sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));

    debug!(
        path = %path.display(),
        scenes = analysis.scenes.len(),
        duration = analysis.metadata.duration_seconds,
        "Loaded analysis"
    );
    Ok(analysis)
}

/// Save an analysis next to the narrations generated from it
pub async fn save_analysis(analysis: &AnalysisInput, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(analysis)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Narration language: an explicit choice wins, then the style's own language,
/// then the language the video was analyzed in.
pub fn resolve_language(
    requested: Option<Language>,
    style: CommentaryStyle,
    metadata: &VideoMetadata,
) -> Language {
    requested
        .or(style.profile().native_language)
        .unwrap_or(metadata.language)
}

/// Generate a duration-checked narration for an analyzed video
pub async fn generate_narration<M: LanguageModel + ?Sized>(
    model: &M,
    analysis: &AnalysisInput,
    style: CommentaryStyle,
    language: Language,
    config: &NarrationConfig,
) -> Result<NarrationResult> {
    let result = GenerationController::new(model, config.clone())
        .run(NarrationRequest {
            metadata: &analysis.metadata,
            scenes: &analysis.scenes,
            style,
            language,
        })
        .await?;

    info!(
        %style,
        %language,
        words = result.word_count,
        compliant = result.is_duration_compliant,
        "Generated narration"
    );
    Ok(result)
}

/// Speech markup for a narration, paced by its style
pub fn render_script<R: Rng + ?Sized>(result: &NarrationResult, rng: &mut R) -> String {
    markup::format(&result.text, result.style, rng)
}

/// Load a narration from a cached file
pub async fn load_narration(path: &Path) -> Result<NarrationResult> {
    let json_content = fs::read_to_string(path).await?;
    let narration: NarrationResult = serde_json::from_str(&json_content)?;
    Ok(narration)
}

/// Save a narration to a file
pub async fn save_narration(result: &NarrationResult, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(result)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

pub async fn save_script(script: &str, path: &Path) -> Result<()> {
    fs::write(path, script).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::TempDir;

    use super::*;
    use crate::provider::{CompletionRequest, ModelError};

    struct FixedModel(&'static str);

    #[async_trait]
    impl LanguageModel for FixedModel {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> std::result::Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    const ANALYSIS: &str = r#"{
        "metadata": {"title": "Harbor", "description": "Boats at dawn", "duration": 8.0},
        "scenes": [
            {"timestamp": 6.0, "objects": ["crate"]},
            {"timestamp": 0.5, "objects": ["boat"], "description": "Boats drift in"},
            {"timestamp": 3.0, "text": "PORT DAY"}
        ]
    }"#;

    #[tokio::test]
    async fn test_load_analysis_sorts_scenes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("final_analysis.json");
        fs::write(&path, ANALYSIS).await.unwrap();

        let analysis = load_analysis(&path).await.unwrap();
        let timestamps: Vec<f64> = analysis
            .scenes
            .iter()
            .map(|s| s.timestamp_seconds)
            .collect();
        assert_eq!(timestamps, vec![0.5, 3.0, 6.0]);
        assert_eq!(analysis.metadata.language, Language::English);
    }

    #[tokio::test]
    async fn test_load_analysis_reports_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"metadata\": {}}").await.unwrap();

        let err = load_analysis(&path).await.unwrap_err();
        assert!(matches!(err, NarrationError::AnalysisLoadFailed { ref path, .. } if path.ends_with("broken.json")));
    }

    #[tokio::test]
    async fn test_load_analysis_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_analysis(&dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, NarrationError::IoError(_)));
    }

    #[test]
    fn test_resolve_language() {
        let mut metadata: VideoMetadata =
            serde_json::from_str(r#"{"duration": 5.0, "language": "ur"}"#).unwrap();

        assert_eq!(
            resolve_language(Some(Language::English), CommentaryStyle::Urdu, &metadata),
            Language::English
        );
        assert_eq!(
            resolve_language(None, CommentaryStyle::Documentary, &metadata),
            Language::Urdu
        );
        metadata.language = Language::English;
        assert_eq!(
            resolve_language(None, CommentaryStyle::Urdu, &metadata),
            Language::Urdu
        );
    }

    #[tokio::test]
    async fn test_generate_render_and_persist() {
        let dir = TempDir::new().unwrap();
        let analysis: AnalysisInput = serde_json::from_str(ANALYSIS).unwrap();
        let model = FixedModel("Boats glide in at dawn, and the harbor wakes. What a sight!");

        let result = generate_narration(
            &model,
            &analysis,
            CommentaryStyle::Storyteller,
            Language::English,
            &NarrationConfig::default(),
        )
        .await
        .unwrap();
        assert!(result.is_duration_compliant);
        assert_eq!(result.word_count, 12);

        let script = render_script(&result, &mut StdRng::seed_from_u64(9));
        assert!(script.contains("<break time="));
        assert!(script.ends_with("sight!"));

        let narration_path = dir.path().join("commentary_storyteller_en.json");
        save_narration(&result, &narration_path).await.unwrap();
        assert_eq!(load_narration(&narration_path).await.unwrap(), result);

        let script_path = dir.path().join("script_storyteller_en.ssml");
        save_script(&script, &script_path).await.unwrap();
        assert_eq!(fs::read_to_string(&script_path).await.unwrap(), script);

        let analysis_path = dir.path().join("final_analysis.json");
        save_analysis(&analysis, &analysis_path).await.unwrap();
        let reloaded = load_analysis(&analysis_path).await.unwrap();
        assert_eq!(reloaded.metadata, analysis.metadata);
    }
}
