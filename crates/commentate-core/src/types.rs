use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{language::Language, style::CommentaryStyle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "text")]
    pub on_screen_text: String,
    #[serde(alias = "duration")]
    pub duration_seconds: f64,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAnnotation {
    #[serde(alias = "timestamp")]
    pub timestamp_seconds: f64,
    #[serde(default, alias = "objects")]
    pub detected_objects: BTreeSet<String>,
    #[serde(default, alias = "text")]
    pub detected_text: String,
    #[serde(default, alias = "description")]
    pub scene_description: String,
}

impl SceneAnnotation {
    pub fn is_empty(&self) -> bool {
        self.detected_objects.is_empty()
            && self.detected_text.trim().is_empty()
            && self.scene_description.trim().is_empty()
    }
}

/// Everything the media fetcher and vision analyzer hand over for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub metadata: VideoMetadata,
    #[serde(default, alias = "frames")]
    pub scenes: Vec<SceneAnnotation>,
}

/// One model call and what the controller learned about its output
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    pub number: u32,
    pub prompt_text: String,
    pub raw_text: String,
    /// Output of the validator; only validated attempts are ever built
    pub text: String,
    pub word_count: usize,
    pub estimated_duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationResult {
    pub style: CommentaryStyle,
    #[serde(rename = "commentary")]
    pub text: String,
    pub metadata: VideoMetadata,
    #[serde(rename = "estimated_duration")]
    pub estimated_duration_seconds: f64,
    pub word_count: usize,
    pub language: Language,
    #[serde(rename = "is_narration_optimized")]
    pub is_duration_compliant: bool,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
}

fn default_attempts() -> u32 {
    1
}
