//! Builds the system and user prompts for one narration request.

use std::collections::BTreeSet;

use crate::{
    format::format_scene_digest,
    language::Language,
    speaking_rate::{target_duration, word_budget},
    style::CommentaryStyle,
    types::{SceneAnnotation, VideoMetadata},
};

static BASE_SYSTEM_PROMPT: &str = r#"You are a skilled content commentator who adapts your style to the video's content and context. Your commentary should:

1. Focus primarily on the video's text content and subject matter
2. Adapt your tone and style to the content's theme
3. Use the video's own language and terminology
4. Stay authentic by referencing specific details from the video
5. Vary your emotional responses with the content
6. Avoid generic reactions and repetitive patterns
7. Create natural transitions between topics

Every video deserves its own commentary."#;

static URDU_REQUIREMENTS: &str = r#"URDU LANGUAGE REQUIREMENTS:
1. Write in proper Urdu script (Unicode range 0600-06FF)
2. Use proper Urdu punctuation marks (۔ ، ؟)
3. Write naturally, as a native Urdu speaker would
4. Use common Urdu expressions and interjections
5. Keep formal respect where appropriate
Example: "ارے واہ! یہ دیکھیے۔""#;

/// Objects seen consecutively are "recurring"; a gap this long marks a scene transition.
const SCENE_TRANSITION_GAP_SECONDS: f64 = 2.0;

/// Prompts and the budget they were built for
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationPrompt {
    pub system: String,
    pub user: String,
    pub target_duration_seconds: f64,
    pub max_words: usize,
}

impl NarrationPrompt {
    /// Append the directive that follows an over-long generation
    pub fn tighten(&mut self, max_words: usize, video_duration: f64) {
        self.user.push_str(&format!(
            "\n\nWARNING: The previous generation was too long. Generate SHORTER text:\n\
             - It MUST be under {:.1} seconds when spoken\n\
             - Use at most {} words\n\
             - Focus on the most important points only",
            video_duration, max_words
        ));
        self.max_words = max_words;
    }
}

/// Narrative patterns across the whole annotation sequence
#[derive(Debug, Default, PartialEq)]
pub struct SceneSequence {
    pub key_objects: BTreeSet<String>,
    pub recurring_objects: BTreeSet<String>,
    pub transitions: Vec<f64>,
}

pub fn summarize_sequence(scenes: &[SceneAnnotation]) -> SceneSequence {
    let mut sequence = SceneSequence::default();
    let mut previous: Option<&SceneAnnotation> = None;

    for scene in scenes {
        sequence
            .key_objects
            .extend(scene.detected_objects.iter().cloned());

        if let Some(prev) = previous {
            sequence.recurring_objects.extend(
                scene
                    .detected_objects
                    .intersection(&prev.detected_objects)
                    .cloned(),
            );
            if scene.timestamp_seconds - prev.timestamp_seconds > SCENE_TRANSITION_GAP_SECONDS {
                sequence.transitions.push(scene.timestamp_seconds);
            }
        }
        previous = Some(scene);
    }

    sequence
}

fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn or_placeholder(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { "(none)" } else { value }
}

pub fn build_system_prompt(style: CommentaryStyle) -> String {
    format!("{}\n\n{}", BASE_SYSTEM_PROMPT, style.profile().persona)
}

pub struct PromptBuilder<'a> {
    metadata: &'a VideoMetadata,
    scenes: &'a [SceneAnnotation],
    style: CommentaryStyle,
    language: Language,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(
        metadata: &'a VideoMetadata,
        scenes: &'a [SceneAnnotation],
        style: CommentaryStyle,
        language: Language,
    ) -> Self {
        Self {
            metadata,
            scenes,
            style,
            language,
        }
    }

    pub fn build(&self) -> NarrationPrompt {
        let video_duration = self.metadata.duration_seconds.max(0.0);
        let target = target_duration(video_duration);
        let max_words = word_budget(target, self.language);

        NarrationPrompt {
            system: build_system_prompt(self.style),
            user: self.user_prompt(video_duration, target, max_words),
            target_duration_seconds: target,
            max_words,
        }
    }

    fn visual_context(&self) -> String {
        let digest = format_scene_digest(self.scenes);
        if digest.is_empty() {
            return "(no scene annotations available)".to_string();
        }

        let sequence = summarize_sequence(self.scenes);
        let mut context = digest;
        if !sequence.key_objects.is_empty() {
            context.push_str(&format!(
                "\nKey objects: {}",
                join_set(&sequence.key_objects)
            ));
        }
        if !sequence.recurring_objects.is_empty() {
            context.push_str(&format!(
                "\nRecurring elements: {}",
                join_set(&sequence.recurring_objects)
            ));
        }
        if !sequence.transitions.is_empty() {
            let at: Vec<String> = sequence
                .transitions
                .iter()
                .map(|t| format!("{:.1}s", t))
                .collect();
            context.push_str(&format!("\nScene transitions at: {}", at.join(", ")));
        }
        context
    }

    fn user_prompt(&self, video_duration: f64, target: f64, max_words: usize) -> String {
        let mut prompt = format!(
            r#"Generate {language} commentary for this video, using its text content as the primary context.

PRIMARY CONTEXT:
Title: {title}
Description: {description}
On-screen text: {on_screen_text}

SUPPORTING VISUAL CONTEXT:
{visual}

STRICT DURATION CONSTRAINTS:
- Video duration: {video_duration:.1} seconds
- Target duration: {target:.1} seconds
- Maximum words: {max_words} words
- DO NOT EXCEED these limits!

REQUIREMENTS:
1. Keep the commentary SHORTER than the video
2. Base it on the video's own text and description, enhanced by the visual details
3. Reference specific details from the video
4. Create natural transitions between topics
5. Vary the tone with the content and keep it authentic
6. Write it to be spoken aloud, in {language}

{guidance}"#,
            language = self.language.name(),
            title = or_placeholder(&self.metadata.title),
            description = or_placeholder(&self.metadata.description),
            on_screen_text = or_placeholder(&self.metadata.on_screen_text),
            visual = self.visual_context(),
            guidance = self.style.profile().guidance,
        );

        if self.language == Language::Urdu {
            prompt.push_str("\n\n");
            prompt.push_str(URDU_REQUIREMENTS);
        }

        prompt
    }
}
