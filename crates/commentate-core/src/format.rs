use crate::types::{NarrationResult, SceneAnnotation};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// One digest line per annotation that carries anything, in input order
pub fn format_scene_digest(scenes: &[SceneAnnotation]) -> String {
    scenes
        .iter()
        .filter(|scene| !scene.is_empty())
        .map(|scene| {
            let mut parts = Vec::new();
            if !scene.detected_objects.is_empty() {
                let objects: Vec<&str> =
                    scene.detected_objects.iter().map(String::as_str).collect();
                parts.push(format!("Objects: {}", objects.join(", ")));
            }
            let text = scene.detected_text.trim();
            if !text.is_empty() {
                parts.push(format!("Text: {}", text));
            }
            let description = scene.scene_description.trim();
            if !description.is_empty() {
                parts.push(format!("Scene: {}", description));
            }
            format!(
                "[{}] {:.1}s - {}",
                format_timestamp(scene.timestamp_seconds),
                scene.timestamp_seconds,
                parts.join(" | ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a narration result as human-readable markdown
pub fn format_narration_readable(result: &NarrationResult, script: &str) -> String {
    let mut output = String::new();

    let title = if result.metadata.title.trim().is_empty() {
        "Untitled video"
    } else {
        result.metadata.title.trim()
    };
    output.push_str(&format!("# {}\n\n", title));

    output.push_str(&format!(
        "**Style:** {} | **Language:** {} | **Words:** {} | **Attempts:** {}\n",
        result.style, result.language, result.word_count, result.attempts
    ));
    output.push_str(&format!(
        "**Estimated:** {:.1}s of {:.1}s video{}\n\n",
        result.estimated_duration_seconds,
        result.metadata.duration_seconds,
        if result.is_duration_compliant {
            ""
        } else {
            " (over budget)"
        }
    ));

    output.push_str("## Commentary\n\n");
    output.push_str(&result.text);
    output.push_str("\n\n");

    output.push_str("## Narration Script\n\n");
    output.push_str(script);
    output.push('\n');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        language::Language,
        style::CommentaryStyle,
        types::VideoMetadata,
    };

    fn scene(ts: f64, objects: &[&str], text: &str, description: &str) -> SceneAnnotation {
        SceneAnnotation {
            timestamp_seconds: ts,
            detected_objects: objects.iter().map(|o| o.to_string()).collect(),
            detected_text: text.to_string(),
            scene_description: description.to_string(),
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(75.9), "01:15");
        assert_eq!(format_timestamp(-3.0), "00:00");
    }

    #[test]
    fn test_scene_digest_skips_empty_annotations() {
        let scenes = vec![
            scene(1.0, &["sofa", "cat"], "", "A cat naps"),
            scene(2.5, &[], "", "   "),
            scene(64.0, &[], "SALE 50%", ""),
        ];

        let digest = format_scene_digest(&scenes);
        let lines: Vec<&str> = digest.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[00:01] 1.0s - Objects: cat, sofa | Scene: A cat naps");
        assert_eq!(lines[1], "[01:04] 64.0s - Text: SALE 50%");
    }

    #[test]
    fn test_readable_marks_overrun() {
        let result = NarrationResult {
            style: CommentaryStyle::Documentary,
            text: "A quiet harbor at dawn.".to_string(),
            metadata: VideoMetadata {
                title: String::new(),
                description: String::new(),
                on_screen_text: String::new(),
                duration_seconds: 2.0,
                language: Language::English,
            },
            estimated_duration_seconds: 2.4,
            word_count: 5,
            language: Language::English,
            is_duration_compliant: false,
            attempts: 2,
        };

        let readable = format_narration_readable(&result, "A quiet harbor at dawn.");
        assert!(readable.starts_with("# Untitled video"));
        assert!(readable.contains("(over budget)"));
        assert!(readable.contains("**Attempts:** 2"));
    }
}
