//! Word-count based estimate of how long a narration takes to speak.

use crate::language::Language;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 150;

/// Urdu narration is delivered more formally, so slower.
pub const URDU_WORDS_PER_MINUTE: u32 = 120;

/// Narration targets this share of the video runtime...
pub const TARGET_DURATION_RATIO: f64 = 0.8;
/// ...or the runtime minus this margin, whichever is larger.
pub const TARGET_DURATION_MARGIN_SECONDS: f64 = 2.0;

pub fn words_per_minute(language: Language) -> u32 {
    match language {
        Language::English => DEFAULT_WORDS_PER_MINUTE,
        Language::Urdu => URDU_WORDS_PER_MINUTE,
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated spoken duration of `text` in seconds
pub fn estimate_duration(text: &str, language: Language) -> f64 {
    let words = word_count(text);
    if words == 0 {
        return 0.0;
    }
    (words as f64 / words_per_minute(language) as f64) * 60.0
}

/// Maximum number of words that fit into `seconds` of speech
pub fn word_budget(seconds: f64, language: Language) -> usize {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    (seconds / 60.0 * words_per_minute(language) as f64).floor() as usize
}

/// Duration the narration should aim for, never longer than the video itself
pub fn target_duration(video_duration: f64) -> f64 {
    let video = video_duration.max(0.0);
    (video * TARGET_DURATION_RATIO)
        .max(video - TARGET_DURATION_MARGIN_SECONDS)
        .min(video)
        .max(0.0)
}
