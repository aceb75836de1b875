//! Language-conformance checks for generated narration.

use thiserror::Error;
use tracing::{debug, warn};

use crate::language::Language;

/// Minimum share of non-whitespace characters that must belong to the target script
pub const MIN_SCRIPT_RATIO: f64 = 0.8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    #[error("empty text after cleaning")]
    Empty,

    #[error("{language} character ratio {ratio:.2} is below {min:.2}", min = MIN_SCRIPT_RATIO)]
    ScriptRatio { language: Language, ratio: f64 },

    #[error("text lacks {language} punctuation marks")]
    MissingPunctuation { language: Language },
}

/// Drop control characters, keeping printable characters and whitespace
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}

/// Share of non-whitespace characters of `text` that belong to the script of `language`
pub fn script_ratio(text: &str, language: Language) -> f64 {
    let (in_script, total) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(hits, total), c| {
            (hits + usize::from(language.is_script_char(c)), total + 1)
        });

    if total == 0 {
        return 0.0;
    }
    in_script as f64 / total as f64
}

/// Validate generated text for `language`, returning the cleaned copy downstream
/// stages must use instead of the raw model output.
pub fn validate(text: &str, language: Language) -> Result<String, ValidationFailure> {
    let cleaned = strip_control_chars(text);
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(ValidationFailure::Empty);
    }

    let ratio = script_ratio(cleaned, language);
    if ratio < MIN_SCRIPT_RATIO {
        warn!(%language, ratio, "Text may not be proper {}", language.name());
        return Err(ValidationFailure::ScriptRatio { language, ratio });
    }

    if !cleaned.contains(language.punctuation()) {
        warn!(%language, "Text lacks {} punctuation marks", language.name());
        return Err(ValidationFailure::MissingPunctuation { language });
    }

    debug!(%language, ratio, chars = cleaned.chars().count(), "Text passed validation");
    Ok(cleaned.to_string())
}
