use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::NarrationError;

/// Writing system a narration language is expected to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Arabic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ur")]
    Urdu,
}

const ENGLISH_PUNCTUATION: &[char] = &['.', ',', '!', '?'];
const URDU_PUNCTUATION: &[char] = &['۔', '،', '؟', '!'];

// Counted as in-script for Latin text alongside ASCII letters.
const LATIN_INLINE_PUNCTUATION: &[char] = &['.', ',', '!', '?', '\'', '"', '-'];

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Urdu];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Urdu => "ur",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Urdu => "Urdu",
        }
    }

    /// BCP-47 tag used in speech markup
    pub fn locale(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Urdu => "ur-PK",
        }
    }

    pub fn script(&self) -> Script {
        match self {
            Language::English => Script::Latin,
            Language::Urdu => Script::Arabic,
        }
    }

    /// Terminal and clause punctuation a well-formed text must contain at least one of
    pub fn punctuation(&self) -> &'static [char] {
        match self {
            Language::English => ENGLISH_PUNCTUATION,
            Language::Urdu => URDU_PUNCTUATION,
        }
    }

    /// Whether `c` belongs to the character range expected for this language
    pub fn is_script_char(&self, c: char) -> bool {
        match self.script() {
            Script::Latin => c.is_ascii_alphabetic() || LATIN_INLINE_PUNCTUATION.contains(&c),
            Script::Arabic => ('\u{0600}'..='\u{06FF}').contains(&c),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = NarrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "ur" | "urdu" => Ok(Language::Urdu),
            _ => Err(NarrationError::UnsupportedLanguage {
                code: s.to_string(),
            }),
        }
    }
}
