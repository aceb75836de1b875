use std::path::PathBuf;
use thiserror::Error;

use crate::{
    language::Language,
    provider::{ModelError, ProviderError},
    style::CommentaryStyle,
    validator::ValidationFailure,
};

#[derive(Error, Debug)]
pub enum NarrationError {
    #[error("Generation failed: {style} commentary in {language} (attempt {attempt}) was rejected: {reason}")]
    ContentValidation {
        style: CommentaryStyle,
        language: Language,
        attempt: u32,
        reason: ValidationFailure,
    },

    #[error("Model call failed for {style} commentary in {language} (attempt {attempt}): {source}")]
    ModelCall {
        style: CommentaryStyle,
        language: Language,
        attempt: u32,
        #[source]
        source: ModelError,
    },

    #[error("Model returned an empty response for {style} commentary in {language} (attempt {attempt})")]
    EmptyResponse {
        style: CommentaryStyle,
        language: Language,
        attempt: u32,
    },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Unknown commentary style: {name}")]
    UnknownStyle { name: String },

    #[error("Unsupported language: {code}")]
    UnsupportedLanguage { code: String },

    #[error("Failed to load analysis from {path}: {reason}")]
    AnalysisLoadFailed { path: PathBuf, reason: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl NarrationError {
    /// Attempt number the failure happened on, when it came out of the generation loop
    pub fn attempt(&self) -> Option<u32> {
        match self {
            NarrationError::ContentValidation { attempt, .. }
            | NarrationError::ModelCall { attempt, .. }
            | NarrationError::EmptyResponse { attempt, .. } => Some(*attempt),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NarrationError>;
