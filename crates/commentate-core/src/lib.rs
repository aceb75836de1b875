//! Commentate Core Library
//!
//! Turns an analyzed short video (metadata plus timestamped scene annotations)
//! into a spoken narration script that fits the video's runtime, in a chosen
//! commentary style and language, and paces it with speech markup.

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod language;
pub mod markup;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod speaking_rate;
pub mod style;
pub mod types;
pub mod validator;

// Re-export commonly used items at crate root
pub use cache::{
    get_analysis_path, get_cache_dir, get_commentary_path, get_root_cache_dir, get_script_path,
};
pub use config::NarrationConfig;
pub use controller::{GenerationController, MAX_ATTEMPTS, NarrationRequest};
pub use error::{NarrationError, Result};
pub use format::{format_narration_readable, format_scene_digest, format_timestamp};
pub use language::Language;
pub use pipeline::{
    generate_narration, load_analysis, load_narration, render_script, resolve_language,
    save_analysis, save_narration, save_script,
};
pub use prompt::{NarrationPrompt, PromptBuilder};
pub use provider::{
    ChatCompletionClient, CompletionRequest, LanguageModel, ModelError, Provider, ProviderConfig,
    ProviderError,
};
pub use style::{CommentaryStyle, StyleProfile};
pub use types::{AnalysisInput, GenerationAttempt, NarrationResult, SceneAnnotation, VideoMetadata};
pub use validator::{ValidationFailure, validate};
