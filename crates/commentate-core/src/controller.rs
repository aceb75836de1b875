//! Generation loop: prompt, call the model, validate, estimate, and at most one
//! tightened retry when the narration overruns the video.

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    config::NarrationConfig,
    error::{NarrationError, Result},
    language::Language,
    prompt::{NarrationPrompt, PromptBuilder},
    provider::{CompletionRequest, LanguageModel, ModelError},
    speaking_rate::{estimate_duration, word_budget, word_count},
    style::CommentaryStyle,
    types::{GenerationAttempt, NarrationResult, SceneAnnotation, VideoMetadata},
    validator::validate,
};

/// First attempt plus one tightened retry
pub const MAX_ATTEMPTS: u32 = 2;

/// Inputs of a single narration request
#[derive(Debug, Clone, Copy)]
pub struct NarrationRequest<'a> {
    pub metadata: &'a VideoMetadata,
    pub scenes: &'a [SceneAnnotation],
    pub style: CommentaryStyle,
    pub language: Language,
}

#[derive(Debug)]
enum GenerationState {
    Idle,
    Prompting {
        prompt: NarrationPrompt,
        attempt: u32,
    },
    AwaitingModel {
        prompt: NarrationPrompt,
        attempt: u32,
        request: CompletionRequest,
    },
    Validating {
        prompt: NarrationPrompt,
        attempt: u32,
        raw: String,
    },
    EstimatingDuration {
        prompt: NarrationPrompt,
        attempt: GenerationAttempt,
    },
    Tightening {
        prompt: NarrationPrompt,
        attempt: GenerationAttempt,
    },
    Accepted(NarrationResult),
    Failed(NarrationError),
}

impl GenerationState {
    fn name(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::Prompting { .. } => "prompting",
            GenerationState::AwaitingModel { .. } => "awaiting_model",
            GenerationState::Validating { .. } => "validating",
            GenerationState::EstimatingDuration { .. } => "estimating_duration",
            GenerationState::Tightening { .. } => "tightening",
            GenerationState::Accepted(_) => "accepted",
            GenerationState::Failed(_) => "failed",
        }
    }
}

pub struct GenerationController<'m, M: LanguageModel + ?Sized> {
    model: &'m M,
    config: NarrationConfig,
}

impl<'m, M: LanguageModel + ?Sized> GenerationController<'m, M> {
    pub fn new(model: &'m M, config: NarrationConfig) -> Self {
        Self { model, config }
    }

    /// Run one narration request to completion.
    ///
    /// Dropping the returned future cancels an in-flight model call; nothing is
    /// persisted by the controller itself.
    pub async fn run(&self, request: NarrationRequest<'_>) -> Result<NarrationResult> {
        let span = info_span!(
            "narration",
            request_id = %Uuid::new_v4(),
            style = %request.style,
            language = %request.language,
        );
        self.drive(request).instrument(span).await
    }

    async fn drive(&self, request: NarrationRequest<'_>) -> Result<NarrationResult> {
        let video_duration = request.metadata.duration_seconds;
        if !video_duration.is_finite() || video_duration < 0.0 {
            return Err(NarrationError::InvalidInput {
                reason: format!("video duration must be a non-negative number, got {video_duration}"),
            });
        }

        let mut state = GenerationState::Idle;
        loop {
            debug!(state = state.name(), "Generation state");
            state = match state {
                GenerationState::Idle => {
                    let prompt = PromptBuilder::new(
                        request.metadata,
                        request.scenes,
                        request.style,
                        request.language,
                    )
                    .build();
                    info!(
                        video_duration,
                        target_duration = prompt.target_duration_seconds,
                        max_words = prompt.max_words,
                        "Built narration prompt"
                    );
                    GenerationState::Prompting { prompt, attempt: 1 }
                }

                GenerationState::Prompting { prompt, attempt } => {
                    let request = self.completion_request(&prompt, request.style, attempt);
                    GenerationState::AwaitingModel {
                        prompt,
                        attempt,
                        request,
                    }
                }

                GenerationState::AwaitingModel {
                    prompt,
                    attempt,
                    request: completion,
                } => match self.model.complete(&completion).await {
                    Ok(raw) if raw.trim().is_empty() => {
                        GenerationState::Failed(empty_response(&request, attempt))
                    }
                    Ok(raw) => GenerationState::Validating {
                        prompt,
                        attempt,
                        raw,
                    },
                    Err(ModelError::EmptyResponse) => {
                        GenerationState::Failed(empty_response(&request, attempt))
                    }
                    Err(source) => GenerationState::Failed(NarrationError::ModelCall {
                        style: request.style,
                        language: request.language,
                        attempt,
                        source,
                    }),
                },

                GenerationState::Validating {
                    prompt,
                    attempt,
                    raw,
                } => match validate(&raw, request.language) {
                    Ok(text) => {
                        let words = word_count(&text);
                        let estimated = estimate_duration(&text, request.language);
                        GenerationState::EstimatingDuration {
                            attempt: GenerationAttempt {
                                number: attempt,
                                prompt_text: prompt.user.clone(),
                                raw_text: raw,
                                text,
                                word_count: words,
                                estimated_duration_seconds: estimated,
                            },
                            prompt,
                        }
                    }
                    Err(reason) => GenerationState::Failed(NarrationError::ContentValidation {
                        style: request.style,
                        language: request.language,
                        attempt,
                        reason,
                    }),
                },

                GenerationState::EstimatingDuration { prompt, attempt } => {
                    debug!(
                        attempt = attempt.number,
                        words = attempt.word_count,
                        max_words = prompt.max_words,
                        estimated = attempt.estimated_duration_seconds,
                        raw_chars = attempt.raw_text.len(),
                        "Estimated narration duration"
                    );

                    if attempt.estimated_duration_seconds <= video_duration {
                        GenerationState::Accepted(self.accept(&request, attempt, true))
                    } else if attempt.number < MAX_ATTEMPTS {
                        warn!(
                            attempt = attempt.number,
                            estimated = attempt.estimated_duration_seconds,
                            video_duration,
                            "Generated text too long, regenerating"
                        );
                        GenerationState::Tightening { prompt, attempt }
                    } else {
                        warn!(
                            attempt = attempt.number,
                            estimated = attempt.estimated_duration_seconds,
                            video_duration,
                            "Narration still overruns after retry, keeping it as non-compliant"
                        );
                        GenerationState::Accepted(self.accept(&request, attempt, false))
                    }
                }

                GenerationState::Tightening { mut prompt, attempt } => {
                    let seconds = prompt.target_duration_seconds * self.config.tighten_factor;
                    let max_words = word_budget(seconds, request.language);
                    prompt.tighten(max_words, video_duration);
                    info!(max_words, "Tightened word budget for retry");
                    GenerationState::Prompting {
                        prompt,
                        attempt: attempt.number + 1,
                    }
                }

                GenerationState::Accepted(result) => {
                    info!(
                        words = result.word_count,
                        estimated = result.estimated_duration_seconds,
                        compliant = result.is_duration_compliant,
                        attempts = result.attempts,
                        "Narration accepted"
                    );
                    return Ok(result);
                }

                GenerationState::Failed(err) => {
                    warn!(error = %err, "Narration failed");
                    return Err(err);
                }
            };
        }
    }

    fn completion_request(
        &self,
        prompt: &NarrationPrompt,
        style: CommentaryStyle,
        attempt: u32,
    ) -> CompletionRequest {
        let max_tokens = if attempt > 1 {
            self.config.retry_max_tokens
        } else {
            self.config.max_tokens
        };

        CompletionRequest {
            system_prompt: prompt.system.clone(),
            user_prompt: prompt.user.clone(),
            max_tokens,
            temperature: self
                .config
                .temperature
                .unwrap_or(style.profile().temperature),
        }
    }

    fn accept(
        &self,
        request: &NarrationRequest<'_>,
        attempt: GenerationAttempt,
        is_duration_compliant: bool,
    ) -> NarrationResult {
        NarrationResult {
            style: request.style,
            text: attempt.text,
            metadata: request.metadata.clone(),
            estimated_duration_seconds: attempt.estimated_duration_seconds,
            word_count: attempt.word_count,
            language: request.language,
            is_duration_compliant,
            attempts: attempt.number,
        }
    }
}

fn empty_response(request: &NarrationRequest<'_>, attempt: u32) -> NarrationError {
    NarrationError::EmptyResponse {
        style: request.style,
        language: request.language,
        attempt,
    }
}
