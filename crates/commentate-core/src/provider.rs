use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error};

use crate::config::NarrationConfig;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing API key for {provider_name}: {env_var} environment variable is not set")]
    MissingApiKey {
        provider_name: String,
        env_var: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid API response: {0}")]
    InvalidApiResponse(serde_json::Value),

    #[error("Empty response")]
    EmptyResponse,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Openai,
    Deepseek,
    Grok,
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-4o-mini",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Deepseek => ProviderConfig {
                api_url: "https://api.deepseek.com/v1/chat/completions",
                model: "deepseek-chat",
                env_var: "DEEPSEEK_API_KEY",
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-2.5-flash",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Openai => "OpenAI",
            Provider::Deepseek => "DeepSeek",
            Provider::Grok => "Grok",
            Provider::Gemini => "Gemini",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String, ProviderError> {
        let config = self.config();
        std::env::var(config.env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider_name: self.name().to_string(),
                env_var: config.env_var.to_string(),
            })
    }
}

/// One request to the language model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// The language-model collaborator: a single request/response call
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints
pub struct ChatCompletionClient {
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(provider: &Provider, config: &NarrationConfig) -> Result<Self, ProviderError> {
        let api_key = provider.validate_api_key()?;
        let provider_config = provider.config();
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| provider_config.model.to_string());

        Self::with_endpoint(provider_config.api_url, model, api_key, config)
    }

    pub fn with_endpoint(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        config: &NarrationConfig,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        debug!(
            model = %self.model,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": request.system_prompt,
                    },
                    {
                        "role": "user",
                        "content": request.user_prompt,
                    },
                ],
                "max_tokens": request.max_tokens,
                "temperature": request.temperature,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Chat completion request failed");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response = response.json::<serde_json::Value>().await?;

        // Extract content from: choices[0].message.content
        let message = &response["choices"][0]["message"];
        let content = if let Some(content) = message["content"].as_str() {
            content.to_string()
        } else if message.is_object() && message["content"].is_null() {
            String::new()
        } else {
            return Err(ModelError::InvalidApiResponse(response));
        };

        if content.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(content)
    }
}
