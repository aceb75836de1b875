//! Narration tunables.

use std::time::Duration;

/// Knobs for the generation loop and the model client
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationConfig {
    /// Overrides the provider's default model
    pub model: Option<String>,
    /// Overrides the style's sampling temperature
    pub temperature: Option<f32>,
    /// Token cap for the first attempt
    pub max_tokens: u32,
    /// Token cap for the tightened retry
    pub retry_max_tokens: u32,
    /// Share of the target duration the retry is budgeted for, in (0, 1]
    pub tighten_factor: f64,
    pub request_timeout: Duration,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: None,
            max_tokens: 1000,
            retry_max_tokens: 800,
            tighten_factor: 0.8,
            request_timeout: Duration::from_secs(60),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

impl NarrationConfig {
    /// Create config from `COMMENTATE_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Out-of-range or unparsable values fall back to the default.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            model: lookup("COMMENTATE_MODEL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            temperature: parse_var::<f32>(&lookup, "COMMENTATE_TEMPERATURE")
                .filter(|t| (0.0..=2.0).contains(t)),
            max_tokens: parse_var(&lookup, "COMMENTATE_MAX_TOKENS")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_tokens),
            retry_max_tokens: parse_var(&lookup, "COMMENTATE_RETRY_MAX_TOKENS")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.retry_max_tokens),
            tighten_factor: parse_var::<f64>(&lookup, "COMMENTATE_TIGHTEN_FACTOR")
                .filter(|f| *f > 0.0 && *f <= 1.0)
                .unwrap_or(defaults.tighten_factor),
            request_timeout: parse_var(&lookup, "COMMENTATE_TIMEOUT_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}
