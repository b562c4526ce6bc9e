//! Run configuration.
//!
//! One immutable struct passed into the pipeline entry point; no
//! process-wide globals. The CLI populates it from flags and environment.

use std::time::Duration;

use crate::errors::PreconditionError;

pub const DEFAULT_MODEL: &str = "gpt-4o-audio-preview";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_TOKENS_PRIMARY: u32 = 8000;
/// One-time continuation budget; larger than the primary so a truncated
/// reply has headroom to finish.
pub const DEFAULT_MAX_TOKENS_CONTINUATION: u32 = 9000;
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub model: String,
    pub api_base: String,
    pub max_tokens_primary: u32,
    pub max_tokens_continuation: u32,
    pub temperature: f32,
    pub timeout: Duration,
    /// Audio-preview models require declaring the audio output modality
    /// even when only the text channel is consumed.
    pub want_audio_out: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_tokens_primary: DEFAULT_MAX_TOKENS_PRIMARY,
            max_tokens_continuation: DEFAULT_MAX_TOKENS_CONTINUATION,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            want_audio_out: true,
        }
    }
}

/// Resolve the API credential, checked before any encoding or network work.
///
/// An absent or empty value is a precondition failure, not a mid-pipeline
/// runtime error.
pub fn require_api_key(explicit: Option<String>) -> Result<String, PreconditionError> {
    match explicit {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(PreconditionError::MissingCredential),
    }
}
