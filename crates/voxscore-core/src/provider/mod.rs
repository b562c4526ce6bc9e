//! Model gateway: the capability-only seam to the remote inference service.
//!
//! The trait carries no retry or recovery policy; that lives in
//! [`crate::pipeline`]. Implementations normalize the provider's wire
//! response into [`ModelResponse`] so downstream code never sees raw JSON.

pub mod openai;

use async_trait::async_trait;

use crate::errors::GatewayError;
use crate::prompt::ChatMessage;

/// Completion-status signal carried alongside the generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    /// Generation hit the token budget; the payload is likely cut off.
    Length,
    ContentFilter,
    Unknown,
}

impl FinishReason {
    /// Map the provider's `finish_reason` string.
    pub fn from_wire(reason: Option<&str>) -> Self {
        match reason {
            Some("stop") => FinishReason::Complete,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length-truncated",
            FinishReason::ContentFilter => "content-filtered",
            FinishReason::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of a typed-part content list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePart {
    /// Part discriminator as sent by the provider (`"text"`, `"audio"`, ...).
    pub kind: String,
    /// Present only on text-bearing parts.
    pub text: Option<String>,
}

/// Content shape union. Providers return either a flat string or an ordered
/// list of typed parts; both are modeled explicitly rather than probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseContent {
    Flat(String),
    Parts(Vec<ResponsePart>),
}

/// Normalized model output, consumed only by [`crate::extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub content: Option<ResponseContent>,
    /// Rare fallback: transcript of an audio-modality reply.
    pub audio_transcript: Option<String>,
    pub finish: FinishReason,
}

/// Generation parameters for one call.
#[derive(Debug, Clone, Copy)]
pub struct CallOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Declare the audio output modality in addition to text.
    pub want_audio_out: bool,
}

/// Capability-only interface to the remote inference call.
#[async_trait]
pub trait AudioModelClient: Send + Sync {
    async fn call(
        &self,
        messages: &[ChatMessage],
        opts: &CallOptions,
    ) -> Result<ModelResponse, GatewayError>;

    fn provider_name(&self) -> &'static str;
}
