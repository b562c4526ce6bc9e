//! Response extraction: fold every provider content shape into one string.
//!
//! This is the only component aware of response-shape variance. It never
//! fails: a well-formed empty response yields empty text with the finish
//! status carried through unchanged.

use crate::provider::{FinishReason, ModelResponse, ResponseContent};

/// The extractor's output: text is never null, even when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub finish: FinishReason,
}

/// Normalize a [`ModelResponse`] into [`ExtractedText`].
///
/// Flat string content wins when non-blank; otherwise text-bearing parts are
/// concatenated in order (non-text parts ignored); otherwise the audio
/// transcript fallback; otherwise empty.
pub fn extract(response: ModelResponse) -> ExtractedText {
    let finish = response.finish;

    let text = match response.content {
        Some(ResponseContent::Flat(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(ResponseContent::Parts(parts)) => {
            let joined = parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            if joined.is_empty() {
                response.audio_transcript.unwrap_or_default()
            } else {
                joined
            }
        }
        _ => response.audio_transcript.unwrap_or_default(),
    };

    ExtractedText { text, finish }
}
