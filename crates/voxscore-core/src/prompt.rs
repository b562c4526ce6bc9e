//! Prompt assembly for the primary and continuation calls.
//!
//! Pure construction: no I/O, no side effects. The system directive pins the
//! output contract (one JSON object, no prose, no fencing) for both calls;
//! only the user message differs between them.

use serde::Serialize;

use crate::audio::AudioAsset;
use crate::rubric::{METRIC_COUNT, RUBRIC_PROMPT};

/// JSON-only directive sent as the system message on every call.
pub const SYSTEM_PROMPT: &str = "You are an acting-performance evaluator. Return ONLY valid JSON. \
     No prose, no code fences. The JSON must conform to the format described by the user.";

/// Markers bracketing the seeded partial text in the continuation prompt, so
/// the model can tell the already-emitted prefix from the instruction.
pub const PARTIAL_START_MARKER: &str = "PARTIAL_JSON_START";
pub const PARTIAL_END_MARKER: &str = "PARTIAL_JSON_END";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// Wire payload for an `input_audio` content part.
#[derive(Debug, Clone, Serialize)]
pub struct AudioPayload {
    pub data: String,
    pub format: String,
}

/// Tagged content part union: plain text or embedded audio.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    InputAudio { input_audio: AudioPayload },
}

/// Message content is either a flat string (system messages) or an ordered
/// part list (user messages carrying audio).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageBody,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: MessageBody::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageBody::Parts(parts),
        }
    }
}

/// Primary call: system directive plus one user message holding the full
/// rubric and the encoded clip. The asset is borrowed; callers drop it once
/// the messages exist.
pub fn build_primary(asset: &AudioAsset) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user_parts(vec![
            ContentPart::Text {
                text: RUBRIC_PROMPT.to_string(),
            },
            ContentPart::InputAudio {
                input_audio: AudioPayload {
                    data: asset.data.clone(),
                    format: asset.format.wire_name().to_string(),
                },
            },
        ]),
    ]
}

/// Continuation call: resume/complete, not critique. The partial text is
/// seeded verbatim between markers and the model is asked for one complete,
/// merged JSON object with no duplicate keys.
pub fn build_continuation(partial: &str) -> Vec<ChatMessage> {
    let instruction = format!(
        "You previously returned a PARTIAL JSON object. \
         Return a SINGLE, COMPLETE JSON object that merges and completes the result. \
         Do not repeat duplicate keys. \
         Ensure the final JSON includes all required fields and {METRIC_COUNT} rubric metrics. \
         Return ONLY valid JSON. No prose."
    );
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user_parts(vec![
            ContentPart::Text { text: instruction },
            ContentPart::Text {
                text: format!("{PARTIAL_START_MARKER}\n{partial}\n{PARTIAL_END_MARKER}"),
            },
        ]),
    ]
}
