//! OpenAI chat-completions implementation of the model gateway.
//!
//! Sends the message list with an `input_audio` content part and declares
//! the response modalities the audio-preview models require. No retries
//! here; a failed call surfaces as [`GatewayError`] and the continuation
//! policy one level up decides what happens next.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{AudioModelClient, CallOptions, FinishReason, ModelResponse, ResponseContent, ResponsePart};
use crate::config::EvalConfig;
use crate::errors::GatewayError;
use crate::prompt::ChatMessage;

/// Output-audio parameters required by the audio-preview models even when
/// only the text channel is consumed.
const AUDIO_OUT_VOICE: &str = "alloy";
const AUDIO_OUT_FORMAT: &str = "wav";

pub struct OpenAiClient {
    model: String,
    api_base: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: &EvalConfig, api_key: String) -> Self {
        Self {
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    fn request_body(&self, messages: &[ChatMessage], opts: &CallOptions) -> serde_json::Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": opts.temperature,
            "max_tokens": opts.max_tokens,
        });
        if opts.want_audio_out {
            body["modalities"] = json!(["text", "audio"]);
            body["audio"] = json!({ "voice": AUDIO_OUT_VOICE, "format": AUDIO_OUT_FORMAT });
        } else {
            body["modalities"] = json!(["text"]);
        }
        body
    }

    /// Normalize the wire payload into the explicit content union.
    fn normalize(payload: &serde_json::Value) -> Result<ModelResponse, GatewayError> {
        let choice = payload
            .pointer("/choices/0")
            .ok_or_else(|| GatewayError::MalformedResponse("response has no choices".into()))?;

        let finish = FinishReason::from_wire(choice.get("finish_reason").and_then(|v| v.as_str()));

        let content = match choice.pointer("/message/content") {
            Some(serde_json::Value::String(s)) => Some(ResponseContent::Flat(s.clone())),
            Some(serde_json::Value::Array(parts)) => Some(ResponseContent::Parts(
                parts
                    .iter()
                    .map(|part| ResponsePart {
                        kind: part
                            .get("type")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string(),
                        text: part
                            .get("text")
                            .and_then(|v| v.as_str())
                            .map(str::to_string),
                    })
                    .collect(),
            )),
            _ => None,
        };

        let audio_transcript = choice
            .pointer("/message/audio/transcript")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(ModelResponse {
            content,
            audio_transcript,
            finish,
        })
    }
}

#[async_trait]
impl AudioModelClient for OpenAiClient {
    async fn call(
        &self,
        messages: &[ChatMessage],
        opts: &CallOptions,
    ) -> Result<ModelResponse, GatewayError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = self.request_body(messages, opts);
        debug!(model = %self.model, max_tokens = opts.max_tokens, "calling chat completions");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = resp.json().await?;
        Self::normalize(&payload)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioAsset, AudioFormat};
    use crate::prompt;

    fn client() -> OpenAiClient {
        OpenAiClient::new(&EvalConfig::default(), "test-key".to_string())
    }

    fn messages() -> Vec<ChatMessage> {
        let asset = AudioAsset {
            path: "sample.wav".into(),
            format: AudioFormat::Wav,
            data: "QUJD".into(),
        };
        prompt::build_primary(&asset)
    }

    #[test]
    fn body_declares_audio_modalities_when_requested() {
        let body = client().request_body(
            &messages(),
            &CallOptions {
                max_tokens: 8000,
                temperature: 0.0,
                want_audio_out: true,
            },
        );
        assert_eq!(body["modalities"], json!(["text", "audio"]));
        assert_eq!(body["audio"]["voice"], "alloy");
        assert_eq!(body["max_tokens"], 8000);
        assert_eq!(body["messages"][1]["content"][1]["type"], "input_audio");
    }

    #[test]
    fn body_is_text_only_when_audio_out_disabled() {
        let body = client().request_body(
            &messages(),
            &CallOptions {
                max_tokens: 100,
                temperature: 0.7,
                want_audio_out: false,
            },
        );
        assert_eq!(body["modalities"], json!(["text"]));
        assert!(body.get("audio").is_none());
    }

    #[test]
    fn normalize_handles_flat_string_content() {
        let payload = json!({
            "choices": [{
                "finish_reason": "stop",
                "message": { "content": "{\"scores\": {}}" }
            }]
        });
        let resp = OpenAiClient::normalize(&payload).unwrap();
        assert_eq!(resp.finish, FinishReason::Complete);
        assert_eq!(
            resp.content,
            Some(ResponseContent::Flat("{\"scores\": {}}".into()))
        );
    }

    #[test]
    fn normalize_handles_part_lists_and_transcript() {
        let payload = json!({
            "choices": [{
                "finish_reason": "length",
                "message": {
                    "content": [
                        { "type": "text", "text": "{\"a\":" },
                        { "type": "audio" }
                    ],
                    "audio": { "transcript": "spoken words" }
                }
            }]
        });
        let resp = OpenAiClient::normalize(&payload).unwrap();
        assert_eq!(resp.finish, FinishReason::Length);
        match resp.content {
            Some(ResponseContent::Parts(parts)) => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[0].text.as_deref(), Some("{\"a\":"));
                assert_eq!(parts[1].kind, "audio");
                assert_eq!(parts[1].text, None);
            }
            other => panic!("expected part list, got {other:?}"),
        }
        assert_eq!(resp.audio_transcript.as_deref(), Some("spoken words"));
    }

    #[test]
    fn normalize_rejects_choiceless_payloads() {
        let payload = json!({ "choices": [] });
        assert!(matches!(
            OpenAiClient::normalize(&payload),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
