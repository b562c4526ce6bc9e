//! Contract tests for the bounded evaluation pipeline: call counts, state
//! transitions, and artifact behavior for the canonical end-to-end shapes.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use voxscore_core::audio::{AudioAsset, AudioFormat};
use voxscore_core::config::{self, EvalConfig};
use voxscore_core::errors::{GatewayError, PreconditionError};
use voxscore_core::parse::ParseFailReason;
use voxscore_core::pipeline::{evaluate, EvalOutcome};
use voxscore_core::prompt::{ChatMessage, ContentPart, MessageBody};
use voxscore_core::provider::{
    AudioModelClient, CallOptions, FinishReason, ModelResponse, ResponseContent,
};
use voxscore_core::store::ResultStore;

/// Scripted gateway: pops one canned response per call and counts calls.
struct MockClient {
    responses: Mutex<Vec<ModelResponse>>,
    calls: AtomicU32,
    /// Prompts seen, for asserting continuation seeding.
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockClient {
    fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioModelClient for MockClient {
    async fn call(
        &self,
        messages: &[ChatMessage],
        _opts: &CallOptions,
    ) -> Result<ModelResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(messages.to_vec());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(GatewayError::MalformedResponse(
                "no more scripted responses".into(),
            ));
        }
        Ok(responses.remove(0))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

fn flat(text: &str, finish: FinishReason) -> ModelResponse {
    ModelResponse {
        content: Some(ResponseContent::Flat(text.to_string())),
        audio_transcript: None,
        finish,
    }
}

fn asset(format: AudioFormat) -> AudioAsset {
    let name = match format {
        AudioFormat::Wav => "sample.wav",
        AudioFormat::Mp3 => "sample.mp3",
    };
    AudioAsset {
        path: PathBuf::from(name),
        format,
        data: "QUJD".to_string(),
    }
}

fn user_texts(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .filter_map(|m| match &m.content {
            MessageBody::Parts(parts) => Some(parts),
            MessageBody::Text(_) => None,
        })
        .flatten()
        .filter_map(|p| match p {
            ContentPart::Text { text } => Some(text.as_str()),
            ContentPart::InputAudio { .. } => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scenario A: clean JSON on the first call. One gateway call, one
/// structured artifact, no raw artifact.
#[tokio::test]
async fn clean_primary_response_scores_in_one_call() {
    let client = MockClient::new(vec![flat(
        r#"{"summary": {"overall_comment": "bright"}, "scores": {}}"#,
        FinishReason::Complete,
    )]);
    let config = EvalConfig::default();

    let outcome = evaluate(&client, &config, asset(AudioFormat::Wav))
        .await
        .unwrap();

    assert_eq!(client.calls(), 1);
    match &outcome {
        EvalOutcome::Scored {
            scores,
            finish,
            gateway_calls,
            ..
        } => {
            assert_eq!(scores["summary"]["overall_comment"], "bright");
            assert_eq!(*finish, FinishReason::Complete);
            assert_eq!(*gateway_calls, 1);
        }
        other => panic!("expected Scored, got {other:?}"),
    }

    let tmp = tempfile::tempdir().unwrap();
    let store = ResultStore::new(tmp.path());
    if let EvalOutcome::Scored { scores, .. } = &outcome {
        store.save_scores("sample", scores).unwrap();
    }
    let files: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert!(!files[0]
        .as_ref()
        .unwrap()
        .path()
        .to_string_lossy()
        .contains("raw"));
}

/// Scenario B: truncated primary, continuation completes. Two calls, the
/// continuation is seeded with the partial, and the result comes from the
/// second reply.
#[tokio::test]
async fn truncated_primary_recovers_via_continuation() {
    let partial = r#"{"summary": {"overall_comment": "warm"}, "scores": {"Pacing / Rhythm": {"score""#;
    let complete =
        r#"{"summary": {"overall_comment": "warm"}, "scores": {"Pacing / Rhythm": {"score": 5}}}"#;
    let client = MockClient::new(vec![
        flat(partial, FinishReason::Length),
        flat(complete, FinishReason::Complete),
    ]);
    let config = EvalConfig::default();

    let outcome = evaluate(&client, &config, asset(AudioFormat::Mp3))
        .await
        .unwrap();

    assert_eq!(client.calls(), 2);
    match outcome {
        EvalOutcome::Scored {
            scores,
            gateway_calls,
            ..
        } => {
            assert_eq!(scores["scores"]["Pacing / Rhythm"]["score"], 5);
            assert_eq!(gateway_calls, 2);
        }
        other => panic!("expected Scored, got {other:?}"),
    }

    let seen = client.seen.lock().unwrap();
    let continuation_text = user_texts(&seen[1]);
    assert!(continuation_text.contains(partial), "continuation must seed the partial verbatim");
    assert!(continuation_text.contains("COMPLETE JSON object"));
}

/// Scenario C: malformed twice. Two calls, unscored outcome carrying the
/// best-available raw text; saving produces only a raw artifact.
#[tokio::test]
async fn double_malformed_reports_failure_without_crashing() {
    let client = MockClient::new(vec![
        flat("not json at all.", FinishReason::Complete),
        flat("still not json.", FinishReason::Complete),
    ]);
    let config = EvalConfig::default();

    let outcome = evaluate(&client, &config, asset(AudioFormat::Wav))
        .await
        .unwrap();

    assert_eq!(client.calls(), 2);
    match &outcome {
        EvalOutcome::Unscored {
            raw_text,
            reason,
            gateway_calls,
        } => {
            assert_eq!(raw_text, "still not json.");
            assert_eq!(*reason, ParseFailReason::Malformed);
            assert_eq!(*gateway_calls, 2);
        }
        other => panic!("expected Unscored, got {other:?}"),
    }

    let tmp = tempfile::tempdir().unwrap();
    let store = ResultStore::new(tmp.path());
    if let EvalOutcome::Unscored { raw_text, .. } = &outcome {
        let path = store.save_raw("sample", raw_text).unwrap();
        assert!(path.to_string_lossy().ends_with(".raw.txt"));
    }
    let files: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

/// Scenario D: a missing credential fails before any encoding or network
/// work: zero gateway calls, zero artifacts.
#[tokio::test]
async fn missing_credential_is_fatal_before_any_call() {
    let client = MockClient::new(vec![]);

    let err = config::require_api_key(None).unwrap_err();
    assert!(matches!(err, PreconditionError::MissingCredential));

    // The pipeline was never entered.
    assert_eq!(client.calls(), 0);
}

/// A second gateway call happens if and only if the first parse failed.
#[tokio::test]
async fn second_call_only_on_parse_failure() {
    // Parse succeeds even though the provider reported a length cut: the
    // state machine transitions on parse outcome alone.
    let client = MockClient::new(vec![flat(r#"{"scores": {}}"#, FinishReason::Length)]);
    let outcome = evaluate(&client, &EvalConfig::default(), asset(AudioFormat::Wav))
        .await
        .unwrap();
    assert_eq!(client.calls(), 1);
    assert!(matches!(outcome, EvalOutcome::Scored { .. }));

    // Malformed primary forces exactly one more call, then stops.
    let client = MockClient::new(vec![
        flat("nope", FinishReason::Complete),
        flat("nope again", FinishReason::Complete),
    ]);
    let outcome = evaluate(&client, &EvalConfig::default(), asset(AudioFormat::Wav))
        .await
        .unwrap();
    assert_eq!(client.calls(), 2);
    assert!(matches!(outcome, EvalOutcome::Unscored { .. }));
}

/// Continuation replies wrapped in markdown fencing still recover.
#[tokio::test]
async fn fenced_continuation_reply_is_recovered() {
    let client = MockClient::new(vec![
        flat(r#"{"scores": {"Emotional Clarity""#, FinishReason::Length),
        flat(
            "```json\n{\"scores\": {\"Emotional Clarity\": {\"score\": 4}}}\n```",
            FinishReason::Complete,
        ),
    ]);
    let outcome = evaluate(&client, &EvalConfig::default(), asset(AudioFormat::Mp3))
        .await
        .unwrap();
    match outcome {
        EvalOutcome::Scored { scores, .. } => {
            assert_eq!(scores["scores"]["Emotional Clarity"]["score"], 4);
        }
        other => panic!("expected Scored, got {other:?}"),
    }
}

/// An empty continuation reply falls back to the primary partial as the
/// best-available raw text.
#[tokio::test]
async fn empty_continuation_preserves_primary_partial() {
    let partial = r#"{"scores": {"Subtext / Inner Life""#;
    let client = MockClient::new(vec![
        flat(partial, FinishReason::Length),
        ModelResponse {
            content: None,
            audio_transcript: None,
            finish: FinishReason::Unknown,
        },
    ]);
    let outcome = evaluate(&client, &EvalConfig::default(), asset(AudioFormat::Wav))
        .await
        .unwrap();
    match outcome {
        EvalOutcome::Unscored { raw_text, .. } => assert_eq!(raw_text, partial),
        other => panic!("expected Unscored, got {other:?}"),
    }
}

/// A gateway failure aborts the run without an outcome, so nothing gets
/// persisted mid-flight.
#[tokio::test]
async fn gateway_error_aborts_without_outcome() {
    let client = MockClient::new(vec![]);
    let err = evaluate(&client, &EvalConfig::default(), asset(AudioFormat::Wav))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::MalformedResponse(_)));
    assert_eq!(client.calls(), 1);
}
