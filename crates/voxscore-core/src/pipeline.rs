//! Continuation controller: the bounded two-call evaluation pipeline.
//!
//! An explicit state machine, not a retry decorator: `Primary` runs the
//! call/extract/parse chain once; a parse failure (either reason) moves to
//! `Recovering`, which seeds a continuation prompt with the partial text and
//! re-runs the chain exactly once. Total gateway invocations per run are one
//! on the happy path and two otherwise, never more. Truncation is a
//! token-budget problem; repeating the same call without a bigger budget
//! would reproduce the same truncation.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::audio::AudioAsset;
use crate::config::EvalConfig;
use crate::errors::GatewayError;
use crate::extract;
use crate::parse::{self, ParseFailReason, ParseOutcome};
use crate::prompt;
use crate::provider::{AudioModelClient, CallOptions, FinishReason};

/// Terminal result of one evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    /// The model's judgment, captured as valid JSON.
    Scored {
        scores: Value,
        /// Text the scores were decoded from, for the console preview.
        text: String,
        finish: FinishReason,
        gateway_calls: u32,
    },
    /// Recovery exhausted; the best-available raw text is preserved for
    /// operator inspection.
    Unscored {
        raw_text: String,
        reason: ParseFailReason,
        gateway_calls: u32,
    },
}

impl EvalOutcome {
    pub fn gateway_calls(&self) -> u32 {
        match self {
            EvalOutcome::Scored { gateway_calls, .. }
            | EvalOutcome::Unscored { gateway_calls, .. } => *gateway_calls,
        }
    }
}

enum RunState {
    Primary,
    /// Carries the primary attempt's partial text for seeding.
    Recovering { partial: String },
    Done(EvalOutcome),
    Failed(EvalOutcome),
}

/// Run the full pipeline for one clip.
///
/// The asset is consumed: once the primary prompt is built, no component
/// downstream retains the audio. A [`GatewayError`] from either call aborts
/// the run without producing an outcome, so nothing is persisted mid-flight.
pub async fn evaluate(
    client: &dyn AudioModelClient,
    config: &EvalConfig,
    asset: AudioAsset,
) -> Result<EvalOutcome, GatewayError> {
    let primary_messages = prompt::build_primary(&asset);
    info!(
        clip = %asset.path.display(),
        model = %config.model,
        provider = client.provider_name(),
        "starting evaluation"
    );
    drop(asset);

    let mut gateway_calls = 0u32;
    let mut state = RunState::Primary;

    let outcome = loop {
        state = match state {
            RunState::Primary => {
                let response = client
                    .call(
                        &primary_messages,
                        &CallOptions {
                            max_tokens: config.max_tokens_primary,
                            temperature: config.temperature,
                            want_audio_out: config.want_audio_out,
                        },
                    )
                    .await?;
                gateway_calls += 1;

                let extracted = extract::extract(response);
                debug!(finish = %extracted.finish, chars = extracted.text.len(), "primary reply extracted");
                match parse::parse(&extracted) {
                    ParseOutcome::Parsed(scores) => RunState::Done(EvalOutcome::Scored {
                        scores,
                        text: extracted.text,
                        finish: extracted.finish,
                        gateway_calls,
                    }),
                    ParseOutcome::Failed { reason, partial } => {
                        warn!(
                            reason = reason.as_str(),
                            finish = %extracted.finish,
                            "primary reply did not parse; attempting one continuation"
                        );
                        RunState::Recovering { partial }
                    }
                }
            }

            RunState::Recovering { partial } => {
                let continuation = prompt::build_continuation(&partial);
                let response = client
                    .call(
                        &continuation,
                        &CallOptions {
                            max_tokens: config.max_tokens_continuation,
                            temperature: config.temperature,
                            want_audio_out: config.want_audio_out,
                        },
                    )
                    .await?;
                gateway_calls += 1;

                let extracted = extract::extract(response);
                match parse::parse(&extracted) {
                    ParseOutcome::Parsed(scores) => {
                        if extracted.finish == FinishReason::Length {
                            warn!("continuation was also cut off; consider raising the continuation token budget");
                        }
                        RunState::Done(EvalOutcome::Scored {
                            scores,
                            text: extracted.text,
                            finish: extracted.finish,
                            gateway_calls,
                        })
                    }
                    ParseOutcome::Failed {
                        reason,
                        partial: continuation_partial,
                    } => {
                        // Best-available text: the continuation attempt when
                        // it produced anything, else the primary partial.
                        let raw_text = if continuation_partial.trim().is_empty() {
                            partial
                        } else {
                            continuation_partial
                        };
                        RunState::Failed(EvalOutcome::Unscored {
                            raw_text,
                            reason,
                            gateway_calls,
                        })
                    }
                }
            }

            RunState::Done(outcome) => {
                info!(gateway_calls = outcome.gateway_calls(), "evaluation scored");
                break outcome;
            }
            RunState::Failed(outcome) => {
                warn!(
                    gateway_calls = outcome.gateway_calls(),
                    "could not recover valid JSON after continuation"
                );
                break outcome;
            }
        };
    };

    Ok(outcome)
}
