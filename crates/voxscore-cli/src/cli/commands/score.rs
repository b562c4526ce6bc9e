//! The `score` command: preconditions, pipeline, persistence, summary.

use std::time::Duration;

use tracing::debug;

use voxscore_core::audio;
use voxscore_core::config::{self, EvalConfig};
use voxscore_core::pipeline::{self, EvalOutcome};
use voxscore_core::provider::openai::OpenAiClient;
use voxscore_core::store::ResultStore;

use crate::cli::args::ScoreArgs;
use crate::exit_codes::{EXIT_GATEWAY, EXIT_PRECONDITION, EXIT_SUCCESS, EXIT_UNSCORED};

/// Console preview cap, in characters.
const PREVIEW_CAP: usize = 1200;

pub async fn run(args: ScoreArgs) -> anyhow::Result<i32> {
    // Preconditions never reach the network: credential first, then the
    // clip itself.
    let api_key = match config::require_api_key(args.api_key.clone()) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(EXIT_PRECONDITION);
        }
    };
    let asset = match audio::encode(&args.audio) {
        Ok(asset) => asset,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(EXIT_PRECONDITION);
        }
    };
    let clip_stem = asset.clip_stem();

    let config = EvalConfig {
        model: args.model,
        api_base: args.api_base,
        max_tokens_primary: args.max_tokens,
        max_tokens_continuation: args.continuation_max_tokens,
        temperature: args.temperature,
        timeout: Duration::from_secs(args.timeout_secs),
        want_audio_out: true,
    };
    debug!(model = %config.model, max_tokens = config.max_tokens_primary, "score config resolved");

    let client = OpenAiClient::new(&config, api_key);
    let store = ResultStore::new(&args.out_dir);

    let outcome = match pipeline::evaluate(&client, &config, asset).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(EXIT_GATEWAY);
        }
    };

    match outcome {
        EvalOutcome::Scored {
            scores,
            text,
            finish,
            gateway_calls,
        } => {
            let path = store.save_scores(&clip_stem, &scores)?;
            println!("Saved JSON to: {}", path.display());
            println!("finish_reason: {finish} (gateway calls: {gateway_calls})");
            println!("\nModel analysis (truncated preview):");
            println!("{}", preview(&text));
            Ok(EXIT_SUCCESS)
        }
        EvalOutcome::Unscored {
            raw_text,
            reason,
            gateway_calls,
        } => {
            let path = store.save_raw(&clip_stem, &raw_text)?;
            eprintln!(
                "could not recover valid JSON after continuation ({reason}, gateway calls: {gateway_calls})"
            );
            println!("Raw output saved to: {}", path.display());
            println!("Inspect it and re-run with a larger --continuation-max-tokens.");
            Ok(EXIT_UNSCORED)
        }
    }
}

/// Bounded preview that respects character boundaries.
fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= PREVIEW_CAP {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(PREVIEW_CAP).collect();
    format!("{cut} ...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_previews_unchanged() {
        assert_eq!(preview("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn long_text_is_capped_with_ellipsis() {
        let long = "x".repeat(PREVIEW_CAP + 100);
        let out = preview(&long);
        assert!(out.ends_with(" ..."));
        assert_eq!(out.chars().count(), PREVIEW_CAP + 4);
    }
}
