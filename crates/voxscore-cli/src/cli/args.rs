use std::path::PathBuf;

use clap::{Parser, Subcommand};

use voxscore_core::config::{
    DEFAULT_API_BASE, DEFAULT_MAX_TOKENS_CONTINUATION, DEFAULT_MAX_TOKENS_PRIMARY, DEFAULT_MODEL,
};

#[derive(Parser)]
#[command(
    name = "voxscore",
    version,
    about = "Score a recorded audio performance against the Voices Performance Rubric via an audio-capable chat model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score one audio clip and persist the structured result
    Score(ScoreArgs),
    Version,
}

#[derive(Parser, Clone)]
pub struct ScoreArgs {
    /// Audio clip to evaluate (.wav or .mp3 only)
    pub audio: PathBuf,

    /// API credential; checked before any encoding or network work
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Audio-capable chat model
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Token budget for the primary call
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS_PRIMARY)]
    pub max_tokens: u32,

    /// One-time continuation budget; keep it above --max-tokens so a
    /// truncated reply has headroom to finish
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS_CONTINUATION)]
    pub continuation_max_tokens: u32,

    #[arg(long, default_value_t = 0.0)]
    pub temperature: f32,

    /// Per-request timeout in seconds; a timeout surfaces as a gateway
    /// failure and does not trigger the continuation
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    /// Directory for result artifacts
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Provider endpoint override (testing/proxies)
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_parses_with_defaults() {
        let cli = Cli::try_parse_from(["voxscore", "score", "sample.wav"])
            .expect("parse should succeed");

        match cli.cmd {
            Command::Score(args) => {
                assert_eq!(args.audio, PathBuf::from("sample.wav"));
                assert_eq!(args.model, DEFAULT_MODEL);
                assert_eq!(args.max_tokens, DEFAULT_MAX_TOKENS_PRIMARY);
                assert_eq!(args.continuation_max_tokens, DEFAULT_MAX_TOKENS_CONTINUATION);
                assert_eq!(args.temperature, 0.0);
                assert_eq!(args.timeout_secs, 120);
                assert_eq!(args.out_dir, PathBuf::from("."));
            }
            _ => panic!("expected Command::Score"),
        }
    }

    #[test]
    fn score_parses_explicit_values() {
        let cli = Cli::try_parse_from([
            "voxscore",
            "score",
            "take.mp3",
            "--model",
            "gpt-4o-audio-preview",
            "--max-tokens",
            "4000",
            "--continuation-max-tokens",
            "6000",
            "--out-dir",
            "results",
            "--timeout-secs",
            "30",
        ])
        .expect("parse should succeed");

        match cli.cmd {
            Command::Score(args) => {
                assert_eq!(args.max_tokens, 4000);
                assert_eq!(args.continuation_max_tokens, 6000);
                assert_eq!(args.out_dir, PathBuf::from("results"));
                assert_eq!(args.timeout_secs, 30);
            }
            _ => panic!("expected Command::Score"),
        }
    }
}
