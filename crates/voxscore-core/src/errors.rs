//! Error taxonomy for the scoring pipeline.
//!
//! Three classes with different propagation rules: precondition violations
//! never reach the network, gateway failures are always surfaced to the
//! caller, and parse failures are data (see [`crate::parse::ParseOutcome`])
//! with exactly one recovery attempt before they demote to a reported
//! unscored outcome.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal before any encoding or network work. No artifacts are produced.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("OPENAI_API_KEY is not set for this shell/session")]
    MissingCredential,

    #[error("audio file not found: {}", .0.display())]
    AudioNotFound(PathBuf),

    #[error("unsupported audio format '{extension}': use a .wav or .mp3 file")]
    UnsupportedFormat { extension: String },
}

/// Transport, auth, quota, or protocol failure from the remote call.
///
/// Never swallowed: there is no local fallback scoring. Retry policy lives
/// in the pipeline, not here.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, DNS, TLS, or timeout failure before a response arrived.
    #[error("request to model provider failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("model provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// Provider answered 2xx but the payload had no usable choice.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}
