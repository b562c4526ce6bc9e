//! Audio codec: load a local clip and produce a transport-safe payload.
//!
//! Validation happens before any network work: a missing file or an
//! extension outside the `.wav`/`.mp3` allow-set is a precondition failure.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

use crate::errors::PreconditionError;

/// Container formats the gateway's `input_audio` schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Match a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }

    /// Identifier used by the `input_audio` content part.
    pub fn wire_name(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }

    /// MIME-style media subtype.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }
}

/// An encoded clip ready for embedding in a prompt.
///
/// Immutable; built once per run and dropped after the primary prompt is
/// assembled. Nothing downstream retains it.
#[derive(Debug, Clone)]
pub struct AudioAsset {
    pub path: PathBuf,
    pub format: AudioFormat,
    /// Base64 of the raw file bytes.
    pub data: String,
}

impl AudioAsset {
    /// File stem used to derive artifact names.
    pub fn clip_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip".to_string())
    }
}

/// Read and encode the clip at `path`.
///
/// The extension decides the declared format; the file contents are not
/// sniffed. Fails with [`PreconditionError::AudioNotFound`] or
/// [`PreconditionError::UnsupportedFormat`] without touching the network.
pub fn encode(path: &Path) -> Result<AudioAsset, PreconditionError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = AudioFormat::from_extension(&extension)
        .ok_or(PreconditionError::UnsupportedFormat { extension })?;

    let bytes =
        std::fs::read(path).map_err(|_| PreconditionError::AudioNotFound(path.to_path_buf()))?;
    debug!(path = %path.display(), bytes = bytes.len(), format = format.wire_name(), "encoded audio clip");

    Ok(AudioAsset {
        path: path.to_path_buf(),
        format,
        data: BASE64.encode(bytes),
    })
}
