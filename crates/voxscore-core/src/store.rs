//! Result persistence: one artifact per terminal outcome.
//!
//! Scored runs get a pretty-printed JSON file; exhausted-recovery runs get a
//! clearly-suffixed raw-text file so operators can diagnose without
//! re-running. Names derive from the clip identity plus a run timestamp and
//! an existing file is never overwritten.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;
use tracing::info;

/// Suffix marking a raw-text diagnostic artifact.
const RAW_SUFFIX: &str = "raw";

pub struct ResultStore {
    out_dir: PathBuf,
}

impl ResultStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Write the structured scores for `clip_stem`.
    pub fn save_scores(&self, clip_stem: &str, scores: &Value) -> io::Result<PathBuf> {
        let path = self.unique_path(clip_stem, "json")?;
        std::fs::write(&path, serde_json::to_string_pretty(scores)?)?;
        info!(path = %path.display(), "saved scored result");
        Ok(path)
    }

    /// Write the best-available raw text after recovery failed.
    pub fn save_raw(&self, clip_stem: &str, text: &str) -> io::Result<PathBuf> {
        let path = self.unique_path(clip_stem, &format!("{RAW_SUFFIX}.txt"))?;
        std::fs::write(&path, text)?;
        info!(path = %path.display(), "saved raw output for inspection");
        Ok(path)
    }

    /// `<out_dir>/<stem>_<timestamp>.<ext>`, with a numeric suffix when two
    /// runs land in the same second.
    fn unique_path(&self, stem: &str, ext: &str) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.out_dir)?;
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let base = format!("{stem}_{stamp}");

        let candidate = self.out_dir.join(format!("{base}.{ext}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
        for n in 1.. {
            let candidate = self.out_dir.join(format!("{base}_{n}.{ext}"));
            if !candidate.exists() {
                return Ok(candidate);
            }
        }
        unreachable!("counter loop always yields a free path")
    }
}
