//! Loading answer files and session scripts.
//!
//! `.yaml` / `.yml` files are parsed with `serde_yaml`; everything else is
//! treated as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use udyam_core::AnswerSet;

/// Document syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Detect the format of `path`.
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Read and deserialize a JSON or YAML document.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match Format::of(path) {
        Format::Yaml => serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse YAML {}", path.display())),
        Format::Json => serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON {}", path.display())),
    }
}

/// Load an answer set. Keys are wire keys; unknown keys are an error.
pub fn load_answers(path: &Path) -> Result<AnswerSet> {
    load_document(path)
}
