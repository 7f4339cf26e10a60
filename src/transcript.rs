//! Transcript loading and label resolution
//!
//! The transcript is a YAML table of user-facing strings keyed by locale.
//! Every label the bot ever shows comes from here; a missing locale or key
//! is a deployment error and is reported as such, never papered over with
//! a fallback string.

use eyre::{Context, Result};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

use crate::catalog::MediaKind;

/// Resolved label table for one locale
#[derive(Debug, Clone)]
pub struct Transcript {
    language: String,
    table: Value,
}

impl Transcript {
    /// Load the transcript file and select a locale
    pub fn load<P: AsRef<Path>>(path: P, language: &str) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .context(format!("Failed to read transcript file {}", path.as_ref().display()))?;
        Self::from_str(&content, language)
    }

    /// Parse transcript YAML and select a locale
    pub fn from_str(content: &str, language: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(content).context("Failed to parse transcript file")?;

        let table = root
            .get(language)
            .cloned()
            .ok_or_else(|| eyre::eyre!("Transcript has no '{}' locale", language))?;

        Ok(Self {
            language: language.to_string(),
            table,
        })
    }

    /// Look up a top-level label
    pub fn resolve(&self, key: &str) -> Result<String> {
        self.string_at(&self.table, key)
    }

    /// Look up a label nested under a media kind (This, Success, Failed, Exist)
    pub fn resolve_kind(&self, kind: MediaKind, key: &str) -> Result<String> {
        let nested = self
            .table
            .get(kind.key())
            .ok_or_else(|| eyre::eyre!("Transcript locale '{}' has no '{}' section", self.language, kind.key()))?;
        self.string_at(nested, key)
    }

    /// The localized label for a media kind (used for prompts and matching)
    pub fn kind_label(&self, kind: MediaKind) -> Result<String> {
        self.resolve(kind.label_key())
    }

    fn string_at(&self, table: &Value, key: &str) -> Result<String> {
        table
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| eyre::eyre!("Transcript locale '{}' is missing key '{}'", self.language, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
en:
  Movie: "Movie"
  Serie: "Serie"
  Title: "What is the title?"
  movie:
    This: "This movie?"
    Success: "Movie added!"
"#;

    #[test]
    fn test_resolve_top_level_key() {
        let transcript = Transcript::from_str(SAMPLE, "en").unwrap();
        assert_eq!(transcript.resolve("Title").unwrap(), "What is the title?");
    }

    #[test]
    fn test_resolve_kind_key() {
        let transcript = Transcript::from_str(SAMPLE, "en").unwrap();
        assert_eq!(
            transcript.resolve_kind(MediaKind::Movie, "This").unwrap(),
            "This movie?"
        );
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let transcript = Transcript::from_str(SAMPLE, "en").unwrap();
        let err = transcript.resolve("No results").unwrap_err();
        assert!(err.to_string().contains("No results"));
    }

    #[test]
    fn test_missing_locale_is_an_error() {
        let err = Transcript::from_str(SAMPLE, "de").unwrap_err();
        assert!(err.to_string().contains("de"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.yml");
        fs::write(&path, SAMPLE).unwrap();

        let transcript = Transcript::load(&path, "en").unwrap();
        assert_eq!(transcript.kind_label(MediaKind::Serie).unwrap(), "Serie");
    }
}
