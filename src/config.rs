//! Addarr configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main addarr configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locale key into the transcript file
    pub language: String,

    /// Path to the transcript YAML file
    #[serde(rename = "transcript-path")]
    pub transcript_path: PathBuf,

    /// Trigger phrases for the command dispatcher
    pub entrypoints: EntrypointsConfig,

    /// Authentication gate configuration
    pub auth: AuthConfig,

    /// Movie backend (Radarr)
    pub radarr: ServiceConfig,

    /// Series backend (Sonarr)
    pub sonarr: ServiceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            transcript_path: PathBuf::from("transcript.yml"),
            entrypoints: EntrypointsConfig::default(),
            auth: AuthConfig::default(),
            radarr: ServiceConfig::default(),
            sonarr: ServiceConfig::sonarr_defaults(),
        }
    }
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that required environment variables and files are in place.
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.radarr.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Radarr API key not found. Set the {} environment variable.",
                self.radarr.api_key_env
            ));
        }
        if std::env::var(&self.sonarr.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Sonarr API key not found. Set the {} environment variable.",
                self.sonarr.api_key_env
            ));
        }
        if !self.transcript_path.exists() {
            return Err(eyre::eyre!(
                "Transcript file not found: {}",
                self.transcript_path.display()
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .addarr.yml
        let local_config = PathBuf::from(".addarr.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/addarr/addarr.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("addarr").join("addarr.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Trigger phrases, matched case-insensitively with or without a leading '/'
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrypointsConfig {
    /// Start the authentication exchange
    pub auth: String,

    /// Start the add flow
    pub add: String,

    /// List every series in the library
    #[serde(rename = "all-series")]
    pub all_series: String,

    /// Show usage help
    pub help: String,
}

impl Default for EntrypointsConfig {
    fn default() -> Self {
        Self {
            auth: "auth".to_string(),
            add: "start".to_string(),
            all_series: "allseries".to_string(),
            help: "help".to_string(),
        }
    }
}

/// Authentication gate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Password users must supply once to get approved
    pub password: String,

    /// Chat ids approved without a password exchange
    #[serde(rename = "approved-chat-ids")]
    pub approved_chat_ids: Vec<i64>,
}

/// One catalog backend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Quality profile applied to every add
    #[serde(rename = "quality-profile-id")]
    pub quality_profile_id: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7878".to_string(),
            api_key_env: "RADARR_API_KEY".to_string(),
            timeout_ms: 10_000,
            quality_profile_id: 1,
        }
    }
}

impl ServiceConfig {
    /// Defaults for the series backend
    pub fn sonarr_defaults() -> Self {
        Self {
            base_url: "http://localhost:8989".to_string(),
            api_key_env: "SONARR_API_KEY".to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.language, "en");
        assert_eq!(config.entrypoints.add, "start");
        assert_eq!(config.radarr.base_url, "http://localhost:7878");
        assert_eq!(config.sonarr.base_url, "http://localhost:8989");
        assert_eq!(config.sonarr.api_key_env, "SONARR_API_KEY");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
language: de
transcript-path: /etc/addarr/transcript.yml

entrypoints:
  auth: login
  add: hinzufuegen

auth:
  password: secret
  approved-chat-ids: [12345, 67890]

radarr:
  base-url: http://radarr.local:7878
  api-key-env: MY_RADARR_KEY
  timeout-ms: 5000
  quality-profile-id: 4
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.language, "de");
        assert_eq!(config.entrypoints.auth, "login");
        assert_eq!(config.auth.password, "secret");
        assert_eq!(config.auth.approved_chat_ids, vec![12345, 67890]);
        assert_eq!(config.radarr.api_key_env, "MY_RADARR_KEY");
        assert_eq!(config.radarr.quality_profile_id, 4);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
language: fr
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.language, "fr");

        // Defaults for unspecified
        assert_eq!(config.entrypoints.add, "start");
        assert_eq!(config.sonarr.base_url, "http://localhost:8989");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addarr.yml");
        fs::write(&path, "language: nl\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.language, "nl");
    }
}
