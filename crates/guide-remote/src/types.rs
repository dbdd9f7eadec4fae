use guide_layout::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Response has no guide text")]
    MissingResult,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Please provide medical text")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, RemoteError>;

pub const DEFAULT_MODEL: &str = "gpt-4o";

pub const REGULAR_FONT_URL: &str =
    "https://github.com/google/fonts/raw/main/ofl/amiri/Amiri-Regular.ttf";

pub const BOLD_FONT_URL: &str = "https://github.com/google/fonts/raw/main/ofl/amiri/Amiri-Bold.ttf";

/// Environment variable holding the analysis webhook URL
pub const WEBHOOK_ENV: &str = "NEURO_SORTIE_WEBHOOK";

/// What the analysis backend is asked to read
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    /// Pasted discharge report text
    Text(String),
    /// Publicly reachable URL of a photographed report
    ImageUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub input: AnalysisInput,
    pub language: Language,
    pub model: String,
}

impl AnalysisRequest {
    pub fn text(text: impl Into<String>, language: Language) -> Self {
        Self {
            input: AnalysisInput::Text(text.into()),
            language,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn image_url(url: impl Into<String>, language: Language) -> Self {
        Self {
            input: AnalysisInput::ImageUrl(url.into()),
            language,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Reject a blank report or image URL before anything is sent
    pub fn validate(&self) -> Result<()> {
        let value = match &self.input {
            AnalysisInput::Text(text) => text,
            AnalysisInput::ImageUrl(url) => url,
        };
        if value.trim().is_empty() {
            return Err(RemoteError::EmptyInput);
        }
        Ok(())
    }
}

/// Settings for the network collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub webhook_url: Option<String>,
    pub model: String,
    pub font_dir: PathBuf,
    pub regular_font_url: String,
    pub bold_font_url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            model: DEFAULT_MODEL.to_string(),
            font_dir: PathBuf::from("fonts"),
            regular_font_url: REGULAR_FONT_URL.to_string(),
            bold_font_url: BOLD_FONT_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl RemoteConfig {
    /// Fill a missing webhook URL from the environment
    pub fn with_env(mut self) -> Self {
        if self.webhook_url.is_none() {
            self.webhook_url = std::env::var(WEBHOOK_ENV).ok().filter(|url| !url.is_empty());
        }
        self
    }

    /// Load settings from a JSON file; absent keys keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|e| RemoteError::Config(format!("Failed to parse remote config: {}", e)))?;
        if config.timeout_secs == 0 {
            return Err(RemoteError::Config(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    /// Save the settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RemoteError::Config(format!("Failed to serialize remote config: {}", e)))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_report_is_rejected() {
        for text in ["", "   ", "\n\t \n"] {
            let request = AnalysisRequest::text(text, Language::French);
            assert!(matches!(request.validate(), Err(RemoteError::EmptyInput)));
        }
        let request = AnalysisRequest::image_url(" ", Language::Darija);
        assert!(matches!(request.validate(), Err(RemoteError::EmptyInput)));
    }

    #[test]
    fn test_report_with_text_is_accepted() {
        let request = AnalysisRequest::text("  CRH: AVC ischémique ", Language::French);
        assert!(request.validate().is_ok());
        let request = AnalysisRequest::image_url("https://exemple.ma/crh.jpg", Language::French);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_remote_config_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.json");

        let config = RemoteConfig {
            webhook_url: Some("https://n8n.exemple.ma/webhook/guide".to_string()),
            font_dir: PathBuf::from("/var/cache/neuro-sortie"),
            timeout_secs: 30,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(RemoteConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_remote_config_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.json");
        std::fs::write(&path, r#"{"model": "gpt-4o-mini"}"#).unwrap();

        let config = RemoteConfig::load(&path).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.webhook_url, None);
        assert_eq!(config.regular_font_url, REGULAR_FONT_URL);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_remote_config_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remote.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(RemoteConfig::load(&path), Err(RemoteError::Config(_))));

        std::fs::write(&path, r#"{"timeout_secs": 0}"#).unwrap();
        assert!(matches!(RemoteConfig::load(&path), Err(RemoteError::Config(_))));

        let missing = dir.path().join("absent.json");
        assert!(matches!(RemoteConfig::load(&missing), Err(RemoteError::Io(_))));
    }

    #[test]
    fn test_configured_webhook_wins_over_environment() {
        let config = RemoteConfig {
            webhook_url: Some("https://configured".to_string()),
            ..Default::default()
        }
        .with_env();
        assert_eq!(config.webhook_url.as_deref(), Some("https://configured"));
    }
}
