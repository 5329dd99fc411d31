use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DocentError, Result};

/// Top-level configuration for the Docent application.
///
/// Loaded from `~/.docent/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocentConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl DocentConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DocentConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Validate settings that must be correct before the application starts.
    ///
    /// Backend requests are built from `backend.base_url` on every turn, so a
    /// missing or malformed value is rejected here rather than per-request.
    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            return Err(DocentError::Config(
                "backend.base_url must be set".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DocentError::Config(format!(
                "backend.base_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(DocentError::Config(
                "backend.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// API server port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 3978,
            log_level: "info".to_string(),
        }
    }
}

/// Backend document API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the document API (extract/process/select/answer).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Turn classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Leading token that routes a message to the upload pipeline.
    pub upload_token: String,
    /// Leading token that routes a message to the question pipeline.
    pub question_token: String,
    /// Trim surrounding whitespace before matching tokens.
    pub trim_input: bool,
    /// Match tokens case-insensitively.
    pub case_insensitive: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            upload_token: "upload".to_string(),
            question_token: "question".to_string(),
            trim_input: true,
            case_insensitive: true,
        }
    }
}

/// Upload pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Attachment content types accepted for upload. Empty accepts anything.
    pub accepted_content_types: Vec<String>,
    /// Maximum length in bytes of the extracted-text preview reply.
    pub preview_max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_content_types: vec!["application/pdf".to_string()],
            preview_max_bytes: 500,
        }
    }
}
