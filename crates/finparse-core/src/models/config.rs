//! Configuration structures for the client and the CLI.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FinparseError, Result};
use crate::pdf::PageOptions;

/// Main configuration for finparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinparseConfig {
    /// API access.
    pub api: ApiConfig,

    /// Page cutting applied to PDF inputs before upload.
    pub pages: PagesConfig,

    /// Per-request flags.
    pub parse: ParseConfig,
}

/// API access configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without the `/products/...` part.
    pub base_url: String,

    /// API key. Takes precedence over the environment variable.
    pub api_key: Option<String>,

    /// Environment variable read when `api_key` is unset.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mindee.net/v1".to_string(),
            api_key: None,
            api_key_env: "FINPARSE_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ApiConfig {
    /// Explicit key first, then `lookup(api_key_env)`. Blank keys count as unset.
    pub fn resolve_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let not_blank = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(not_blank)
            .or_else(|| lookup(&self.api_key_env).filter(not_blank))
    }
}

/// Page cutting configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Cut pages on every parse call.
    pub enabled: bool,

    #[serde(flatten)]
    pub options: PageOptions,
}

/// Request flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Return the full OCR word list.
    pub include_words: bool,

    /// Detect and crop multiple documents on one image.
    pub cropper: bool,
}

impl FinparseConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            FinparseError::Config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// API key from the config or the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api.resolve_key_with(|name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PageOperation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = FinparseConfig::default();
        assert_eq!(config.api.base_url, "https://api.mindee.net/v1");
        assert_eq!(config.api.timeout_secs, 120);
        assert!(!config.pages.enabled);
        assert_eq!(config.pages.options, PageOptions::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FinparseConfig::default();
        config.api.api_key = Some("secret".to_string());
        config.pages.enabled = true;
        config.pages.options = PageOptions::new(vec![0, -1], PageOperation::Remove).with_min_pages(3);
        config.save(&path).unwrap();

        assert_eq!(FinparseConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "pages": { "operation": "REMOVE" } }"#).unwrap();

        let config = FinparseConfig::from_file(&path).unwrap();
        assert_eq!(config.pages.options.operation, PageOperation::Remove);
        assert_eq!(config.pages.options.page_indices, vec![0]);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FinparseConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, FinparseError::Config(_)));
    }

    #[test]
    fn test_api_key_resolution() {
        let mut api = ApiConfig::default();
        assert_eq!(api.resolve_key_with(|_| None), None);
        assert_eq!(
            api.resolve_key_with(|name| (name == "FINPARSE_API_KEY").then(|| "from-env".to_string())),
            Some("from-env".to_string())
        );

        api.api_key = Some("explicit".to_string());
        assert_eq!(
            api.resolve_key_with(|_| Some("from-env".to_string())),
            Some("explicit".to_string())
        );

        api.api_key = Some("  ".to_string());
        assert_eq!(api.resolve_key_with(|_| None), None);
    }
}
