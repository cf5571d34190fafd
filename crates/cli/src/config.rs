//! CLI configuration
//!
//! Persists the backend URL, bearer token, and default project between
//! invocations. The token lands here from `clouddeck login`; everything
//! else can be overridden per invocation with global flags.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend API base URL
    pub api_url: String,

    /// Bearer token from the last login
    pub token: Option<String>,

    /// Project used when --project is not given
    pub default_project: Option<i64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api".to_string(),
            token: None,
            default_project: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = CliConfig::load(Path::new("/nonexistent/clouddeck/config.toml")).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:8000/api");
        assert!(config.token.is_none());
        assert!(config.default_project.is_none());
    }

    #[test]
    fn test_roundtrip() {
        let dir = std::env::temp_dir().join("clouddeck-config-test");
        let path = dir.join("config.toml");
        let config = CliConfig {
            api_url: "https://deck.example.com/api".to_string(),
            token: Some("tok".to_string()),
            default_project: Some(3),
        };
        config.save(&path).unwrap();
        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded.api_url, config.api_url);
        assert_eq!(loaded.token.as_deref(), Some("tok"));
        assert_eq!(loaded.default_project, Some(3));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
