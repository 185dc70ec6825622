//! Configuration management for streambrowse
//!
//! Handles config file loading/saving and directory resolution.
//! Config is stored at ~/.config/streambrowse/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider opened at startup; first registered provider if unset
    pub default_provider: Option<String>,
    /// Maximum rows a provider materializes per query
    pub listing_limit: Option<usize>,
    /// Directory the files provider scans for media
    pub media_dir: Option<PathBuf>,
    /// Destination directory for downloads
    pub download_dir: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/streambrowse/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("streambrowse").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Resolved media directory: config value, video dir, or cwd
    pub fn media_dir(&self) -> PathBuf {
        self.media_dir
            .clone()
            .or_else(dirs::video_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolved download directory: config value, download dir, or cwd
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Per-query row cap for providers
    pub fn listing_limit(&self) -> usize {
        self.listing_limit.unwrap_or(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.default_provider.is_none());
        assert_eq!(config.listing_limit(), 50);
    }

    #[test]
    fn test_dir_overrides() {
        let config = Config {
            media_dir: Some(PathBuf::from("/tmp/media")),
            download_dir: Some(PathBuf::from("/tmp/dl")),
            ..Config::default()
        };
        assert_eq!(config.media_dir(), PathBuf::from("/tmp/media"));
        assert_eq!(config.download_dir(), PathBuf::from("/tmp/dl"));
    }

    #[test]
    fn test_roundtrip_toml() {
        let config = Config {
            default_provider: Some("sample".into()),
            listing_limit: Some(25),
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_provider.as_deref(), Some("sample"));
        assert_eq!(parsed.listing_limit(), 25);
    }
}
