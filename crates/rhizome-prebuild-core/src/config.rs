//! User configuration from ~/.config/prebuild/config.toml

use serde::Deserialize;
use std::path::PathBuf;

/// User configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Logging preferences.
    pub log: LogConfig,
    /// Where tools place their output.
    pub layout: BuildLayout,
}

/// Logging preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default log level when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Directories, relative to the package root, handed to tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildLayout {
    /// Root of generated sources.
    pub generated_dir: PathBuf,
    /// Root of per-tool caches.
    pub cache_dir: PathBuf,
}

impl Default for BuildLayout {
    fn default() -> Self {
        Self {
            generated_dir: PathBuf::from("generated"),
            cache_dir: PathBuf::from("target").join("tool-cache"),
        }
    }
}

/// Errors that can occur when reading a config file explicitly.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl UserConfig {
    /// Load user config from default path (~/.config/prebuild/config.toml).
    ///
    /// A missing or malformed file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.is_file() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => {
                tracing::debug!(?path, "loaded user config");
                config
            }
            Err(e) => {
                tracing::warn!(?path, error = %e, "failed to load user config, using defaults");
                Self::default()
            }
        }
    }

    /// Load user config from a specific path.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Get the default config path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("prebuild").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml = r#"
            [log]
            level = "debug"

            [layout]
            generated_dir = "src/gen"
        "#;

        let config: UserConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.layout.generated_dir, PathBuf::from("src/gen"));
        assert_eq!(config.layout.cache_dir, PathBuf::from("target/tool-cache"));
    }

    #[test]
    fn default_config() {
        let config = UserConfig::default();
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.layout, BuildLayout::default());
    }

    #[test]
    fn from_path_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[log\nlevel = 1").unwrap();

        let err = UserConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
