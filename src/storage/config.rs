//! Configuration handling
//!
//! Configuration is stored in `oroshi.toml` (current directory) or
//! `~/.config/oroshi/config.toml` (user). The only setting is where the
//! ledger file lives; an explicit path from the CLI always wins.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project-local config file name, looked up in the current directory
const PROJECT_FILE: &str = "oroshi.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the ledger file
    pub ledger: Option<PathBuf>,
}

impl Config {
    /// Loads configuration: project file first, then the user config dir,
    /// then built-in defaults
    pub fn load() -> Result<Self> {
        let project = Path::new(PROJECT_FILE);
        if project.is_file() {
            return Self::from_file(project);
        }

        if let Some(dirs) = ProjectDirs::from("", "", "oroshi") {
            let user = dirs.config_dir().join("config.toml");
            if user.is_file() {
                return Self::from_file(&user);
            }
        }

        Ok(Self::default())
    }

    /// Parses a single config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = toml::from_str(&text)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Resolves the effective ledger path
    ///
    /// Precedence: explicit (flag or env) > configured > default data dir.
    pub fn ledger_path(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Some(path) = &self.ledger {
            return path.clone();
        }
        ProjectDirs::from("", "", "oroshi")
            .map(|dirs| dirs.data_dir().join("ledger.jsonl"))
            .unwrap_or_else(|| PathBuf::from("ledger.jsonl"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_ledger_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oroshi.toml");
        fs::write(&path, "ledger = \"/tmp/shelf.jsonl\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.ledger.as_deref(), Some(Path::new("/tmp/shelf.jsonl")));
    }

    #[test]
    fn empty_config_is_valid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oroshi.toml");
        fs::write(&path, "").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.ledger.is_none());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oroshi.toml");
        fs::write(&path, "ledger = [1, 2]\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn explicit_path_wins() {
        let config = Config {
            ledger: Some(PathBuf::from("/configured/ledger.jsonl")),
        };
        assert_eq!(
            config.ledger_path(Some(Path::new("/explicit/ledger.jsonl"))),
            PathBuf::from("/explicit/ledger.jsonl")
        );
        assert_eq!(
            config.ledger_path(None),
            PathBuf::from("/configured/ledger.jsonl")
        );
    }
}
