//! Configuration loading for the cacher.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// Failed to create a configured directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Resolved configuration consumed by the retrieval loop.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider API credential.
    pub api_key: String,
    /// Daily hard cap on provider calls.
    pub daily_call_cap: u32,
    /// Pause applied when the pacing rule trips.
    pub pace_wait: Duration,
    /// Delay between full passes over the universe.
    pub pass_interval: Duration,
    /// Root of the durable cache tree.
    pub cache_root: PathBuf,
    /// Directory holding per-ticker cache artifacts.
    pub data_dir: PathBuf,
    /// Directory receiving completion checkpoint backups.
    pub backup_dir: PathBuf,
    /// Durable quota ledger file.
    pub ledger_file: PathBuf,
    /// Durable completion record file.
    pub completion_file: PathBuf,
    /// Optional universe file; the built-in list is used when absent.
    pub universe_file: Option<PathBuf>,
}

#[derive(Deserialize)]
struct RawConfig {
    api: ApiSection,
    #[serde(default)]
    limits: LimitsSection,
    #[serde(default)]
    pacing: PacingSection,
    #[serde(default)]
    cache: CacheSection,
    #[serde(default)]
    universe: UniverseSection,
}

#[derive(Deserialize)]
struct ApiSection {
    api_key: String,
}

#[derive(Deserialize)]
#[serde(default)]
struct LimitsSection {
    daily_call_cap: u32,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            daily_call_cap: 500,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct PacingSection {
    wait_secs: u64,
    pass_interval_secs: u64,
}

impl Default for PacingSection {
    fn default() -> Self {
        Self {
            wait_secs: 61,
            pass_interval_secs: 300,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CacheSection {
    root: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    backup_dir: Option<PathBuf>,
    ledger_file: Option<PathBuf>,
    completion_file: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct UniverseSection {
    file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Only `[api] api_key` is required; every other field has a default.
    /// Path fields default to locations under the cache root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let cache_root = raw.cache.root.unwrap_or_else(Self::default_cache_root);

        Ok(Self {
            api_key: raw.api.api_key,
            daily_call_cap: raw.limits.daily_call_cap,
            pace_wait: Duration::from_secs(raw.pacing.wait_secs),
            pass_interval: Duration::from_secs(raw.pacing.pass_interval_secs),
            data_dir: raw.cache.data_dir.unwrap_or_else(|| cache_root.join("data")),
            backup_dir: raw
                .cache
                .backup_dir
                .unwrap_or_else(|| cache_root.join("backups")),
            ledger_file: raw
                .cache
                .ledger_file
                .unwrap_or_else(|| cache_root.join("api_count.txt")),
            completion_file: raw
                .cache
                .completion_file
                .unwrap_or_else(|| cache_root.join("completed.txt")),
            universe_file: raw.universe.file,
            cache_root,
        })
    }

    /// Returns the default configuration file path.
    ///
    /// Uses the platform configuration directory (e.g.
    /// `~/.config/stockpile/stockpile.toml` on Linux), falling back to a
    /// path under `~/.stockpile`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "stockpile")
            .map_or_else(dirs_fallback, |proj_dirs| {
                proj_dirs.config_dir().to_path_buf()
            })
            .join("stockpile.toml")
    }

    /// Returns the default cache root.
    ///
    /// Uses the platform data directory (e.g. `~/.local/share/stockpile`
    /// on Linux), falling back to `~/.stockpile` when it cannot be
    /// determined.
    #[must_use]
    pub fn default_cache_root() -> PathBuf {
        ProjectDirs::from("", "", "stockpile").map_or_else(dirs_fallback, |proj_dirs| {
            proj_dirs.data_dir().to_path_buf()
        })
    }

    /// Creates the cache root, data, and backup directories if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        for path in [&self.cache_root, &self.data_dir, &self.backup_dir] {
            if !path.exists() {
                fs::create_dir_all(path).map_err(|e| ConfigError::CreateDir {
                    path: path.clone(),
                    source: e,
                })?;
            }
        }
        Ok(())
    }
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".stockpile")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let file = write_config("[api]\napi_key = \"demo\"\n");
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api_key, "demo");
        assert_eq!(config.daily_call_cap, 500);
        assert_eq!(config.pace_wait, Duration::from_secs(61));
        assert_eq!(config.pass_interval, Duration::from_secs(300));
        assert_eq!(config.data_dir, config.cache_root.join("data"));
        assert_eq!(config.ledger_file, config.cache_root.join("api_count.txt"));
        assert_eq!(
            config.completion_file,
            config.cache_root.join("completed.txt")
        );
        assert!(config.universe_file.is_none());
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            r#"
            [api]
            api_key = "secret"

            [limits]
            daily_call_cap = 25

            [pacing]
            wait_secs = 5
            pass_interval_secs = 10

            [cache]
            root = "/var/cache/stockpile"
            data_dir = "/var/cache/stockpile/docs"

            [universe]
            file = "/etc/stockpile/universe.txt"
            "#,
        );
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.daily_call_cap, 25);
        assert_eq!(config.pace_wait, Duration::from_secs(5));
        assert_eq!(config.cache_root, PathBuf::from("/var/cache/stockpile"));
        assert_eq!(config.data_dir, PathBuf::from("/var/cache/stockpile/docs"));
        assert_eq!(
            config.backup_dir,
            PathBuf::from("/var/cache/stockpile/backups")
        );
        assert_eq!(
            config.universe_file.as_deref(),
            Some(Path::new("/etc/stockpile/universe.txt"))
        );
    }

    #[test]
    fn test_missing_api_key_is_error() {
        let file = write_config("[limits]\ndaily_call_cap = 10\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/stockpile.toml")),
            Err(ConfigError::ReadFile { .. })
        ));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().join("cache");
        let file = write_config(&format!(
            "[api]\napi_key = \"demo\"\n[cache]\nroot = \"{}\"\n",
            root.display()
        ));

        let config = Config::load(file.path()).unwrap();
        config.ensure_directories().unwrap();

        assert!(root.exists());
        assert!(root.join("data").exists());
        assert!(root.join("backups").exists());
    }
}
