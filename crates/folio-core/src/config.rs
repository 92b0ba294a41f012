//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use folio_session::{SessionConfig, DEFAULT_SESSION_KEY};

use crate::error::CoreError;
use crate::Result;

/// Browsers allot roughly 5 MiB of `sessionStorage` per origin
const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Tab-scoped, lost when the process exits
    Memory {
        #[serde(default)]
        quota_bytes: Option<usize>,
    },
    /// Persisted to a SQLite file
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage key for the session record
    pub session_key: String,
    /// Session expiration window, milliseconds
    pub expiration_ms: u64,
    /// Background sweep period, milliseconds (0 disables it)
    pub sweep_interval_ms: u64,
    pub storage: StorageConfig,
}

impl Config {
    /// Configuration that persists sessions under `data_dir`
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            storage: StorageConfig::Sqlite {
                path: data_dir.join("folio.db"),
            },
            ..Self::default()
        }
    }

    /// SQLite-backed configuration under the platform data directory
    pub fn persistent() -> Self {
        Self::new(Self::data_dir())
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Folio"))
            .unwrap_or_else(|| PathBuf::from(".folio"))
    }

    /// Resolve the startup configuration: `path` if given, otherwise the
    /// persistent default, then `FOLIO_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::persistent(),
        };
        base.with_env()
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FOLIO_*` environment overrides
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("FOLIO_SESSION_KEY") {
            self.session_key = key;
        }
        if let Some(value) = lookup("FOLIO_SESSION_EXPIRATION_MS") {
            self.expiration_ms = parse_millis("FOLIO_SESSION_EXPIRATION_MS", &value)?;
        }
        if let Some(value) = lookup("FOLIO_SWEEP_INTERVAL_MS") {
            self.sweep_interval_ms = parse_millis("FOLIO_SWEEP_INTERVAL_MS", &value)?;
        }
        if let Some(path) = lookup("FOLIO_STORAGE_PATH") {
            self.storage = StorageConfig::Sqlite {
                path: PathBuf::from(path),
            };
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_key.trim().is_empty() {
            return Err(CoreError::Config("session_key cannot be empty".to_string()));
        }
        if self.expiration_ms == 0 {
            return Err(CoreError::Config(
                "expiration_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn expiration(&self) -> Duration {
        Duration::from_millis(self.expiration_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Session manager settings without callbacks
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_session_key(self.session_key.clone())
            .with_expiration_time(self.expiration())
            .with_sweep_interval(self.sweep_interval())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            expiration_ms: 60 * 60 * 1000,
            sweep_interval_ms: 60 * 1000,
            storage: StorageConfig::Memory {
                quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            },
        }
    }
}

fn parse_millis(name: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        CoreError::Config(format!(
            "{} must be a whole number of milliseconds, got '{}'",
            name, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.session_key, "pdf-tools-session");
        assert_eq!(config.expiration(), Duration::from_secs(3600));
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(
            config.storage,
            StorageConfig::Memory {
                quota_bytes: Some(5 * 1024 * 1024)
            }
        );

        let persistent = Config::new(PathBuf::from("/data"));
        assert_eq!(
            persistent.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("/data/folio.db")
            }
        );
    }

    #[test]
    fn test_persistent_default_uses_data_dir() {
        let data_dir = Config::data_dir();
        assert!(data_dir.ends_with("Folio") || data_dir == PathBuf::from(".folio"));

        let config = Config::persistent();
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: data_dir.join("folio.db")
            }
        );
        assert_eq!(config.session_key, "pdf-tools-session");
    }

    #[test]
    fn test_load_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.json");
        std::fs::write(&path, r#"{ "session_key": "from-file" }"#).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        if std::env::var("FOLIO_SESSION_KEY").is_err() {
            assert_eq!(config.session_key, "from-file");
        }

        let missing = Config::load(Some(dir.path().join("absent.json").as_path()));
        assert!(matches!(missing, Err(CoreError::Io(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.json");
        std::fs::write(
            &path,
            r#"{
                "session_key": "merge-tool",
                "expiration_ms": 1800000,
                "storage": { "backend": "sqlite", "path": "/tmp/folio.db" }
            }"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.session_key, "merge-tool");
        assert_eq!(config.expiration(), Duration::from_secs(1800));
        assert_eq!(config.sweep_interval_ms, 60_000);
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("/tmp/folio.db")
            }
        );
    }

    #[test]
    fn test_from_file_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();

        let missing = Config::from_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(CoreError::Io(_))));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(CoreError::Serialization(_))
        ));

        std::fs::write(&path, r#"{ "session_key": "  " }"#).unwrap();
        assert!(matches!(Config::from_file(&path), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("FOLIO_SESSION_KEY", "split-tool"),
            ("FOLIO_SESSION_EXPIRATION_MS", "5000"),
            ("FOLIO_SWEEP_INTERVAL_MS", " 250 "),
            ("FOLIO_STORAGE_PATH", "/var/lib/folio.db"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .with_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.session_key, "split-tool");
        assert_eq!(config.expiration_ms, 5000);
        assert_eq!(config.sweep_interval_ms, 250);
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("/var/lib/folio.db")
            }
        );

        let session = config.session_config();
        assert_eq!(session.session_key, "split-tool");
        assert_eq!(session.expiration_time, Duration::from_secs(5));
        assert_eq!(session.sweep_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_overrides() {
        let bad_number = Config::default().with_overrides(|name| {
            (name == "FOLIO_SESSION_EXPIRATION_MS").then(|| "an hour".to_string())
        });
        assert!(matches!(bad_number, Err(CoreError::Config(_))));

        let zero = Config::default().with_overrides(|name| {
            (name == "FOLIO_SESSION_EXPIRATION_MS").then(|| "0".to_string())
        });
        assert!(matches!(zero, Err(CoreError::Config(_))));
    }
}
