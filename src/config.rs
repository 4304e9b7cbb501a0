//! Configuration file handling for trip-ledger.
//!
//! The configuration file is stored at `$TRIP_LEDGER_HOME/config.json` and contains settings such
//! as how many backups to keep and where the trip state file lives.

use crate::backup::Backup;
use crate::store::Store;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "trip-ledger";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const TRIPS_JSON: &str = "trips.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to the home directory and from there it loads `config.json`. It provides paths to
/// other items that are either configurable or are expected in a certain location within the home
/// directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its backups subdirectory, an initial `config.json` with default
    /// settings and an empty trip state file.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if a config file already exists.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        let config = Self {
            root,
            backups,
            config_path,
            config_file,
        };
        let store = config.store();
        if !store.path().exists() {
            store.save(&Default::default()).await?;
        }
        Ok(config)
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The home directory is missing, run 'trip init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'trip init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            backups: root.join(BACKUPS),
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Returns the stored `state_path` if it is absolute, otherwise resolves it against the home
    /// directory.
    pub fn state_path(&self) -> PathBuf {
        let p = self.config_file.state_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    /// Creates a `Store` for reading and writing the trip book.
    pub fn store(&self) -> Store {
        Store::new(self.state_path())
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "trip-ledger",
///   "config_version": 1,
///   "backup_copies": 5,
///   "state_path": "trips.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "trip-ledger"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep per kind of backup
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Path to the trip state file (optional, relative to the home directory or absolute)
    #[serde(skip_serializing_if = "Option::is_none")]
    state_path: Option<PathBuf>,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            state_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config version {} is unsupported. Is a newer version of trip-ledger available?",
            config.config_version
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    #[cfg(test)]
    pub fn new(backup_copies: u32, state_path: Option<PathBuf>) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies,
            state_path,
        }
    }

    /// Gets the state path. If None, defaults to `trips.json`.
    pub fn state_path(&self) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(TRIPS_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("trip_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.backups().is_dir());
        assert!(config.config_path().is_file());
        assert!(config.state_path().is_file());
        assert_eq!(config.state_path(), config.root().join(TRIPS_JSON));
        assert_eq!(config.backup_copies(), BACKUP_COPIES);
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        assert!(Config::create(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.state_path(), loaded.state_path());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_backups() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        tokio::fs::remove_dir(config.backups()).await.unwrap();
        let err = Config::load(dir.path()).await.unwrap_err().to_string();
        assert!(err.contains("backups directory is missing"));
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.backup_copies, 5);
        assert_eq!(config.state_path(), PathBuf::from(TRIPS_JSON));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original = ConfigFile::new(7, Some(PathBuf::from("data/state.json")));
        original.save(&config_path).await.unwrap();
        let loaded = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "trip-ledger",
            "config_version": 1
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config.backup_copies, BACKUP_COPIES);
        assert_eq!(config.state_path(), PathBuf::from(TRIPS_JSON));
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "wrong_app", "config_version": 1 }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_load_newer_version() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{ "app_name": "trip-ledger", "config_version": 99 }"#;
        utils::write(&config_path, json).await.unwrap();

        assert!(ConfigFile::load(&config_path).await.is_err());
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile::new(5, None);
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("state_path"));
    }

    #[tokio::test]
    async fn test_absolute_state_path() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        let elsewhere = dir.path().join("elsewhere.json");
        let file = ConfigFile::new(5, Some(elsewhere.clone()));
        file.save(config.config_path()).await.unwrap();

        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(loaded.state_path(), elsewhere);
    }
}
