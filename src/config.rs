//! Configuration handling for chipin.
//!
//! Everything lives under a home directory (`$CHIPIN_HOME`, `~/chipin` by default). It holds an
//! optional `config.json`, the data directory with one CSV file per project, and the backups of
//! overwritten project files.

use crate::backup::Backup;
use crate::locator::Locator;
use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "chipin";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const DATA: &str = "data";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to the home directory and from there it loads `config.json`, if there is one. It
/// provides the paths of the data and backups directories.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    data_dir: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// This will
    /// - create the home directory if it does not exist and canonicalize it
    /// - load `config.json` if it exists, otherwise use the default settings
    /// - create the data and backups directories if they do not exist
    pub fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        utils::make_dir(&maybe_relative).context("Unable to create the chipin home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path)?
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
            ConfigFile::default()
        };

        let data_dir = resolve(&root, config_file.data_dir());
        let backups = root.join(BACKUPS);
        utils::make_dir(&data_dir)?;
        utils::make_dir(&backups)?;

        Ok(Self {
            root,
            backups,
            data_dir,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a `Locator` for the projects in the data directory.
    pub fn locator(&self) -> Locator {
        Locator::new(&self.data_dir)
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// Writes the current settings to `config.json`.
    pub fn save_file(&self) -> Result<()> {
        self.config_file.save(&self.config_path)
    }
}

/// Returns `p` if it is absolute, otherwise `p` relative to `root`.
fn resolve(root: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        return p;
    }
    root.join(p)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "chipin",
///   "config_version": 1,
///   "data_dir": "data",
///   "backup_copies": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "chipin"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Directory holding the project files (optional, relative to the home directory or
    /// absolute). Defaults to `$CHIPIN_HOME/data` if not specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_dir: Option<PathBuf>,

    /// Number of backup copies to keep per project, 0 disables backups
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_dir: None,
            backup_copies: BACKUP_COPIES,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another application.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data).context("Unable to write config file")
    }

    #[cfg(test)]
    fn new(data_dir: Option<PathBuf>, backup_copies: u32) -> Self {
        Self {
            data_dir,
            backup_copies,
            ..Self::default()
        }
    }

    /// Gets the data directory, `data` if not configured.
    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from(DATA))
    }
}
