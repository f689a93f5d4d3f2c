//! Persisted per-user configuration.
//!
//! Settings live under `~/.bitcart-cli/`:
//! - `config.yml` holds one host repository path per component type
//! - `update_check.yml` holds the timestamp of the last update check
//!
//! An empty host path means "unresolved, ask interactively". Every host field
//! can be overridden with an upper-cased `BITCART_CLI_<FIELD>` environment
//! variable.
//!
//! # Examples
//!
//! ```yaml
//! bitcart_directory: /home/alice/bitcart
//! bitcart_admin_directory: ""
//! bitcart_store_directory: ""
//! bitcart_docker_directory: /home/alice/bitcart-docker
//! ```

use crate::component::ComponentType;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Directory name of the settings root inside the home directory.
pub const SETTINGS_DIR: &str = ".bitcart-cli";

/// File name of the host configuration.
pub const CONFIG_FILE: &str = "config.yml";

/// File name of the update check state.
pub const UPDATE_CHECK_FILE: &str = "update_check.yml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "bitcart_cli";

/// Hours between automatic update checks.
pub const DEFAULT_UPDATE_INTERVAL_HOURS: i64 = 28;

/// Identifier of a host path field in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostField {
    /// Backend host (`bitcart_directory`)
    BitcartDirectory,
    /// Admin frontend host (`bitcart_admin_directory`)
    BitcartAdminDirectory,
    /// Store frontend host (`bitcart_store_directory`)
    BitcartStoreDirectory,
    /// Compose host (`bitcart_docker_directory`)
    BitcartDockerDirectory,
}

impl HostField {
    /// All fields in file order.
    pub const ALL: [Self; 4] = [
        Self::BitcartDirectory,
        Self::BitcartAdminDirectory,
        Self::BitcartStoreDirectory,
        Self::BitcartDockerDirectory,
    ];

    /// Returns the YAML key of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BitcartDirectory => "bitcart_directory",
            Self::BitcartAdminDirectory => "bitcart_admin_directory",
            Self::BitcartStoreDirectory => "bitcart_store_directory",
            Self::BitcartDockerDirectory => "bitcart_docker_directory",
        }
    }

    /// Returns the field that stores the host of `kind`.
    #[must_use]
    pub const fn for_component(kind: ComponentType) -> Self {
        match kind {
            ComponentType::Backend => Self::BitcartDirectory,
            ComponentType::Admin => Self::BitcartAdminDirectory,
            ComponentType::Store => Self::BitcartStoreDirectory,
            ComponentType::Docker => Self::BitcartDockerDirectory,
        }
    }

    /// Returns the environment variable that overrides this field.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitcart_core::config::HostField;
    ///
    /// assert_eq!(
    ///     HostField::BitcartDirectory.env_var("bitcart_cli"),
    ///     "BITCART_CLI_BITCART_DIRECTORY"
    /// );
    /// ```
    #[must_use]
    pub fn env_var(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.as_str()).to_uppercase()
    }
}

impl fmt::Display for HostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::UnknownConfigField(s.to_string()))
    }
}

/// Host repository paths, one per component type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostsConfig {
    /// Backend repository checkout
    #[serde(default)]
    pub bitcart_directory: String,

    /// Admin frontend checkout
    #[serde(default)]
    pub bitcart_admin_directory: String,

    /// Store frontend checkout
    #[serde(default)]
    pub bitcart_store_directory: String,

    /// Compose repository checkout
    #[serde(default)]
    pub bitcart_docker_directory: String,
}

impl HostsConfig {
    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, field: HostField) -> &str {
        match field {
            HostField::BitcartDirectory => &self.bitcart_directory,
            HostField::BitcartAdminDirectory => &self.bitcart_admin_directory,
            HostField::BitcartStoreDirectory => &self.bitcart_store_directory,
            HostField::BitcartDockerDirectory => &self.bitcart_docker_directory,
        }
    }

    /// Replaces the value of a field.
    pub fn set(&mut self, field: HostField, value: impl Into<String>) {
        let slot = match field {
            HostField::BitcartDirectory => &mut self.bitcart_directory,
            HostField::BitcartAdminDirectory => &mut self.bitcart_admin_directory,
            HostField::BitcartStoreDirectory => &mut self.bitcart_store_directory,
            HostField::BitcartDockerDirectory => &mut self.bitcart_docker_directory,
        };
        *slot = value.into();
    }

    /// Sets a field by its YAML key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConfigField`] if `name` is not a host field.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = name.parse::<HostField>()?;
        self.set(field, value);
        Ok(())
    }

    /// Returns the configured host path for `kind`, or `None` when unresolved.
    #[must_use]
    pub fn host_path(&self, kind: ComponentType) -> Option<PathBuf> {
        let value = self.get(HostField::for_component(kind));
        (!value.is_empty()).then(|| PathBuf::from(value))
    }

    /// Records the host path for `kind`.
    pub fn set_host_path(&mut self, kind: ComponentType, path: &Path) {
        self.set(
            HostField::for_component(kind),
            path.to_string_lossy().into_owned(),
        );
    }

    /// Applies environment overrides using a caller-supplied lookup.
    ///
    /// Non-empty values replace the loaded ones; empty values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitcart_core::config::{ENV_PREFIX, HostsConfig};
    ///
    /// let mut config = HostsConfig::default();
    /// config.apply_env_overrides(ENV_PREFIX, |name| {
    ///     (name == "BITCART_CLI_BITCART_DIRECTORY").then(|| "/srv/bitcart".to_string())
    /// });
    /// assert_eq!(config.bitcart_directory, "/srv/bitcart");
    /// ```
    pub fn apply_env_overrides<F>(&mut self, prefix: &str, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for field in HostField::ALL {
            let name = field.env_var(prefix);
            if let Some(value) = lookup(&name).filter(|v| !v.is_empty()) {
                debug!("Overriding {} from {}", field, name);
                self.set(field, value);
            }
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env_overrides(ENV_PREFIX, |name| std::env::var(name).ok());
    }
}

/// Timestamp of the last update check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCheckState {
    /// When the last check ran, if ever
    #[serde(default)]
    pub last_update_check: Option<DateTime<Utc>>,
}

impl UpdateCheckState {
    /// Returns true if at least `interval_hours` passed since the last check.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>, interval_hours: i64) -> bool {
        self.last_update_check
            .is_none_or(|last| now - last >= Duration::hours(interval_hours))
    }

    /// Records a check at `now`.
    pub fn mark_checked(&mut self, now: DateTime<Utc>) {
        self.last_update_check = Some(now);
    }
}

/// On-disk settings root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
}

impl ConfigStore {
    /// Opens the default settings root (`~/.bitcart-cli`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHomeDirectory`] if the home directory is unknown.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
        Ok(Self::with_root(home.join(SETTINGS_DIR)))
    }

    /// Opens a settings root at a custom location.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the settings root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `config.yml`.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Path of `update_check.yml`.
    #[must_use]
    pub fn update_check_path(&self) -> PathBuf {
        self.root.join(UPDATE_CHECK_FILE)
    }

    /// Loads host paths from disk, creating an empty file on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, read or parsed.
    pub fn load_hosts(&self) -> Result<HostsConfig> {
        load_yaml(&self.config_path())
    }

    /// Writes host paths to disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] if the file cannot be written.
    pub fn save_hosts(&self, hosts: &HostsConfig) -> Result<()> {
        save_yaml(&self.config_path(), hosts)
    }

    /// Loads the update check state, creating an empty file on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, read or parsed.
    pub fn load_update_check(&self) -> Result<UpdateCheckState> {
        load_yaml(&self.update_check_path())
    }

    /// Writes the update check state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] if the file cannot be written.
    pub fn save_update_check(&self, state: &UpdateCheckState) -> Result<()> {
        save_yaml(&self.update_check_path(), state)
    }
}

fn load_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    ensure_settings_file(path)?;

    let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if content.trim().is_empty() {
        debug!("Settings file {} is empty, using defaults", path.display());
        return Ok(T::default());
    }

    serde_yaml::from_str(&content).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn save_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let write_err = |reason: String| Error::ConfigWrite {
        path: path.to_path_buf(),
        reason,
    };

    ensure_settings_file(path).map_err(|e| write_err(e.to_string()))?;
    let yaml = serde_yaml::to_string(value).map_err(|e| write_err(e.to_string()))?;
    fs::write(path, yaml).map_err(|e| write_err(e.to_string()))?;

    debug!("Saved settings to {}", path.display());
    Ok(())
}

/// Creates the settings file (0600) and its directory (0700) if missing.
fn ensure_settings_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
        set_mode(dir, 0o700)?;
    }
    fs::File::create(path)?;
    set_mode(path, 0o600)?;

    debug!("Created settings file {}", path.display());
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
