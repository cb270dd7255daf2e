//! Configuration Management
//!
//! This module loads the optional settings that sit next to the command line:
//! the database host, where to find a password, and the report thresholds.
//!
//! # Configuration Locations
//! - Local: `.mechanic-shop/config.json` (per working directory)
//! - Global: `~/.config/mechanic-shop/config.json` (per user)
//! - Explicit: any path passed with `--config` (replaces the two above)
//!
//! # Resolution Precedence
//! 1. Command-line flags (highest priority, applied by the binary)
//! 2. Local config file
//! 3. Global config file
//! 4. Built-in defaults
//!
//! Files are merged field by field, so a local file that only sets
//! `reports.bill_below` keeps the global `host`.
//!
//! # Example
//! ```json
//! {
//!   "host": "db.shop.local",
//!   "password_env": "SHOP_DB_PASSWORD",
//!   "reports": { "bill_below": 150, "cars_more_than": 10 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{ConnectionConfig, DatabaseType};
use crate::error::{Result, ShopError};

/// Host used when neither a flag nor a config file names one
pub const DEFAULT_HOST: &str = "localhost";

/// Thresholds for the fixed reporting queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportThresholds {
    /// Report 6 lists closed requests billed strictly below this amount
    pub bill_below: i32,

    /// Report 7 lists customers owning strictly more cars than this
    pub cars_more_than: i32,

    /// Report 8 lists cars built strictly before this year...
    pub car_year_before: i32,

    /// ...with a service-request odometer reading strictly below this
    pub odometer_below: i32,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self { bill_below: 100, cars_more_than: 20, car_year_before: 1995, odometer_below: 50000 }
    }
}

/// Report threshold overrides as stored in a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_below: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cars_more_than: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_year_before: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer_below: Option<i32>,
}

/// Contents of one config file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Database host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Environment variable name holding the database password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Report threshold overrides
    #[serde(default)]
    pub reports: ReportOverrides,
}

impl ConfigFile {
    /// Layer `over` on top of `self`; fields set in `over` win
    #[must_use]
    pub fn merge(self, over: Self) -> Self {
        Self {
            host: over.host.or(self.host),
            password_env: over.password_env.or(self.password_env),
            reports: ReportOverrides {
                bill_below: over.reports.bill_below.or(self.reports.bill_below),
                cars_more_than: over.reports.cars_more_than.or(self.reports.cars_more_than),
                car_year_before: over.reports.car_year_before.or(self.reports.car_year_before),
                odometer_below: over.reports.odometer_below.or(self.reports.odometer_below),
            },
        }
    }
}

/// Effective settings for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    /// Database host
    pub host: String,

    /// Environment variable name holding the password (None = empty password)
    pub password_env: Option<String>,

    /// Report thresholds
    pub reports: ReportThresholds,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self::from(ConfigFile::default())
    }
}

impl From<ConfigFile> for ShopConfig {
    fn from(file: ConfigFile) -> Self {
        let defaults = ReportThresholds::default();
        Self {
            host: file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            password_env: file.password_env,
            reports: ReportThresholds {
                bill_below: file.reports.bill_below.unwrap_or(defaults.bill_below),
                cars_more_than: file.reports.cars_more_than.unwrap_or(defaults.cars_more_than),
                car_year_before: file.reports.car_year_before.unwrap_or(defaults.car_year_before),
                odometer_below: file.reports.odometer_below.unwrap_or(defaults.odometer_below),
            },
        }
    }
}

impl ShopConfig {
    /// Resolve the database password
    ///
    /// The password is empty unless `password_env` names a variable, in which
    /// case that variable must be set.
    pub fn password(&self) -> Result<String> {
        match &self.password_env {
            None => Ok(String::new()),
            Some(env_var) => std::env::var(env_var).map_err(|_| {
                ShopError::config_error(format!(
                    "Environment variable {env_var} not found for password"
                ))
            }),
        }
    }

    /// Build the connection parameters for `engine`
    ///
    /// For `SQLite`, `database` is the path of the database file and `port`
    /// and `user` are ignored.
    pub fn connection_config(
        &self,
        engine: DatabaseType,
        database: &str,
        port: u16,
        user: &str,
    ) -> Result<ConnectionConfig> {
        match engine {
            DatabaseType::Postgres => Ok(ConnectionConfig::postgres(
                self.host.clone(),
                port,
                user.to_string(),
                self.password()?,
                database.to_string(),
            )),
            DatabaseType::SQLite => Ok(ConnectionConfig::sqlite(PathBuf::from(database))),
        }
    }
}

/// Get path to local config file (`.mechanic-shop/config.json`)
pub fn local_config_path() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(|e| {
        ShopError::config_error(format!("Could not determine current directory: {e}"))
    })?;

    Ok(current_dir.join(".mechanic-shop").join("config.json"))
}

/// Get path to global config file (`~/.config/mechanic-shop/config.json`)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ShopError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join("mechanic-shop").join("config.json"))
}

/// Load one config file; a missing file yields an empty `ConfigFile`
pub fn load_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| ShopError::config_error(format!("Could not read config file: {e}")))?;

    let file = serde_json::from_str::<ConfigFile>(&contents).map_err(|e| {
        ShopError::config_error(format!("Invalid config file {}: {e}", path.display()))
    })?;

    log::debug!("loaded config from {}", path.display());
    Ok(file)
}

/// Load global then local config, local taking precedence
pub fn load_with_precedence() -> Result<ConfigFile> {
    let global = match global_config_path() {
        Ok(path) => load_file(&path)?,
        // No home directory: behave as if there is no global file
        Err(_) => ConfigFile::default(),
    };
    let local = load_file(&local_config_path()?)?;

    Ok(global.merge(local))
}

/// Resolve the effective configuration
///
/// With `explicit`, only that file is read and it must exist.
pub fn resolve(explicit: Option<&Path>) -> Result<ShopConfig> {
    let file = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ShopError::config_error(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            load_file(path)?
        }
        None => load_with_precedence()?,
    };

    Ok(ShopConfig::from(file))
}
