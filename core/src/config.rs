//! Handles the configuration of the catalog.
//!
//! this module is responsible for parsing the Discotheque.toml file, and layering environment
//! variables and cli arguments on top of it.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use std::{path::PathBuf, str::FromStr};

use crate::errors::DirectoryError;

pub static DEFAULT_CONFIG: &str = include_str!("../Discotheque.toml");

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// General Catalog Settings
    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// The environment variables are prefixed with `DISCOTHEQUE_`, nested keys are separated
    /// with `__` (e.g. `DISCOTHEQUE_CATALOG__LOG_LEVEL=debug`).
    ///
    /// # Arguments
    ///
    /// * `config` - The path to the config file.
    /// * `db_path` - Overrides the configured database directory.
    /// * `log_level` - Overrides the configured log level.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid.
    #[inline]
    pub fn init(
        config: PathBuf,
        db_path: Option<PathBuf>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(
                Environment::with_prefix("DISCOTHEQUE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(db_path) = db_path {
            settings.catalog.db_path = Some(db_path);
        }

        if let Some(path) = &mut settings.catalog.db_path {
            *path = shellexpand::tilde(&path.to_string_lossy())
                .into_owned()
                .into();
        }

        if let Some(log_level) = log_level {
            settings.catalog.log_level = log_level;
        }

        Ok(settings)
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found, or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
        match crate::get_config_dir() {
            Ok(config_dir) => {
                // if the config directory does not exist, create it
                if !config_dir.exists() {
                    std::fs::create_dir_all(&config_dir)?;
                }
                let config_file = config_dir.join("Discotheque.toml");

                if !config_file.exists() {
                    std::fs::write(&config_file, DEFAULT_CONFIG)?;
                }

                Ok(config_file)
            }
            Err(e) => {
                log::error!("Error: {e}");
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, e))
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CatalogSettings {
    /// The directory the catalog database is stored in.
    /// Defaults to `<data dir>/db`, see [`crate::get_data_dir`].
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// What level of logging to use.
    /// Default is "info".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
}

impl CatalogSettings {
    /// The directory the catalog database should be stored in.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Data`] if no path is configured and the data directory cannot be found.
    #[inline]
    pub fn database_path(&self) -> Result<PathBuf, DirectoryError> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(crate::get_data_dir()?.join("db")),
        }
    }
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for CatalogSettings {
    #[inline]
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
        }
    }
}
