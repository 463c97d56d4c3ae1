//! Loading and saving the TOML config file

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::AppConfig;
use crate::constants::config::{APP_DIR, FILENAME};

/// Outcome of reading the config file, before logging is set up
#[derive(Debug)]
pub enum Loaded {
    Existing(AppConfig),
    Missing,
    Invalid(anyhow::Error),
}

impl Loaded {
    pub fn log_level(&self) -> Option<&str> {
        match self {
            Self::Existing(config) => Some(&config.log_level),
            Self::Missing | Self::Invalid(_) => None,
        }
    }
}

/// The config file as it is on disk, without env or CLI overrides.
/// The GUIs write their remembered inputs back through this.
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    /// `None` when the file exists but could not be read or parsed
    stored: Option<AppConfig>,
}

impl ConfigFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn stored(&self) -> Option<&AppConfig> {
        self.stored.as_ref()
    }

    /// Apply `edit` to the stored config and write it back.
    /// An unreadable file is left untouched; returns whether it was written.
    pub fn update(&mut self, edit: impl FnOnce(&mut AppConfig)) -> Result<bool> {
        let Some(stored) = self.stored.as_mut() else {
            warn!(path = %self.path.display(), "config file is unreadable, not saving settings");
            return Ok(false);
        };
        edit(stored);
        stored.save(&self.path)?;
        Ok(true)
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(FILENAME);
        path
    }

    /// Read `path` without logging; pair with [`AppConfig::resolve`]
    pub fn read(path: &Path) -> Loaded {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(config) => Loaded::Existing(config),
                Err(e) => Loaded::Invalid(anyhow::Error::new(e).context(format!(
                    "failed to parse config file {}",
                    path.display()
                ))),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Loaded::Missing,
            Err(e) => Loaded::Invalid(
                anyhow::Error::new(e).context(format!("failed to read config file {}", path.display())),
            ),
        }
    }

    /// Turn a read outcome into the effective config and the file it came from.
    /// A missing file is created with defaults; an invalid one is left alone.
    pub fn resolve(loaded: Loaded, path: &Path) -> (Self, ConfigFile) {
        let stored = match loaded {
            Loaded::Existing(config) => {
                info!(path = %path.display(), "loaded config");
                Some(config)
            }
            Loaded::Missing => {
                let config = Self::default();
                match config.save(path) {
                    Ok(()) => info!(path = %path.display(), "generated default config file"),
                    Err(e) => error!(path = %path.display(), error = ?e, "failed to write default config"),
                }
                Some(config)
            }
            Loaded::Invalid(e) => {
                error!(error = ?e, "config file unusable, falling back to defaults");
                None
            }
        };

        let mut config = stored.clone().unwrap_or_default();
        config.apply_env_overrides();
        config.validate_and_clamp();
        let file = ConfigFile {
            path: path.to_path_buf(),
            stored,
        };
        (config, file)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, contents).with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(())
    }
}
