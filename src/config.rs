//! Application settings shared by the hub and the standalone tools

mod persistent;

pub use persistent::ConfigFile;

use serde::{Deserialize, Serialize};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{Level, warn};

use crate::constants::config::*;

/// Persistent state saved to the TOML config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// One of error, warn, info, debug, trace
    pub log_level: String,

    /// Directories scanned for `util*.toml` manifests
    pub plugin_dirs: Vec<PathBuf>,

    pub copier: CopierSettings,
    pub lister: ListerSettings,
}

/// Last inputs of the empty file copier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopierSettings {
    pub last_source: String,
    pub last_target: String,
}

/// Last inputs of the filename exporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListerSettings {
    /// Empty means the executable's directory
    pub last_folder: String,
    pub auto_output: bool,
}

impl Default for ListerSettings {
    fn default() -> Self {
        Self {
            last_folder: String::new(),
            auto_output: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            plugin_dirs: default_plugin_dirs(),
            copier: CopierSettings::default(),
            lister: ListerSettings::default(),
        }
    }
}

/// Directory containing the running executable, falling back to `.`
pub fn exe_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `plugins/` beside the executable and in the user config directory
fn default_plugin_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![exe_dir().join(PLUGIN_DIR)];
    if let Some(config) = dirs::config_dir() {
        dirs.push(config.join(APP_DIR).join(PLUGIN_DIR));
    }
    dirs
}

/// Unknown names fall back to INFO
pub fn parse_level(name: &str) -> Level {
    Level::from_str(name.trim()).unwrap_or(Level::INFO)
}

impl AppConfig {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var_os(key));
    }

    /// Apply overrides from `lookup`, the environment in production
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<OsString>) {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level.to_string_lossy().trim().to_string();
        }
        if let Some(dirs) = lookup(ENV_PLUGIN_DIRS) {
            self.plugin_dirs = env::split_paths(&dirs).collect();
        }
    }

    /// Normalise values that would otherwise break startup
    pub fn validate_and_clamp(&mut self) {
        let level = self.log_level.trim().to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            self.log_level = level;
        } else {
            warn!(log_level = %self.log_level, using = DEFAULT_LOG_LEVEL, "unknown log level, using default");
            self.log_level = DEFAULT_LOG_LEVEL.to_string();
        }

        let before = self.plugin_dirs.len();
        self.plugin_dirs.retain(|dir| !dir.as_os_str().is_empty());
        if self.plugin_dirs.len() != before {
            warn!(dropped = before - self.plugin_dirs.len(), "ignoring empty plugin_dirs entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(config.lister.auto_output);
        assert!(config.plugin_dirs[0].ends_with(PLUGIN_DIR));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("log_level = \"debug\"\n[copier]\nlast_source = \"/src\"\n").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.copier.last_source, "/src");
        assert_eq!(config.copier.last_target, "");
        assert!(config.lister.auto_output);
        assert!(!config.plugin_dirs.is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        let joined = env::join_paths(["/opt/a", "/opt/b"]).unwrap();
        config.apply_overrides(lookup(&[
            (ENV_LOG_LEVEL, " trace "),
            (ENV_PLUGIN_DIRS, joined.to_str().unwrap()),
        ]));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.plugin_dirs, vec![PathBuf::from("/opt/a"), PathBuf::from("/opt/b")]);
    }

    #[test]
    fn test_no_env_leaves_config() {
        let mut config = AppConfig::default();
        let before = config.clone();
        config.apply_overrides(lookup(&[]));
        assert_eq!(config, before);
    }

    #[test]
    fn test_validate_and_clamp() {
        let mut config = AppConfig {
            log_level: "LOUD".to_string(),
            plugin_dirs: vec![PathBuf::new(), PathBuf::from("/p")],
            ..AppConfig::default()
        };
        config.validate_and_clamp();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.plugin_dirs, vec![PathBuf::from("/p")]);

        config.log_level = "WARN".to_string();
        config.validate_and_clamp();
        assert_eq!(config.log_level, "warn");
        assert_eq!(parse_level(&config.log_level), Level::WARN);
        assert_eq!(parse_level("bogus"), Level::INFO);
    }
}
