//! Discovery of utility modules

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::hub::builtin;
use crate::hub::console::Console;
use crate::hub::function::{UtilityFunction, UtilityModule};
use crate::hub::manifest::{self, ManifestError};

/// All loaded modules, keyed and listed by name
#[derive(Debug, Default)]
pub struct Registry {
    modules: BTreeMap<String, UtilityModule>,
}

impl Registry {
    /// Built-in modules plus every manifest found directly in `plugin_dirs`.
    /// Progress and load errors are reported on the console.
    pub fn discover(plugin_dirs: &[PathBuf], console: &Console) -> Self {
        let mut registry = Self::default();
        for module in builtin::modules() {
            if let Err(e) = registry.register(module) {
                warn!(error = %e, "built-in module rejected");
            }
        }

        let mut manifests_seen = 0usize;
        for dir in plugin_dirs {
            manifests_seen += registry.scan_dir(dir, console);
        }
        if manifests_seen == 0 {
            console.println("No utility scripts found in plugin directories.");
        }

        console.println(format!("Loaded {} utility modules.", registry.len()));
        info!(modules = registry.len(), manifests = manifests_seen, "utility discovery finished");
        registry
    }

    /// Load the manifests of one directory, returning how many were found
    fn scan_dir(&mut self, dir: &Path, console: &Console) -> usize {
        if !dir.exists() {
            debug!(dir = %dir.display(), "plugin directory does not exist, skipping");
            return 0;
        }
        let paths = match manifest::find_manifests(dir) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to scan plugin directory");
                console.println(format!("Error scanning for utilities: {e}"));
                return 0;
            }
        };

        for path in &paths {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let loaded = manifest::load_module(path).and_then(|module| {
                if module.is_empty() {
                    debug!(file = %file, "manifest exposes no functions, skipping");
                    return Ok(());
                }
                self.register(module)
            });
            if let Err(e) = loaded {
                warn!(file = %file, error = %e, "failed to load utility manifest");
                console.println(format!("Error loading {file}: {e}"));
            }
        }
        paths.len()
    }

    pub fn register(&mut self, module: UtilityModule) -> Result<(), ManifestError> {
        if self.modules.contains_key(&module.name) {
            return Err(ManifestError::Duplicate(module.name));
        }
        debug!(module = %module.name, functions = module.functions().count(), "registered utility module");
        self.modules.insert(module.name.clone(), module);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&UtilityModule> {
        self.modules.get(name)
    }

    pub fn function(&self, module: &str, function: &str) -> Option<&UtilityFunction> {
        self.get(module)?.function(function)
    }

    pub fn modules(&self) -> impl Iterator<Item = &UtilityModule> {
        self.modules.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::console::drain_text;
    use std::fs;
    use tempfile::tempdir;

    const VALID: &str = "description = \"Echo\"\n[[functions]]\nname = \"say\"\nprogram = \"echo\"\n";

    #[test]
    fn test_builtins_without_plugins() {
        let (console, rx) = Console::new();
        let registry = Registry::discover(&[], &console);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["util_converter", "util_file_operations", "util_text_processor"]
        );
        assert!(!registry.is_empty());
        assert_eq!(
            drain_text(&rx),
            "No utility scripts found in plugin directories.\nLoaded 3 utility modules.\n"
        );
    }

    #[test]
    fn test_discovers_manifests_and_reports_errors() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("util_echo.toml"), VALID).unwrap();
        fs::write(dir.path().join("util_broken.toml"), "functions = [").unwrap();
        fs::write(dir.path().join("util_empty.toml"), "description = \"nothing\"\n").unwrap();
        fs::write(dir.path().join("readme.toml"), VALID).unwrap();

        let (console, rx) = Console::new();
        let registry = Registry::discover(&[dir.path().to_path_buf()], &console);

        assert!(registry.get("util_echo").is_some());
        assert!(registry.get("util_empty").is_none());
        assert!(registry.get("readme").is_none());
        assert!(registry.function("util_echo", "say").is_some());

        let output = drain_text(&rx);
        assert!(output.contains("Error loading util_broken.toml: invalid manifest"));
        assert!(output.ends_with("Loaded 4 utility modules.\n"));
        assert!(!output.contains("No utility scripts found"));
    }

    #[test]
    fn test_duplicate_module_name_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("util_converter.toml"), VALID).unwrap();

        let (console, rx) = Console::new();
        let registry = Registry::discover(&[dir.path().to_path_buf()], &console);

        assert_eq!(registry.len(), 3);
        assert!(registry.function("util_converter", "say").is_none());
        assert!(drain_text(&rx).contains(
            "Error loading util_converter.toml: module 'util_converter' is already registered"
        ));
    }

    #[test]
    fn test_missing_plugin_dir_is_skipped() {
        let dir = tempdir().unwrap();
        let (console, rx) = Console::new();
        let registry = Registry::discover(&[dir.path().join("absent")], &console);
        assert_eq!(registry.len(), 3);
        assert!(!drain_text(&rx).contains("Error scanning"));
    }

    #[test]
    fn test_unreadable_plugin_dir_is_reported() {
        let dir = tempdir().unwrap();
        let not_a_dir = dir.path().join("plugins");
        fs::write(&not_a_dir, "").unwrap();

        let (console, rx) = Console::new();
        let registry = Registry::discover(&[not_a_dir], &console);

        assert_eq!(registry.len(), 3);
        let output = drain_text(&rx);
        assert!(output.starts_with("Error scanning for utilities: "));
        assert!(output.contains("No utility scripts found in plugin directories.\n"));
        assert!(output.ends_with("Loaded 3 utility modules.\n"));
    }
}
