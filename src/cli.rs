//! Headless commands sharing the GUI code paths

use anyhow::{Context, Result, bail};
use chrono::Local;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use tracing::info;

use crate::hub::console::drain_text;
use crate::hub::{Console, ConsoleEvent, ParamForm, Registry, Runner};
use crate::tools::copier::{self, CopyEvent};
use crate::tools::lister;

/// Discover modules; discovery diagnostics go to stderr
fn discover(plugin_dirs: &[PathBuf]) -> Registry {
    let (console, rx) = Console::new();
    let registry = Registry::discover(plugin_dirs, &console);
    eprint!("{}", drain_text(&rx));
    registry
}

/// Print every module with its function signatures
pub fn list(plugin_dirs: &[PathBuf]) -> Result<()> {
    let registry = discover(plugin_dirs);
    let mut out = io::stdout().lock();
    for module in registry.modules() {
        writeln!(out, "{} - {}", module.name, module.description)?;
        for function in module.functions() {
            writeln!(out, "    {}", function.spec().signature())?;
            if !function.spec().doc.is_empty() {
                writeln!(out, "        {}", function.spec().doc)?;
            }
        }
    }
    Ok(())
}

/// Split `name=value`
fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim(), value))
        .with_context(|| format!("parameter '{raw}' must be given as NAME=VALUE"))
}

/// Run one function, streaming its console to stdout. Returns whether it succeeded.
pub fn run(plugin_dirs: &[PathBuf], module: &str, function: &str, params: &[String]) -> Result<bool> {
    let registry = discover(plugin_dirs);
    let Some(utility) = registry.get(module) else {
        bail!("unknown utility module '{module}'");
    };
    let Some(function) = utility.function(function) else {
        bail!("module '{module}' has no function '{function}'");
    };

    let mut form = ParamForm::for_function(function.spec());
    for raw in params {
        let (name, value) = parse_assignment(raw)?;
        if let Err(e) = form.set(name, value) {
            println!("Error: {e}");
            return Ok(false);
        }
    }
    let args = match form.coerce() {
        Ok(args) => args,
        Err(e) => {
            println!("Error: {e}");
            return Ok(false);
        }
    };

    let (console, rx) = Console::new();
    Runner::new()
        .spawn(function.clone(), args, console)
        .context("failed to start function")?;
    stream(&rx)
}

fn stream(rx: &Receiver<ConsoleEvent>) -> Result<bool> {
    let mut out = io::stdout().lock();
    for event in rx {
        match event {
            ConsoleEvent::Text(text) => {
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
            ConsoleEvent::Finished { success } => return Ok(success),
        }
    }
    // worker dropped the console without finishing
    Ok(false)
}

pub fn copy_empty(source: &str, target: &str) -> Result<()> {
    let (source, target) = copier::validate(source, target)?;
    let report = copier::create_empty_copies(&source, &target, |event| {
        if let CopyEvent::Status(text) = event {
            println!("{text}");
        }
    })?;
    info!(created = report.created, target = %report.target.display(), "empty copy command finished");
    Ok(())
}

pub fn export_names(folder: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let path = lister::export_filenames_list(folder, output, Local::now(), |text| {
        println!("{} - {text}", Local::now().format("%H:%M:%S"));
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("celsius=100").unwrap(), ("celsius", "100"));
        assert_eq!(parse_assignment(" text =a=b").unwrap(), ("text", "a=b"));
        assert_eq!(parse_assignment("flag=").unwrap(), ("flag", ""));
        assert!(parse_assignment("celsius").is_err());
    }

    #[test]
    fn test_run_builtin_function() {
        let ok = run(
            &[],
            "util_converter",
            "celsius_to_fahrenheit",
            &["celsius=100".to_string()],
        )
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_run_reports_coercion_failure() {
        let ok = run(
            &[],
            "util_converter",
            "celsius_to_fahrenheit",
            &["celsius=hot".to_string()],
        )
        .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_run_unknown_targets() {
        assert!(run(&[], "util_missing", "f", &[]).is_err());
        assert!(run(&[], "util_converter", "missing", &[]).is_err());
        assert!(run(&[], "util_converter", "celsius_to_fahrenheit", &["x".to_string()]).is_err());
    }

    #[test]
    fn test_copy_empty_rejects_same_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().display().to_string();
        assert!(copy_empty(&path, &path).is_err());
        assert!(copy_empty("", &path).is_err());
    }

    #[test]
    fn test_export_names_to_explicit_output() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("data");
        std::fs::create_dir(&folder).unwrap();
        std::fs::write(folder.join("a.txt"), "").unwrap();
        let output = dir.path().join("list.txt");

        let written = export_names(&folder, Some(&output)).unwrap();
        assert!(written.ends_with("list.txt"));
        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.contains("Anzahl Dateien: 1"));
        assert!(contents.ends_with("a.txt\n"));
    }
}
