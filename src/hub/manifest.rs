//! External utility modules described by `util*.toml` manifests
//!
//! Each manifest function runs a program with templated arguments. Every
//! `{param}` placeholder in `args` is replaced by the coerced input value.

use anyhow::{Context, Result, bail};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::thread;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::hub::{MANIFEST_EXTENSION, MODULE_PREFIX, NO_DESCRIPTION};
use crate::hub::console::Console;
use crate::hub::function::{Args, UtilityFunction, UtilityModule};
use crate::types::{FunctionSpec, ParamKind, ParamSpec, Value};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("valid regex"));

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("function '{function}' uses unknown parameter '{{{placeholder}}}'")]
    UnknownPlaceholder { function: String, placeholder: String },
    #[error("function '{function}' has an empty program")]
    MissingProgram { function: String },
    #[error("module '{0}' is already registered")]
    Duplicate(String),
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    description: Option<String>,
    #[serde(default)]
    functions: Vec<FunctionEntry>,
}

#[derive(Debug, Deserialize)]
struct FunctionEntry {
    name: String,
    #[serde(default)]
    doc: String,
    program: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    params: Vec<ParamEntry>,
}

#[derive(Debug, Deserialize)]
struct ParamEntry {
    name: String,
    #[serde(rename = "type")]
    annotation: Option<String>,
    default: Option<toml::Value>,
}

impl ParamEntry {
    fn into_spec(self) -> ParamSpec {
        let kind = ParamKind::from_annotation(self.annotation.as_deref());
        ParamSpec {
            name: self.name,
            kind,
            default: self.default.map(toml_to_value),
        }
    }
}

fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(x) => Value::Float(x),
        toml::Value::String(s) => Value::Str(s),
        toml::Value::Array(items) => Value::List(items.into_iter().map(toml_to_value).collect()),
        other => Value::Str(other.to_string()),
    }
}

/// File names the hub treats as module manifests
pub fn is_manifest_name(name: &str) -> bool {
    name.starts_with(MODULE_PREFIX) && name.ends_with(MANIFEST_EXTENSION)
}

/// Manifest files directly inside `dir`, sorted by name
pub fn find_manifests(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_manifest_name)
        })
        .collect();
    found.sort();
    Ok(found)
}

pub fn load_module(path: &Path) -> Result<UtilityModule, ManifestError> {
    let contents = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let workdir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parse_module(&name, &contents, workdir)
}

fn parse_module(name: &str, contents: &str, workdir: PathBuf) -> Result<UtilityModule, ManifestError> {
    let manifest: ManifestFile = toml::from_str(contents)?;
    let description = manifest
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let mut module = UtilityModule::new(name, description);
    for entry in manifest.functions {
        let function = build_function(entry, workdir.clone())?;
        if !module.insert(function) {
            debug!(module = %name, "skipping private manifest function");
        }
    }
    Ok(module)
}

fn build_function(entry: FunctionEntry, workdir: PathBuf) -> Result<UtilityFunction, ManifestError> {
    if entry.program.trim().is_empty() {
        return Err(ManifestError::MissingProgram { function: entry.name });
    }

    let params: Vec<ParamSpec> = entry.params.into_iter().map(ParamEntry::into_spec).collect();
    for arg in &entry.args {
        for caps in PLACEHOLDER.captures_iter(arg) {
            if !params.iter().any(|p| p.name == caps[1]) {
                return Err(ManifestError::UnknownPlaceholder {
                    function: entry.name,
                    placeholder: caps[1].to_string(),
                });
            }
        }
    }

    let spec = params
        .into_iter()
        .fold(FunctionSpec::new(entry.name, entry.doc), FunctionSpec::param);
    let program = entry.program;
    let templates = entry.args;
    Ok(UtilityFunction::new(spec, move |args, console| {
        let argv = render_args(&templates, args);
        run_program(&program, &argv, &workdir, console)
    }))
}

fn render_args(templates: &[String], args: &Args) -> Vec<String> {
    templates
        .iter()
        .map(|template| {
            PLACEHOLDER
                .replace_all(template, |caps: &Captures| {
                    args.get(&caps[1]).map(Value::to_arg).unwrap_or_default()
                })
                .into_owned()
        })
        .collect()
}

/// Spawn `program`, streaming stdout lines to the console as they arrive
fn run_program(program: &str, argv: &[String], workdir: &Path, console: &Console) -> Result<Option<Value>> {
    debug!(program = %program, args = ?argv, workdir = %workdir.display(), "spawning manifest program");
    let mut child = Command::new(program)
        .args(argv)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to launch '{program}'"))?;

    let stdout = child.stdout.take().context("child stdout not captured")?;
    let mut stderr = child.stderr.take().context("child stderr not captured")?;
    let stderr_reader = thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Err(e) = stderr.read_to_end(&mut bytes) {
            warn!(error = %e, "failed to read child stderr");
        }
        String::from_utf8_lossy(&bytes).into_owned()
    });

    let streamed = stream_lines(stdout, console);
    if streamed.is_err() {
        // the child may block on a full pipe once nobody reads it
        let _ = child.kill();
    }

    let status = child.wait().context("failed to wait for program")?;
    let stderr_text = stderr_reader.join().unwrap_or_default();
    for line in stderr_text.lines() {
        console.println(line);
    }
    streamed.context("failed to read program output")?;

    if !status.success() {
        bail!("'{program}' exited with {status}");
    }
    Ok(None)
}

/// Forward `reader` line by line, replacing invalid UTF-8
fn stream_lines(reader: impl Read, console: &Console) -> std::io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        console.println(String::from_utf8_lossy(&line));
    }
}
