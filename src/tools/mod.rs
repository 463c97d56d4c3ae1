//! Standalone file tools

pub mod copier;
pub mod lister;

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Open `path` with the desktop's default application
pub fn open_with_default_app(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    command
        .arg(path)
        .spawn()
        .with_context(|| format!("failed to open '{}'", path.display()))?;
    Ok(())
}
