//! Native file pickers
//!
//! Pickers run `zenity` on a helper thread so the UI keeps repainting.
//! Without zenity the picker yields nothing and paths are typed by hand.

use eframe::egui;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{debug, warn};

/// A running picker; `slot` records which input the answer belongs to
pub struct Picker<T> {
    pub slot: T,
    rx: Receiver<Option<PathBuf>>,
}

impl<T: Copy> Picker<T> {
    /// `Some(answer)` once the dialog closed, `None` while still open
    pub fn poll(&self) -> Option<Option<PathBuf>> {
        match self.rx.try_recv() {
            Ok(answer) => Some(answer),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(None),
        }
    }
}

pub fn pick_folder<T>(ctx: &egui::Context, slot: T, initial: &str) -> Picker<T> {
    let mut args = vec!["--file-selection".to_string(), "--directory".to_string()];
    if !initial.trim().is_empty() {
        args.push(format!("--filename={}/", initial.trim_end_matches('/')));
    }
    Picker {
        slot,
        rx: spawn_zenity(ctx, args),
    }
}

pub fn pick_save_file<T>(ctx: &egui::Context, slot: T, initial_dir: &Path, file_name: &str) -> Picker<T> {
    let args = vec![
        "--file-selection".to_string(),
        "--save".to_string(),
        "--confirm-overwrite".to_string(),
        format!("--filename={}", initial_dir.join(file_name).display()),
        "--file-filter=Text files | *.txt".to_string(),
        "--file-filter=All files | *".to_string(),
    ];
    Picker {
        slot,
        rx: spawn_zenity(ctx, args),
    }
}

fn spawn_zenity(ctx: &egui::Context, args: Vec<String>) -> Receiver<Option<PathBuf>> {
    let (tx, rx) = mpsc::channel();
    let ctx = ctx.clone();
    let spawned = thread::Builder::new().name("file-picker".into()).spawn(move || {
        let answer = match Command::new("zenity").args(&args).output() {
            Ok(output) if output.status.success() => {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                (!path.is_empty()).then(|| PathBuf::from(path))
            }
            Ok(output) => {
                debug!(status = %output.status, "file picker cancelled");
                None
            }
            Err(e) => {
                warn!(error = %e, "zenity not available, type the path instead");
                None
            }
        };
        let _ = tx.send(answer);
        ctx.request_repaint();
    });
    if let Err(e) = spawned {
        warn!(error = %e, "failed to start file picker thread");
    }
    rx
}
