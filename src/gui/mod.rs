//! GUI module - egui windows for the hub and the standalone tools

mod components;
mod constants;
mod copier;
mod dialogs;
mod hub;
mod lister;

use anyhow::Result;
use eframe::egui;

pub use copier::run_copier;
pub use hub::run_hub;
pub use lister::run_lister;

fn native_options(title: &str, size: [f32; 2], min_size: Option<[f32; 2]>) -> eframe::NativeOptions {
    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(size)
        .with_title(title);
    if let Some(min_size) = min_size {
        viewport = viewport.with_min_inner_size(min_size);
    }
    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn run_app<A, F>(title: &str, options: eframe::NativeOptions, build: F) -> Result<()>
where
    A: eframe::App + 'static,
    F: FnOnce(&eframe::CreationContext<'_>) -> A + 'static,
{
    eframe::run_native(title, options, Box::new(move |cc| Ok(Box::new(build(cc)))))
        .map_err(|e| anyhow::anyhow!("Failed to run egui application: {}", e))?;

    Ok(())
}
