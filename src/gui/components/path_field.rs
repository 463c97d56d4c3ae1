//! Path entry with a Browse button

use eframe::egui;

use crate::gui::constants::*;

/// Renders the entry and button on one row; returns true when Browse was clicked
pub fn ui(ui: &mut egui::Ui, value: &mut String, browse_text: &str, enabled: bool) -> bool {
    let mut browse = false;
    ui.horizontal(|ui| {
        let width = (ui.available_width() - BROWSE_BUTTON_WIDTH).max(80.0);
        ui.add_enabled(enabled, egui::TextEdit::singleline(value).desired_width(width));
        browse = ui.add_enabled(enabled, egui::Button::new(browse_text)).clicked();
    });
    browse
}
