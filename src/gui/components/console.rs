//! Read-only scrolling text log

use eframe::egui;

/// Renders `text` in a selectable monospace view that follows new output
pub fn ui(ui: &mut egui::Ui, id_salt: &str, text: &str) {
    egui::ScrollArea::vertical()
        .id_salt(id_salt)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            let mut view = text;
            ui.add(
                egui::TextEdit::multiline(&mut view)
                    .font(egui::TextStyle::Monospace)
                    .desired_width(f32::INFINITY)
                    .desired_rows(8),
            );
        });
}
